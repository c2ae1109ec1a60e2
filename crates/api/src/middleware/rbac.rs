//! Role-gating extractors.
//!
//! Wraps [`AuthActor`] and rejects callers that lack the required
//! capability, so authorization shows up in the handler signature.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uberprints_core::policy::ensure_admin;
use uberprints_core::types::DbId;

use super::auth::AuthActor;
use crate::error::AppError;
use crate::state::AppState;

/// Requires an admin actor. Rejects with 403 Forbidden otherwise.
///
/// Carries the admin's user id, which is what audit rows record.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(admin_id): RequireAdmin) -> AppResult<Json<()>> {
///     // admin_id is guaranteed to belong to an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub DbId);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthActor(actor) = AuthActor::from_request_parts(parts, state).await?;
        let admin_id = ensure_admin(&actor)?;
        Ok(RequireAdmin(admin_id))
    }
}
