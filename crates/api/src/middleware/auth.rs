//! Actor-resolution extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uberprints_core::error::CoreError;
use uberprints_core::Actor;
use uberprints_db::repositories::UserRepo;

use crate::auth::jwt::{validate_token, ROLE_ADMIN};
use crate::error::AppError;
use crate::state::AppState;

/// Header carrying a guest session token.
pub const GUEST_TOKEN_HEADER: &str = "x-guest-token";

/// The resolved caller identity, extracted from either a JWT Bearer
/// token (members and admins) or an `X-Guest-Token` header (guests).
///
/// Use this as an extractor parameter in any handler that requires an
/// actor:
///
/// ```ignore
/// async fn my_handler(AuthActor(actor): AuthActor) -> AppResult<Json<()>> {
///     tracing::info!(is_admin = actor.is_admin(), "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthActor(pub Actor);

impl FromRequestParts<AppState> for AuthActor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Authenticated users present a Bearer JWT.
        if let Some(auth_header) = parts.headers.get("authorization") {
            let auth_header = auth_header.to_str().map_err(|_| {
                AppError::Core(CoreError::Unauthorized(
                    "Invalid Authorization header".into(),
                ))
            })?;

            let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Invalid Authorization format. Expected: Bearer <token>".into(),
                ))
            })?;

            let claims = validate_token(token, &state.config.jwt).map_err(|_| {
                AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
            })?;

            let actor = if claims.role == ROLE_ADMIN {
                Actor::Admin {
                    user_id: claims.sub,
                }
            } else {
                Actor::Member {
                    user_id: claims.sub,
                }
            };
            return Ok(AuthActor(actor));
        }

        // Guests present their opaque session token. The token must
        // belong to an existing guest row -- a made-up token is not a
        // valid identity.
        if let Some(token) = parts
            .headers
            .get(GUEST_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            let user = UserRepo::find_by_guest_token(&state.pool, token).await?;
            if user.is_none() {
                return Err(AppError::Core(CoreError::Unauthorized(
                    "Unknown guest token".into(),
                )));
            }
            return Ok(AuthActor(Actor::Guest {
                token: token.to_string(),
            }));
        }

        Err(AppError::Core(CoreError::Unauthorized(
            "Missing credentials: provide a Bearer token or X-Guest-Token header".into(),
        )))
    }
}
