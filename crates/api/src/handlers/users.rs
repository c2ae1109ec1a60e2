//! Handlers for the admin user console.

use axum::extract::State;
use axum::Json;
use uberprints_db::models::user::User;
use uberprints_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /admin/users
///
/// List every user (guests and members), newest first.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin_id): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<User>>>> {
    let users = UserRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}
