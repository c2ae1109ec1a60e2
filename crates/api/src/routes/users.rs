//! Route definitions for the admin user console.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/admin/users`.
///
/// ```text
/// GET / -> list_users (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(users::list_users))
}
