//! Route definitions for session and identity endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /guest  -> create_guest
/// POST /token  -> token_exchange
/// GET  /me     -> me
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/guest", post(auth::create_guest))
        .route("/token", post(auth::token_exchange))
        .route("/me", get(auth::me))
}
