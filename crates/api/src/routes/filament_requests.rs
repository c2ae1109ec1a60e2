//! Route definitions for filament acquisition requests.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::filament_requests;
use crate::state::AppState;

/// Routes mounted at `/filament-requests`.
///
/// ```text
/// POST /              -> create
/// GET  /mine          -> list_mine
/// GET  /all           -> list_all (admin)
/// GET  /{id}          -> get_one (owner / admin)
/// POST /{id}/status   -> change_status (admin)
/// GET  /{id}/history  -> history (owner / admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(filament_requests::create))
        .route("/mine", get(filament_requests::list_mine))
        .route("/all", get(filament_requests::list_all))
        .route("/{id}", get(filament_requests::get_one))
        .route("/{id}/status", post(filament_requests::change_status))
        .route("/{id}/history", get(filament_requests::history))
}
