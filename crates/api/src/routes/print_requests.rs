//! Route definitions for the print request lifecycle.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::print_requests;
use crate::state::AppState;

/// Routes mounted at `/print-requests`.
///
/// Authorization is enforced by the handler extractors: listings and
/// reads go through the view policy, mutations through the owner-edit
/// policy or the admin gate.
///
/// ```text
/// GET    /              -> list_public
/// POST   /              -> create
/// GET    /mine          -> list_mine
/// GET    /all           -> list_all (admin)
/// GET    /{id}          -> get_one
/// PATCH  /{id}          -> owner_update
/// DELETE /{id}          -> delete (admin)
/// PATCH  /{id}/admin    -> admin_update (admin)
/// POST   /{id}/status   -> change_status (admin)
/// GET    /{id}/history  -> history (owner / admin)
/// GET    /{id}/changes  -> changes (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(print_requests::list_public).post(print_requests::create),
        )
        .route("/mine", get(print_requests::list_mine))
        .route("/all", get(print_requests::list_all))
        .route(
            "/{id}",
            get(print_requests::get_one)
                .patch(print_requests::owner_update)
                .delete(print_requests::delete),
        )
        .route("/{id}/admin", patch(print_requests::admin_update))
        .route("/{id}/status", post(print_requests::change_status))
        .route("/{id}/history", get(print_requests::history))
        .route("/{id}/changes", get(print_requests::changes))
}
