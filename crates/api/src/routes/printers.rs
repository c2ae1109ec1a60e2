//! Route definitions for printer management and telemetry.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::printers;
use crate::state::AppState;

/// Routes mounted at `/printers`. All admin-gated.
///
/// ```text
/// GET    /                 -> list_printers
/// POST   /                 -> create_printer
/// GET    /{id}             -> get_printer
/// PATCH  /{id}             -> update_printer
/// DELETE /{id}             -> delete_printer
/// POST   /{id}/telemetry   -> apply_telemetry
/// GET    /{id}/history     -> history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(printers::list_printers).post(printers::create_printer),
        )
        .route(
            "/{id}",
            get(printers::get_printer)
                .patch(printers::update_printer)
                .delete(printers::delete_printer),
        )
        .route("/{id}/telemetry", post(printers::apply_telemetry))
        .route("/{id}/history", get(printers::history))
}
