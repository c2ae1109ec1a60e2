//! Route definitions for the filament catalog.

use axum::routing::{get, patch, put};
use axum::Router;

use crate::handlers::filaments;
use crate::state::AppState;

/// Routes mounted at `/filaments`.
///
/// ```text
/// GET    /            -> list_filaments (available only unless admin)
/// POST   /            -> create_filament (admin)
/// PATCH  /{id}        -> update_filament (admin)
/// DELETE /{id}        -> delete_filament (admin)
/// PUT    /{id}/stock  -> set_stock (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(filaments::list_filaments).post(filaments::create_filament),
        )
        .route(
            "/{id}",
            patch(filaments::update_filament).delete(filaments::delete_filament),
        )
        .route("/{id}/stock", put(filaments::set_stock))
}
