pub mod auth;
pub mod filament_requests;
pub mod filaments;
pub mod health;
pub mod print_requests;
pub mod printers;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/guest                        create guest session (public)
/// /auth/token                        JWT for a verified Discord identity
/// /auth/me                           current actor
///
/// /print-requests                    public list (GET), create (POST)
/// /print-requests/mine               own requests
/// /print-requests/all                all requests (admin)
/// /print-requests/{id}               get, owner patch, delete (admin)
/// /print-requests/{id}/admin         admin field edit (PATCH)
/// /print-requests/{id}/status        change status (POST, admin)
/// /print-requests/{id}/history       status history (owner / admin)
/// /print-requests/{id}/changes       field change log (admin)
///
/// /filaments                         list, create (admin)
/// /filaments/{id}                    patch, delete (admin)
/// /filaments/{id}/stock              stock ledger set (PUT, admin)
///
/// /filament-requests                 create (POST)
/// /filament-requests/mine            own requests
/// /filament-requests/all             all requests (admin)
/// /filament-requests/{id}            get (owner / admin)
/// /filament-requests/{id}/status     change status (POST, admin)
/// /filament-requests/{id}/history    status history (owner / admin)
///
/// /printers                          list, create (admin)
/// /printers/{id}                     get, patch, delete (admin)
/// /printers/{id}/telemetry           apply snapshot (POST, admin)
/// /printers/{id}/history             telemetry history (admin)
///
/// /admin/users                       list users (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/print-requests", print_requests::router())
        .nest("/filaments", filaments::router())
        .nest("/filament-requests", filament_requests::router())
        .nest("/printers", printers::router())
        .nest("/admin/users", users::router())
}
