use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Payload for `GET /health`.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `"ok"`, or `"degraded"` when the database is unreachable.
    pub status: &'static str,
    /// Package name, so probes can tell the binaries apart.
    pub service: &'static str,
    /// Package version.
    pub version: &'static str,
    pub db_healthy: bool,
}

/// Liveness and database reachability in a single probe. Always
/// answers 200; orchestrators read the `status` field.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = uberprints_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
