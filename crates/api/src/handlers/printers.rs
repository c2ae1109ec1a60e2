//! Handlers for printer management and telemetry.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uberprints_core::error::CoreError;
use uberprints_core::types::DbId;
use uberprints_db::models::printer::{
    CreatePrinter, Printer, PrinterStatusHistoryEntry, TelemetrySnapshot, UpdatePrinter,
};
use uberprints_db::repositories::PrinterRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the printer history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// How many history rows to return, newest first (default: 100).
    pub limit: Option<i64>,
}

/// GET /printers
pub async fn list_printers(
    State(state): State<AppState>,
    RequireAdmin(_admin_id): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<Printer>>>> {
    let printers = PrinterRepo::list(&state.pool, false).await?;
    Ok(Json(DataResponse { data: printers }))
}

/// POST /printers
pub async fn create_printer(
    State(state): State<AppState>,
    RequireAdmin(_admin_id): RequireAdmin,
    Json(input): Json<CreatePrinter>,
) -> AppResult<(StatusCode, Json<DataResponse<Printer>>)> {
    if input.name.is_empty() || input.address.is_empty() || input.api_key.is_empty() {
        return Err(AppError::Core(CoreError::InvalidArgument(
            "name, address, and api_key are required".into(),
        )));
    }

    let printer = PrinterRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: printer })))
}

/// GET /printers/{id}
pub async fn get_printer(
    State(state): State<AppState>,
    RequireAdmin(_admin_id): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Printer>>> {
    let printer = fetch(&state, id).await?;
    Ok(Json(DataResponse { data: printer }))
}

/// PATCH /printers/{id}
pub async fn update_printer(
    State(state): State<AppState>,
    RequireAdmin(_admin_id): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePrinter>,
) -> AppResult<Json<DataResponse<Printer>>> {
    let printer = PrinterRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "printer",
            id,
        })?;
    Ok(Json(DataResponse { data: printer }))
}

/// DELETE /printers/{id}
pub async fn delete_printer(
    State(state): State<AppState>,
    RequireAdmin(_admin_id): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removed = PrinterRepo::delete(&state.pool, id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "printer",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /printers/{id}/telemetry
///
/// Apply one telemetry snapshot: every telemetry column is overwritten
/// from the payload and one history row is appended. The poller links
/// the repository directly; this endpoint exists for manual pushes and
/// out-of-process ingesters.
pub async fn apply_telemetry(
    State(state): State<AppState>,
    RequireAdmin(_admin_id): RequireAdmin,
    Path(id): Path<DbId>,
    Json(snapshot): Json<TelemetrySnapshot>,
) -> AppResult<Json<DataResponse<Printer>>> {
    let printer = PrinterRepo::apply_snapshot(&state.pool, id, &snapshot)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "printer",
            id,
        })?;
    Ok(Json(DataResponse { data: printer }))
}

/// GET /printers/{id}/history
pub async fn history(
    State(state): State<AppState>,
    RequireAdmin(_admin_id): RequireAdmin,
    Path(id): Path<DbId>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<DataResponse<Vec<PrinterStatusHistoryEntry>>>> {
    let _ = fetch(&state, id).await?;

    let limit = query.limit.unwrap_or(100);
    if limit < 1 {
        return Err(AppError::Core(CoreError::InvalidArgument(
            "limit must be at least 1".into(),
        )));
    }

    let entries = PrinterRepo::history(&state.pool, id, limit).await?;
    Ok(Json(DataResponse { data: entries }))
}

async fn fetch(state: &AppState, id: DbId) -> AppResult<Printer> {
    PrinterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "printer",
                id,
            })
        })
}
