//! Handlers for the filament catalog and stock ledger.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uberprints_core::error::CoreError;
use uberprints_core::types::DbId;
use uberprints_db::models::filament::{CreateFilament, Filament, SetStock, UpdateFilament};
use uberprints_db::repositories::FilamentRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthActor;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /filaments
///
/// List the catalog. Non-admin callers only see filaments flagged
/// available; availability is the explicit flag, never derived from
/// the stock amount.
pub async fn list_filaments(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
) -> AppResult<Json<DataResponse<Vec<Filament>>>> {
    let filaments = FilamentRepo::list(&state.pool, actor.is_admin()).await?;
    Ok(Json(DataResponse { data: filaments }))
}

/// POST /filaments
pub async fn create_filament(
    State(state): State<AppState>,
    RequireAdmin(_admin_id): RequireAdmin,
    Json(input): Json<CreateFilament>,
) -> AppResult<(StatusCode, Json<DataResponse<Filament>>)> {
    if input.name.is_empty() || input.material.is_empty() {
        return Err(AppError::Core(CoreError::InvalidArgument(
            "name and material are required".into(),
        )));
    }
    if let Some(amount) = input.stock_amount {
        ensure_non_negative(amount)?;
    }

    let filament = FilamentRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: filament })))
}

/// PATCH /filaments/{id}
pub async fn update_filament(
    State(state): State<AppState>,
    RequireAdmin(_admin_id): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateFilament>,
) -> AppResult<Json<DataResponse<Filament>>> {
    let filament = FilamentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "filament",
            id,
        })?;
    Ok(Json(DataResponse { data: filament }))
}

/// PUT /filaments/{id}/stock
///
/// Stock ledger: set the absolute stock amount. Rejected before it
/// reaches the database when negative; the CHECK constraint is the
/// backstop.
pub async fn set_stock(
    State(state): State<AppState>,
    RequireAdmin(_admin_id): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<SetStock>,
) -> AppResult<Json<DataResponse<Filament>>> {
    ensure_non_negative(input.stock_amount)?;

    let filament = FilamentRepo::set_stock(&state.pool, id, input.stock_amount)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "filament",
            id,
        })?;
    Ok(Json(DataResponse { data: filament }))
}

/// DELETE /filaments/{id}
pub async fn delete_filament(
    State(state): State<AppState>,
    RequireAdmin(_admin_id): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removed = FilamentRepo::delete(&state.pool, id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "filament",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn ensure_non_negative(amount: f64) -> AppResult<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::Core(CoreError::InvalidArgument(
            "stock_amount must be a non-negative number".into(),
        )));
    }
    Ok(())
}
