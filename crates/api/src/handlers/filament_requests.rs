//! Handlers for filament acquisition requests.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uberprints_core::error::CoreError;
use uberprints_core::types::DbId;
use uberprints_core::{policy, Actor};
use uberprints_db::models::filament_request::{
    ChangeFilamentRequestStatus, CreateFilamentRequest, FilamentRequest,
    FilamentRequestHistoryEntry,
};
use uberprints_db::repositories::{FilamentRepo, FilamentRequestRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthActor;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /filament-requests/mine
pub async fn list_mine(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
) -> AppResult<Json<DataResponse<Vec<FilamentRequest>>>> {
    let requests = match &actor {
        Actor::Guest { token } => FilamentRequestRepo::list_for_guest(&state.pool, token).await?,
        Actor::Member { user_id } | Actor::Admin { user_id } => {
            FilamentRequestRepo::list_for_user(&state.pool, *user_id).await?
        }
    };
    Ok(Json(DataResponse { data: requests }))
}

/// GET /filament-requests/all
pub async fn list_all(
    State(state): State<AppState>,
    RequireAdmin(_admin_id): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<FilamentRequest>>>> {
    let requests = FilamentRequestRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// POST /filament-requests
pub async fn create(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Json(input): Json<CreateFilamentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<FilamentRequest>>)> {
    if input.requester_name.is_empty() || input.material.is_empty() {
        return Err(AppError::Core(CoreError::InvalidArgument(
            "requester_name and material are required".into(),
        )));
    }

    let request =
        FilamentRequestRepo::create(&state.pool, actor.user_id(), actor.guest_token(), &input)
            .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// GET /filament-requests/{id}
///
/// Owner or admin only; filament requests have no public flag.
pub async fn get_one(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<FilamentRequest>>> {
    let request = fetch(&state, id).await?;
    policy::ensure_can_view(&actor, request.user_id, request.guest_token.as_deref(), false)?;
    Ok(Json(DataResponse { data: request }))
}

/// POST /filament-requests/{id}/status
///
/// Change the status, appending to the history. A fulfilling change
/// may attach a catalog filament; the id must then point at a real
/// catalog row.
pub async fn change_status(
    State(state): State<AppState>,
    RequireAdmin(admin_id): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ChangeFilamentRequestStatus>,
) -> AppResult<Json<DataResponse<FilamentRequest>>> {
    let current = fetch(&state, id).await?;

    if !policy::transition_allowed(&current.status, &input.status) {
        return Err(AppError::Core(CoreError::InvalidArgument(format!(
            "Transition from {} to {} is not allowed",
            current.status, input.status
        ))));
    }

    if input.status.is_fulfilled() {
        if let Some(filament_id) = input.filament_id {
            let exists = FilamentRepo::find_by_id(&state.pool, filament_id)
                .await?
                .is_some();
            if !exists {
                return Err(AppError::Core(CoreError::NotFound {
                    entity: "filament",
                    id: filament_id,
                }));
            }
        }
    }

    let updated = FilamentRequestRepo::change_status(
        &state.pool,
        id,
        input.status,
        admin_id,
        input.reason.as_deref(),
        input.filament_id,
    )
    .await?
    .ok_or(CoreError::NotFound {
        entity: "filament request",
        id,
    })?;

    Ok(Json(DataResponse { data: updated }))
}

/// GET /filament-requests/{id}/history
pub async fn history(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<FilamentRequestHistoryEntry>>>> {
    let request = fetch(&state, id).await?;
    policy::ensure_can_view(&actor, request.user_id, request.guest_token.as_deref(), false)?;

    let entries = FilamentRequestRepo::history(&state.pool, id).await?;
    Ok(Json(DataResponse { data: entries }))
}

async fn fetch(state: &AppState, id: DbId) -> AppResult<FilamentRequest> {
    FilamentRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "filament request",
                id,
            })
        })
}
