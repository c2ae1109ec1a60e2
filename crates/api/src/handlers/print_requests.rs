//! Handlers for the print request lifecycle, audit trail, and listings.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uberprints_core::diff::ChangeSet;
use uberprints_core::error::CoreError;
use uberprints_core::types::DbId;
use uberprints_core::{policy, Actor};
use uberprints_db::models::print_request::{
    AdminUpdatePrintRequest, ChangeRequestStatus, CreatePrintRequest, OwnerUpdatePrintRequest,
    PrintRequest, PrintRequestChange, PrintRequestListQuery, StatusHistoryEntry,
};
use uberprints_db::repositories::PrintRequestRepo;
use uberprints_notify::StatusNotification;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthActor;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// GET /print-requests
///
/// Publicly flagged requests, visible to every actor.
pub async fn list_public(
    State(state): State<AppState>,
    AuthActor(_actor): AuthActor,
) -> AppResult<Json<DataResponse<Vec<PrintRequest>>>> {
    let requests = PrintRequestRepo::list_public(&state.pool).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// GET /print-requests/mine
///
/// The caller's own requests: by user id for members and admins, by
/// session token for guests.
pub async fn list_mine(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
) -> AppResult<Json<DataResponse<Vec<PrintRequest>>>> {
    let requests = match &actor {
        Actor::Guest { token } => PrintRequestRepo::list_for_guest(&state.pool, token).await?,
        Actor::Member { user_id } | Actor::Admin { user_id } => {
            PrintRequestRepo::list_for_user(&state.pool, *user_id).await?
        }
    };
    Ok(Json(DataResponse { data: requests }))
}

/// GET /print-requests/all
pub async fn list_all(
    State(state): State<AppState>,
    RequireAdmin(_admin_id): RequireAdmin,
    Query(params): Query<PrintRequestListQuery>,
) -> AppResult<Json<DataResponse<Vec<PrintRequest>>>> {
    let requests = PrintRequestRepo::list_all(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: requests }))
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// POST /print-requests
///
/// Create a request tagged with the caller's identity. The initial
/// `pending` history row is written in the same transaction.
pub async fn create(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Json(input): Json<CreatePrintRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<PrintRequest>>)> {
    if input.requester_name.is_empty() {
        return Err(AppError::Core(CoreError::InvalidArgument(
            "requester_name is required".into(),
        )));
    }
    validate_model_url(&input.model_url)?;

    let request =
        PrintRequestRepo::create(&state.pool, actor.user_id(), actor.guest_token(), &input)
            .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// GET /print-requests/{id}
pub async fn get_one(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PrintRequest>>> {
    let request = fetch(&state, id).await?;
    policy::ensure_can_view(
        &actor,
        request.user_id,
        request.guest_token.as_deref(),
        request.is_public,
    )?;
    Ok(Json(DataResponse { data: request }))
}

/// PATCH /print-requests/{id}
///
/// Owner edit surface. Only submission fields, and only while the
/// request is still pending or accepted. Every changed field lands in
/// the change log.
pub async fn owner_update(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(id): Path<DbId>,
    Json(input): Json<OwnerUpdatePrintRequest>,
) -> AppResult<Json<DataResponse<PrintRequest>>> {
    let current = fetch(&state, id).await?;
    policy::ensure_owner_can_edit(
        &actor,
        current.user_id,
        current.guest_token.as_deref(),
        current.status.owner_editable(),
    )?;

    let mut merged = current.clone();
    let mut set = ChangeSet::new();

    if let Some(name) = input.requester_name {
        if name.is_empty() {
            return Err(AppError::Core(CoreError::InvalidArgument(
                "requester_name must not be empty".into(),
            )));
        }
        if set.record("requester_name", &merged.requester_name, &name) {
            merged.requester_name = name;
        }
    }
    if let Some(url) = input.model_url {
        validate_model_url(&url)?;
        if set.record("model_url", &merged.model_url, &url) {
            merged.model_url = url;
        }
    }
    if let Some(notes) = input.notes {
        if set.record("notes", &merged.notes, &notes) {
            merged.notes = notes;
        }
    }
    if let Some(needs_delivery) = input.needs_delivery {
        if set.record("needs_delivery", &merged.needs_delivery, &needs_delivery) {
            merged.needs_delivery = needs_delivery;
        }
    }
    if let Some(is_public) = input.is_public {
        if set.record("is_public", &merged.is_public, &is_public) {
            merged.is_public = is_public;
        }
    }
    if let Some(filament_id) = input.filament_id {
        if set.record("filament_id", &merged.filament_id, &filament_id) {
            merged.filament_id = filament_id;
        }
    }

    apply_field_edit(&state, current, merged, set, actor.user_id()).await
}

/// PATCH /print-requests/{id}/admin
///
/// Admin edit surface: every mutable field except `status`, which has
/// its own operation. Same diff-logging as the owner surface.
pub async fn admin_update(
    State(state): State<AppState>,
    RequireAdmin(admin_id): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<AdminUpdatePrintRequest>,
) -> AppResult<Json<DataResponse<PrintRequest>>> {
    let current = fetch(&state, id).await?;

    let mut merged = current.clone();
    let mut set = ChangeSet::new();

    if let Some(name) = input.requester_name {
        if set.record("requester_name", &merged.requester_name, &name) {
            merged.requester_name = name;
        }
    }
    if let Some(url) = input.model_url {
        validate_model_url(&url)?;
        if set.record("model_url", &merged.model_url, &url) {
            merged.model_url = url;
        }
    }
    if let Some(notes) = input.notes {
        if set.record("notes", &merged.notes, &notes) {
            merged.notes = notes;
        }
    }
    if let Some(needs_delivery) = input.needs_delivery {
        if set.record("needs_delivery", &merged.needs_delivery, &needs_delivery) {
            merged.needs_delivery = needs_delivery;
        }
    }
    if let Some(is_public) = input.is_public {
        if set.record("is_public", &merged.is_public, &is_public) {
            merged.is_public = is_public;
        }
    }
    if let Some(notify) = input.notify_on_change {
        if set.record("notify_on_change", &merged.notify_on_change, &notify) {
            merged.notify_on_change = notify;
        }
    }
    if let Some(filament_id) = input.filament_id {
        if set.record("filament_id", &merged.filament_id, &filament_id) {
            merged.filament_id = filament_id;
        }
    }
    if let Some(printer_id) = input.printer_id {
        if set.record("printer_id", &merged.printer_id, &printer_id) {
            merged.printer_id = printer_id;
        }
    }
    if let Some(job_id) = input.print_job_id {
        if set.record("print_job_id", &merged.print_job_id, &job_id) {
            merged.print_job_id = job_id;
        }
    }
    if let Some(gcode_url) = input.gcode_url {
        if set.record("gcode_url", &merged.gcode_url, &gcode_url) {
            merged.gcode_url = gcode_url;
        }
    }
    if let Some(started) = input.print_started_at {
        if set.record("print_started_at", &merged.print_started_at, &started) {
            merged.print_started_at = started;
        }
    }
    if let Some(completed) = input.print_completed_at {
        if set.record("print_completed_at", &merged.print_completed_at, &completed) {
            merged.print_completed_at = completed;
        }
    }

    apply_field_edit(&state, current, merged, set, Some(admin_id)).await
}

/// POST /print-requests/{id}/status
///
/// Move a request to a new status, appending to the history. When the
/// requester is a member who opted in, fires the webhook notification
/// after the transaction commits; delivery failures never surface
/// here.
pub async fn change_status(
    State(state): State<AppState>,
    RequireAdmin(admin_id): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ChangeRequestStatus>,
) -> AppResult<Json<DataResponse<PrintRequest>>> {
    let current = fetch(&state, id).await?;

    if !policy::transition_allowed(&current.status, &input.status) {
        return Err(AppError::Core(CoreError::InvalidArgument(format!(
            "Transition from {} to {} is not allowed",
            current.status, input.status
        ))));
    }

    let updated =
        PrintRequestRepo::change_status(&state.pool, id, input.status, admin_id, input.note.as_deref())
            .await?
            .ok_or(CoreError::NotFound {
                entity: "print request",
                id,
            })?;

    if updated.notify_on_change {
        if let Some(recipient) = updated.user_id {
            state.notifier.dispatch(StatusNotification::new(
                updated.id,
                recipient,
                updated.requester_name.clone(),
                current.status,
                updated.status,
                input.note,
            ));
        }
    }

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /print-requests/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin_id): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removed = PrintRequestRepo::delete(&state.pool, id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "print request",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Audit trail
// ---------------------------------------------------------------------------

/// GET /print-requests/{id}/history
///
/// Status history in append order. Owner or admin only; public
/// visibility of the request does not extend to its history.
pub async fn history(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<StatusHistoryEntry>>>> {
    let request = fetch(&state, id).await?;
    policy::ensure_can_view(&actor, request.user_id, request.guest_token.as_deref(), false)?;

    let entries = PrintRequestRepo::history(&state.pool, id).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /print-requests/{id}/changes
pub async fn changes(
    State(state): State<AppState>,
    RequireAdmin(_admin_id): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<PrintRequestChange>>>> {
    // 404 for an unknown id rather than an empty list.
    let _ = fetch(&state, id).await?;

    let entries = PrintRequestRepo::changes(&state.pool, id).await?;
    Ok(Json(DataResponse { data: entries }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn fetch(state: &AppState, id: DbId) -> AppResult<PrintRequest> {
    PrintRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "print request",
                id,
            })
        })
}

/// Persist a merged field edit, or return the unchanged row when the
/// patch turned out to be a no-op (no change rows are written then).
async fn apply_field_edit(
    state: &AppState,
    current: PrintRequest,
    merged: PrintRequest,
    set: ChangeSet,
    actor_id: Option<DbId>,
) -> AppResult<Json<DataResponse<PrintRequest>>> {
    if set.is_empty() {
        return Ok(Json(DataResponse { data: current }));
    }

    let changes = set.into_changes();
    let updated = PrintRequestRepo::update_fields(&state.pool, &merged, actor_id, &changes)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "print request",
            id: merged.id,
        })?;
    Ok(Json(DataResponse { data: updated }))
}

/// Validate that a model URL parses and uses an http(s) scheme.
fn validate_model_url(raw: &str) -> AppResult<()> {
    let parsed = url::Url::parse(raw).map_err(|_| {
        AppError::Core(CoreError::InvalidArgument(format!(
            "model_url is not a valid URL: {raw}"
        )))
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(AppError::Core(CoreError::InvalidArgument(
            "model_url must use http or https".into(),
        )));
    }
    Ok(())
}
