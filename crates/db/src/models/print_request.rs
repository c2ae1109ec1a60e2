//! Print request entity, audit-trail rows, and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uberprints_core::types::{DbId, Timestamp};

use super::patch;
use super::status::RequestStatus;

/// A row from the `print_requests` table.
///
/// `status` is a materialized view of the most recent
/// `print_request_status_history` row; the two are updated in the
/// same transaction and must never diverge.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PrintRequest {
    pub id: DbId,
    pub user_id: Option<DbId>,
    /// Tracking token for anonymous submissions; mutually exclusive
    /// with `user_id`. Not serialized -- it is a bearer credential.
    #[serde(skip_serializing)]
    pub guest_token: Option<String>,
    pub requester_name: String,
    pub model_url: String,
    pub notes: Option<String>,
    pub needs_delivery: bool,
    pub is_public: bool,
    pub notify_on_change: bool,
    pub filament_id: Option<DbId>,
    pub printer_id: Option<DbId>,
    pub print_job_id: Option<String>,
    pub gcode_url: Option<String>,
    pub print_started_at: Option<Timestamp>,
    pub print_completed_at: Option<Timestamp>,
    pub status: RequestStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the append-only `print_request_status_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusHistoryEntry {
    pub id: DbId,
    pub request_id: DbId,
    pub status: RequestStatus,
    pub changed_by_user_id: Option<DbId>,
    pub note: Option<String>,
    pub created_at: Timestamp,
}

/// A row from the append-only `print_request_changes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PrintRequestChange {
    pub id: DbId,
    pub request_id: DbId,
    pub field: String,
    pub old_value: String,
    pub new_value: String,
    pub changed_by_user_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for `POST /print-requests`. The owner tag (user id or guest
/// token) comes from the actor context, never from the payload.
#[derive(Debug, Deserialize)]
pub struct CreatePrintRequest {
    pub requester_name: String,
    pub model_url: String,
    pub notes: Option<String>,
    pub needs_delivery: Option<bool>,
    pub is_public: Option<bool>,
    pub notify_on_change: Option<bool>,
    pub filament_id: Option<DbId>,
}

/// DTO for the owner edit surface (`PATCH /print-requests/{id}`).
///
/// Deliberately narrower than [`AdminUpdatePrintRequest`]: owners can
/// only touch the submission fields, and only while the request is
/// still pending or accepted. Nullable fields are clearable with an
/// explicit `null`.
#[derive(Debug, Default, Deserialize)]
pub struct OwnerUpdatePrintRequest {
    pub requester_name: Option<String>,
    pub model_url: Option<String>,
    #[serde(default, deserialize_with = "patch::clearable")]
    pub notes: Option<Option<String>>,
    pub needs_delivery: Option<bool>,
    pub is_public: Option<bool>,
    #[serde(default, deserialize_with = "patch::clearable")]
    pub filament_id: Option<Option<DbId>>,
}

/// DTO for the admin edit surface (`PATCH /print-requests/{id}/admin`).
///
/// Never touches `status` or its history; status changes go through
/// the dedicated status operation. Nullable fields are clearable with
/// an explicit `null`, so a mistaken printer assignment or timestamp
/// can be undone.
#[derive(Debug, Default, Deserialize)]
pub struct AdminUpdatePrintRequest {
    pub requester_name: Option<String>,
    pub model_url: Option<String>,
    #[serde(default, deserialize_with = "patch::clearable")]
    pub notes: Option<Option<String>>,
    pub needs_delivery: Option<bool>,
    pub is_public: Option<bool>,
    pub notify_on_change: Option<bool>,
    #[serde(default, deserialize_with = "patch::clearable")]
    pub filament_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "patch::clearable")]
    pub printer_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "patch::clearable")]
    pub print_job_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::clearable")]
    pub gcode_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::clearable")]
    pub print_started_at: Option<Option<Timestamp>>,
    #[serde(default, deserialize_with = "patch::clearable")]
    pub print_completed_at: Option<Option<Timestamp>>,
}

/// DTO for `POST /print-requests/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct ChangeRequestStatus {
    pub status: RequestStatus,
    pub note: Option<String>,
}

/// Query parameters for `GET /print-requests/all`.
#[derive(Debug, Deserialize)]
pub struct PrintRequestListQuery {
    pub status: Option<RequestStatus>,
    /// Maximum number of results. Defaults to 50, capped at 200.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}
