//! Filament acquisition request entity and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uberprints_core::types::{DbId, Timestamp};

use super::status::FilamentRequestStatus;

/// A row from the `filament_requests` table.
///
/// Same materialized-status invariant as print requests: `status`
/// always equals the newest history row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FilamentRequest {
    pub id: DbId,
    pub user_id: Option<DbId>,
    #[serde(skip_serializing)]
    pub guest_token: Option<String>,
    pub requester_name: String,
    pub material: String,
    pub brand: Option<String>,
    pub colour: Option<String>,
    pub link: Option<String>,
    pub notes: Option<String>,
    pub status: FilamentRequestStatus,
    /// Catalog filament attached once the request is fulfilled; may
    /// stay unset when fulfillment happens outside the catalog.
    pub filament_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the append-only `filament_request_status_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FilamentRequestHistoryEntry {
    pub id: DbId,
    pub request_id: DbId,
    pub status: FilamentRequestStatus,
    pub changed_by_user_id: Option<DbId>,
    pub note: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for `POST /filament-requests`.
#[derive(Debug, Deserialize)]
pub struct CreateFilamentRequest {
    pub requester_name: String,
    pub material: String,
    pub brand: Option<String>,
    pub colour: Option<String>,
    pub link: Option<String>,
    pub notes: Option<String>,
}

/// DTO for `POST /filament-requests/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct ChangeFilamentRequestStatus {
    pub status: FilamentRequestStatus,
    pub reason: Option<String>,
    pub filament_id: Option<DbId>,
}
