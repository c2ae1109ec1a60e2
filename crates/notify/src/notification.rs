//! Notification payload for print-request status changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uberprints_core::types::DbId;
use uberprints_db::models::status::RequestStatus;

/// A status-change notification addressed to the requester.
///
/// Serialized as-is into the webhook POST body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusNotification {
    /// Id of the print request that changed.
    pub request_id: DbId,

    /// Id of the user the notification is for.
    pub recipient_user_id: DbId,

    /// Display name given on the request.
    pub requester_name: String,

    /// Status before the change.
    pub old_status: RequestStatus,

    /// Status after the change.
    pub new_status: RequestStatus,

    /// Optional note the admin attached to the change.
    pub note: Option<String>,

    /// When the change happened (UTC).
    pub changed_at: DateTime<Utc>,
}

impl StatusNotification {
    pub fn new(
        request_id: DbId,
        recipient_user_id: DbId,
        requester_name: impl Into<String>,
        old_status: RequestStatus,
        new_status: RequestStatus,
        note: Option<String>,
    ) -> Self {
        Self {
            request_id,
            recipient_user_id,
            requester_name: requester_name.into(),
            old_status,
            new_status,
            note,
            changed_at: Utc::now(),
        }
    }
}
