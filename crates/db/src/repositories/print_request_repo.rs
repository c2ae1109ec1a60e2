//! Repository for print requests and their audit trail.
//!
//! The `status` column is a materialized view of the newest history
//! row. Every mutation that touches both is a single transaction, so
//! the two can never be observed out of sync.

use sqlx::{PgPool, Postgres, Transaction};
use uberprints_core::diff::FieldChange;
use uberprints_core::types::DbId;

use crate::models::print_request::{
    CreatePrintRequest, PrintRequest, PrintRequestChange, PrintRequestListQuery,
    StatusHistoryEntry,
};
use crate::models::status::RequestStatus;

/// Column list for `print_requests` SELECT queries.
const COLUMNS: &str = "\
    id, user_id, guest_token, requester_name, model_url, notes, \
    needs_delivery, is_public, notify_on_change, filament_id, printer_id, \
    print_job_id, gcode_url, print_started_at, print_completed_at, \
    status, created_at, updated_at";

/// Column list for `print_request_status_history` SELECT queries.
const HISTORY_COLUMNS: &str =
    "id, request_id, status, changed_by_user_id, note, created_at";

/// Column list for `print_request_changes` SELECT queries.
const CHANGE_COLUMNS: &str =
    "id, request_id, field, old_value, new_value, changed_by_user_id, created_at";

/// Provides lifecycle, audit, and query operations for print requests.
pub struct PrintRequestRepo;

impl PrintRequestRepo {
    /// Insert a new request and its initial `pending` history row.
    ///
    /// The owner tag (`user_id` or `guest_token`) is exactly one of
    /// the two; the CHECK constraint rejects anything else.
    pub async fn create(
        pool: &PgPool,
        user_id: Option<DbId>,
        guest_token: Option<&str>,
        input: &CreatePrintRequest,
    ) -> Result<PrintRequest, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO print_requests \
                (user_id, guest_token, requester_name, model_url, notes, \
                 needs_delivery, is_public, notify_on_change, filament_id) \
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, false), \
                     COALESCE($7, false), COALESCE($8, false), $9) \
             RETURNING {COLUMNS}"
        );
        let request = sqlx::query_as::<_, PrintRequest>(&insert_query)
            .bind(user_id)
            .bind(guest_token)
            .bind(&input.requester_name)
            .bind(&input.model_url)
            .bind(&input.notes)
            .bind(input.needs_delivery)
            .bind(input.is_public)
            .bind(input.notify_on_change)
            .bind(input.filament_id)
            .fetch_one(&mut *tx)
            .await?;

        Self::insert_history(&mut tx, request.id, request.status, user_id, None).await?;

        tx.commit().await?;
        Ok(request)
    }

    /// Find a request by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PrintRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM print_requests WHERE id = $1");
        sqlx::query_as::<_, PrintRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List publicly visible requests, newest first.
    pub async fn list_public(pool: &PgPool) -> Result<Vec<PrintRequest>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM print_requests WHERE is_public ORDER BY id DESC");
        sqlx::query_as::<_, PrintRequest>(&query)
            .fetch_all(pool)
            .await
    }

    /// List requests owned by an authenticated user, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<PrintRequest>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM print_requests WHERE user_id = $1 ORDER BY id DESC");
        sqlx::query_as::<_, PrintRequest>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List requests tagged with a guest session token, newest first.
    pub async fn list_for_guest(
        pool: &PgPool,
        guest_token: &str,
    ) -> Result<Vec<PrintRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM print_requests WHERE guest_token = $1 ORDER BY id DESC"
        );
        sqlx::query_as::<_, PrintRequest>(&query)
            .bind(guest_token)
            .fetch_all(pool)
            .await
    }

    /// List all requests with optional status filter and pagination.
    pub async fn list_all(
        pool: &PgPool,
        params: &PrintRequestListQuery,
    ) -> Result<Vec<PrintRequest>, sqlx::Error> {
        let limit = params.limit.unwrap_or(50).min(200);
        let offset = params.offset.unwrap_or(0);

        match params.status {
            Some(status) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM print_requests WHERE status = $1 \
                     ORDER BY id DESC LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, PrintRequest>(&query)
                    .bind(status)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM print_requests ORDER BY id DESC LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, PrintRequest>(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Move a request to `new_status` and append the history row.
    ///
    /// Returns `None` when the request does not exist. Repeating the
    /// same target status still appends a fresh history row -- the
    /// history is a log, not a dedupe set.
    pub async fn change_status(
        pool: &PgPool,
        id: DbId,
        new_status: RequestStatus,
        actor_id: DbId,
        note: Option<&str>,
    ) -> Result<Option<PrintRequest>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let update_query = format!(
            "UPDATE print_requests SET status = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        let request = sqlx::query_as::<_, PrintRequest>(&update_query)
            .bind(id)
            .bind(new_status)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(request) = request else {
            return Ok(None);
        };

        Self::insert_history(&mut tx, id, new_status, Some(actor_id), note).await?;

        tx.commit().await?;
        Ok(Some(request))
    }

    /// Apply an already-merged field edit plus its change-log rows.
    ///
    /// `merged` carries the final value of every mutable non-status
    /// column (the caller starts from the stored row, so untouched
    /// fields keep their values); `changes` holds one entry per field
    /// that actually differed. Both land in one transaction. The
    /// `status` column and its history are never touched here.
    pub async fn update_fields(
        pool: &PgPool,
        merged: &PrintRequest,
        actor_id: Option<DbId>,
        changes: &[FieldChange],
    ) -> Result<Option<PrintRequest>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let update_query = format!(
            "UPDATE print_requests SET \
                requester_name = $2, model_url = $3, notes = $4, \
                needs_delivery = $5, is_public = $6, notify_on_change = $7, \
                filament_id = $8, printer_id = $9, print_job_id = $10, \
                gcode_url = $11, print_started_at = $12, print_completed_at = $13, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let request = sqlx::query_as::<_, PrintRequest>(&update_query)
            .bind(merged.id)
            .bind(&merged.requester_name)
            .bind(&merged.model_url)
            .bind(&merged.notes)
            .bind(merged.needs_delivery)
            .bind(merged.is_public)
            .bind(merged.notify_on_change)
            .bind(merged.filament_id)
            .bind(merged.printer_id)
            .bind(&merged.print_job_id)
            .bind(&merged.gcode_url)
            .bind(merged.print_started_at)
            .bind(merged.print_completed_at)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(request) = request else {
            return Ok(None);
        };

        for change in changes {
            sqlx::query(
                "INSERT INTO print_request_changes \
                    (request_id, field, old_value, new_value, changed_by_user_id) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(merged.id)
            .bind(change.field)
            .bind(&change.old_value)
            .bind(&change.new_value)
            .bind(actor_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Some(request))
    }

    /// Delete a request; history and change rows cascade with it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM print_requests WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Status history for a request, in append order.
    pub async fn history(
        pool: &PgPool,
        request_id: DbId,
    ) -> Result<Vec<StatusHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {HISTORY_COLUMNS} FROM print_request_status_history \
             WHERE request_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, StatusHistoryEntry>(&query)
            .bind(request_id)
            .fetch_all(pool)
            .await
    }

    /// Field change log for a request, in append order.
    pub async fn changes(
        pool: &PgPool,
        request_id: DbId,
    ) -> Result<Vec<PrintRequestChange>, sqlx::Error> {
        let query = format!(
            "SELECT {CHANGE_COLUMNS} FROM print_request_changes \
             WHERE request_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, PrintRequestChange>(&query)
            .bind(request_id)
            .fetch_all(pool)
            .await
    }

    /// Append one status-history row inside an open transaction.
    async fn insert_history(
        tx: &mut Transaction<'_, Postgres>,
        request_id: DbId,
        status: RequestStatus,
        actor_id: Option<DbId>,
        note: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO print_request_status_history \
                (request_id, status, changed_by_user_id, note) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(request_id)
        .bind(status)
        .bind(actor_id)
        .bind(note)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
