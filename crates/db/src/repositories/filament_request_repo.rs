//! Repository for filament acquisition requests and their history.

use sqlx::{PgPool, Postgres, Transaction};
use uberprints_core::types::DbId;

use crate::models::filament_request::{
    CreateFilamentRequest, FilamentRequest, FilamentRequestHistoryEntry,
};
use crate::models::status::FilamentRequestStatus;

/// Column list for `filament_requests` SELECT queries.
const COLUMNS: &str = "\
    id, user_id, guest_token, requester_name, material, brand, colour, \
    link, notes, status, filament_id, created_at, updated_at";

/// Column list for `filament_request_status_history` SELECT queries.
const HISTORY_COLUMNS: &str =
    "id, request_id, status, changed_by_user_id, note, created_at";

/// Provides lifecycle operations for filament requests.
pub struct FilamentRequestRepo;

impl FilamentRequestRepo {
    /// Insert a new filament request plus its initial history row.
    pub async fn create(
        pool: &PgPool,
        user_id: Option<DbId>,
        guest_token: Option<&str>,
        input: &CreateFilamentRequest,
    ) -> Result<FilamentRequest, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO filament_requests \
                (user_id, guest_token, requester_name, material, brand, colour, link, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        let request = sqlx::query_as::<_, FilamentRequest>(&insert_query)
            .bind(user_id)
            .bind(guest_token)
            .bind(&input.requester_name)
            .bind(&input.material)
            .bind(&input.brand)
            .bind(&input.colour)
            .bind(&input.link)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;

        Self::insert_history(&mut tx, request.id, request.status, user_id, None).await?;

        tx.commit().await?;
        Ok(request)
    }

    /// Find a filament request by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<FilamentRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM filament_requests WHERE id = $1");
        sqlx::query_as::<_, FilamentRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List requests owned by an authenticated user, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<FilamentRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM filament_requests WHERE user_id = $1 ORDER BY id DESC"
        );
        sqlx::query_as::<_, FilamentRequest>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List requests tagged with a guest session token, newest first.
    pub async fn list_for_guest(
        pool: &PgPool,
        guest_token: &str,
    ) -> Result<Vec<FilamentRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM filament_requests WHERE guest_token = $1 ORDER BY id DESC"
        );
        sqlx::query_as::<_, FilamentRequest>(&query)
            .bind(guest_token)
            .fetch_all(pool)
            .await
    }

    /// List all filament requests, newest first. Admin surface.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<FilamentRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM filament_requests ORDER BY id DESC");
        sqlx::query_as::<_, FilamentRequest>(&query)
            .fetch_all(pool)
            .await
    }

    /// Move a request to `new_status`, appending the history row.
    ///
    /// On a fulfilled status the optional catalog `filament_id` is
    /// attached; it may be left unset if the filament was acquired
    /// outside the tracked catalog. Returns `None` when the request
    /// does not exist.
    pub async fn change_status(
        pool: &PgPool,
        id: DbId,
        new_status: FilamentRequestStatus,
        actor_id: DbId,
        reason: Option<&str>,
        filament_id: Option<DbId>,
    ) -> Result<Option<FilamentRequest>, sqlx::Error> {
        // Only a fulfilling transition may attach a filament.
        let attach = if new_status.is_fulfilled() {
            filament_id
        } else {
            None
        };

        let mut tx = pool.begin().await?;

        let update_query = format!(
            "UPDATE filament_requests SET \
                status = $2, \
                filament_id = COALESCE($3, filament_id), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        let request = sqlx::query_as::<_, FilamentRequest>(&update_query)
            .bind(id)
            .bind(new_status)
            .bind(attach)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(request) = request else {
            return Ok(None);
        };

        Self::insert_history(&mut tx, id, new_status, Some(actor_id), reason).await?;

        tx.commit().await?;
        Ok(Some(request))
    }

    /// Status history for a filament request, in append order.
    pub async fn history(
        pool: &PgPool,
        request_id: DbId,
    ) -> Result<Vec<FilamentRequestHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {HISTORY_COLUMNS} FROM filament_request_status_history \
             WHERE request_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, FilamentRequestHistoryEntry>(&query)
            .bind(request_id)
            .fetch_all(pool)
            .await
    }

    /// Append one status-history row inside an open transaction.
    async fn insert_history(
        tx: &mut Transaction<'_, Postgres>,
        request_id: DbId,
        status: FilamentRequestStatus,
        actor_id: Option<DbId>,
        note: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO filament_request_status_history \
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
