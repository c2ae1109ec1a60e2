//! Repository for printers and telemetry ingestion.

use sqlx::PgPool;
use uberprints_core::types::DbId;

use crate::models::printer::{
    CreatePrinter, Printer, PrinterStatusHistoryEntry, TelemetrySnapshot, UpdatePrinter,
};
use crate::models::status::PrinterState;

/// Column list for `printers` SELECT queries.
const COLUMNS: &str = "\
    id, name, address, api_key, is_active, location, state, \
    nozzle_temp, nozzle_temp_target, bed_temp, bed_temp_target, \
    progress, time_remaining_secs, time_printing_secs, axis_z_mm, \
    fan_hotend_rpm, fan_print_rpm, flow_percent, speed_percent, \
    job_file_name, last_status_update, created_at, updated_at";

/// Column list for `printer_status_history` SELECT queries.
const HISTORY_COLUMNS: &str =
    "id, printer_id, state, nozzle_temp, bed_temp, progress, job_file_name, created_at";

/// Provides CRUD and telemetry ingestion for managed printers.
pub struct PrinterRepo;

impl PrinterRepo {
    /// Register a new printer.
    pub async fn create(pool: &PgPool, input: &CreatePrinter) -> Result<Printer, sqlx::Error> {
        let query = format!(
            "INSERT INTO printers (name, address, api_key, location, is_active) \
             VALUES ($1, $2, $3, $4, COALESCE($5, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Printer>(&query)
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.api_key)
            .bind(&input.location)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a printer by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Printer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM printers WHERE id = $1");
        sqlx::query_as::<_, Printer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List printers; optionally only those flagged active (the set
    /// the telemetry poller visits).
    pub async fn list(pool: &PgPool, active_only: bool) -> Result<Vec<Printer>, sqlx::Error> {
        let query = if active_only {
            format!("SELECT {COLUMNS} FROM printers WHERE is_active ORDER BY name")
        } else {
            format!("SELECT {COLUMNS} FROM printers ORDER BY name")
        };
        sqlx::query_as::<_, Printer>(&query).fetch_all(pool).await
    }

    /// Patch a printer's managed fields. Absent fields are untouched.
    ///
    /// `location` is nullable, so it takes a presence flag plus value
    /// instead of COALESCE; a present NULL clears the column.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePrinter,
    ) -> Result<Option<Printer>, sqlx::Error> {
        let query = format!(
            "UPDATE printers SET \
                name = COALESCE($2, name), \
                address = COALESCE($3, address), \
                api_key = COALESCE($4, api_key), \
                location = CASE WHEN $5 THEN $6 ELSE location END, \
                is_active = COALESCE($7, is_active), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Printer>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.api_key)
            .bind(input.location.is_some())
            .bind(input.location.as_ref().and_then(|v| v.as_deref()))
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a printer; its status history cascades with it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM printers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply one telemetry snapshot.
    ///
    /// Every telemetry column is overwritten from the snapshot --
    /// values absent from the snapshot become NULL, not "unchanged".
    /// Sets `last_status_update` and appends one history row, all in
    /// one transaction. Returns `None` when the printer is missing.
    pub async fn apply_snapshot(
        pool: &PgPool,
        id: DbId,
        snapshot: &TelemetrySnapshot,
    ) -> Result<Option<Printer>, sqlx::Error> {
        let state = snapshot.state.unwrap_or(PrinterState::Unknown);

        let mut tx = pool.begin().await?;

        let update_query = format!(
            "UPDATE printers SET \
                state = $2, nozzle_temp = $3, nozzle_temp_target = $4, \
                bed_temp = $5, bed_temp_target = $6, progress = $7, \
                time_remaining_secs = $8, time_printing_secs = $9, \
                axis_z_mm = $10, fan_hotend_rpm = $11, fan_print_rpm = $12, \
                flow_percent = $13, speed_percent = $14, job_file_name = $15, \
                last_status_update = NOW(), updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let printer = sqlx::query_as::<_, Printer>(&update_query)
            .bind(id)
            .bind(state)
            .bind(snapshot.nozzle_temp)
            .bind(snapshot.nozzle_temp_target)
            .bind(snapshot.bed_temp)
            .bind(snapshot.bed_temp_target)
            .bind(snapshot.progress)
            .bind(snapshot.time_remaining_secs)
            .bind(snapshot.time_printing_secs)
            .bind(snapshot.axis_z_mm)
            .bind(snapshot.fan_hotend_rpm)
            .bind(snapshot.fan_print_rpm)
            .bind(snapshot.flow_percent)
            .bind(snapshot.speed_percent)
            .bind(&snapshot.job_file_name)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(printer) = printer else {
            return Ok(None);
        };

        sqlx::query(
            "INSERT INTO printer_status_history \
                (printer_id, state, nozzle_temp, bed_temp, progress, job_file_name) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(id)
        .bind(state)
        .bind(snapshot.nozzle_temp)
        .bind(snapshot.bed_temp)
        .bind(snapshot.progress)
        .bind(&snapshot.job_file_name)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(printer))
    }

    /// Recent status history for a printer, newest first.
    pub async fn history(
        pool: &PgPool,
        printer_id: DbId,
        limit: i64,
    ) -> Result<Vec<PrinterStatusHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {HISTORY_COLUMNS} FROM printer_status_history \
             WHERE printer_id = $1 ORDER BY id DESC LIMIT $2"
        );
        sqlx::query_as::<_, PrinterStatusHistoryEntry>(&query)
            .bind(printer_id)
            .bind(limit.min(500))
            .fetch_all(pool)
            .await
    }
}
