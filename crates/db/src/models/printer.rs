//! Printer entity, telemetry snapshot, and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uberprints_core::types::{DbId, Timestamp};

use super::patch;
use super::status::PrinterState;

/// A row from the `printers` table.
///
/// Telemetry columns carry last-known values and are overwritten
/// wholesale on every snapshot; there is no per-field merge.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Printer {
    pub id: DbId,
    pub name: String,
    pub address: String,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub is_active: bool,
    pub location: Option<String>,
    pub state: PrinterState,
    pub nozzle_temp: Option<f64>,
    pub nozzle_temp_target: Option<f64>,
    pub bed_temp: Option<f64>,
    pub bed_temp_target: Option<f64>,
    pub progress: Option<f64>,
    pub time_remaining_secs: Option<i64>,
    pub time_printing_secs: Option<i64>,
    pub axis_z_mm: Option<f64>,
    pub fan_hotend_rpm: Option<i32>,
    pub fan_print_rpm: Option<i32>,
    pub flow_percent: Option<i32>,
    pub speed_percent: Option<i32>,
    pub job_file_name: Option<String>,
    pub last_status_update: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the append-only `printer_status_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PrinterStatusHistoryEntry {
    pub id: DbId,
    pub printer_id: DbId,
    pub state: PrinterState,
    pub nozzle_temp: Option<f64>,
    pub bed_temp: Option<f64>,
    pub progress: Option<f64>,
    pub job_file_name: Option<String>,
    pub created_at: Timestamp,
}

/// One full telemetry reading for a printer.
///
/// Absent fields mean "unknown this poll" and land as NULL -- the
/// last-known-value semantics are all-or-nothing per snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub state: Option<PrinterState>,
    pub nozzle_temp: Option<f64>,
    pub nozzle_temp_target: Option<f64>,
    pub bed_temp: Option<f64>,
    pub bed_temp_target: Option<f64>,
    pub progress: Option<f64>,
    pub time_remaining_secs: Option<i64>,
    pub time_printing_secs: Option<i64>,
    pub axis_z_mm: Option<f64>,
    pub fan_hotend_rpm: Option<i32>,
    pub fan_print_rpm: Option<i32>,
    pub flow_percent: Option<i32>,
    pub speed_percent: Option<i32>,
    pub job_file_name: Option<String>,
}

/// DTO for `POST /printers`.
#[derive(Debug, Deserialize)]
pub struct CreatePrinter {
    pub name: String,
    pub address: String,
    pub api_key: String,
    pub location: Option<String>,
    pub is_active: Option<bool>,
}

/// DTO for `PATCH /printers/{id}`. `location` is clearable with an
/// explicit `null`.
#[derive(Debug, Deserialize)]
pub struct UpdatePrinter {
    pub name: Option<String>,
    pub address: Option<String>,
    pub api_key: Option<String>,
    #[serde(default, deserialize_with = "patch::clearable")]
    pub location: Option<Option<String>>,
    pub is_active: Option<bool>,
}
