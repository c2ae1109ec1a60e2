//! Wire DTOs for the PrusaLink v1 API and the mapping into
//! [`TelemetrySnapshot`].

use serde::Deserialize;
use uberprints_db::models::printer::TelemetrySnapshot;
use uberprints_db::models::status::PrinterState;

/// Response body of `GET /api/v1/status`.
#[derive(Debug, Default, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub printer: PrinterSection,
    #[serde(default)]
    pub job: Option<JobSection>,
}

/// The `printer` section of a status response.
#[derive(Debug, Default, Deserialize)]
pub struct PrinterSection {
    /// Upper-case state name, e.g. `"PRINTING"`.
    pub state: Option<String>,
    pub temp_nozzle: Option<f64>,
    pub target_nozzle: Option<f64>,
    pub temp_bed: Option<f64>,
    pub target_bed: Option<f64>,
    pub axis_z: Option<f64>,
    pub fan_hotend: Option<i32>,
    pub fan_print: Option<i32>,
    pub flow: Option<i32>,
    pub speed: Option<i32>,
}

/// The `job` section of a status response; absent when idle.
#[derive(Debug, Default, Deserialize)]
pub struct JobSection {
    pub id: Option<i64>,
    pub progress: Option<f64>,
    pub time_remaining: Option<i64>,
    pub time_printing: Option<i64>,
}

/// Response body of `GET /api/v1/job`; 204 when no job is active.
#[derive(Debug, Default, Deserialize)]
pub struct JobResponse {
    #[serde(default)]
    pub file: Option<JobFile>,
}

/// The `file` section of a job response.
#[derive(Debug, Default, Deserialize)]
pub struct JobFile {
    pub name: Option<String>,
    pub display_name: Option<String>,
}

/// Map a PrusaLink state name onto [`PrinterState`].
///
/// Names the firmware may add later fall back to `Unknown` rather
/// than failing the poll.
pub fn map_state(raw: &str) -> PrinterState {
    match raw.to_ascii_uppercase().as_str() {
        "IDLE" => PrinterState::Idle,
        "READY" => PrinterState::Ready,
        "BUSY" | "ATTENTION" => PrinterState::Busy,
        "PRINTING" => PrinterState::Printing,
        "PAUSED" => PrinterState::Paused,
        "STOPPED" => PrinterState::Stopped,
        "FINISHED" => PrinterState::Finished,
        "ERROR" => PrinterState::Error,
        _ => PrinterState::Unknown,
    }
}

/// Combine the status and job payloads into one snapshot.
///
/// Fields absent from the wire stay `None` and land as NULL when the
/// snapshot is applied -- last-known-value semantics are per poll,
/// not per field.
pub fn into_snapshot(status: StatusResponse, job: Option<JobResponse>) -> TelemetrySnapshot {
    let file_name = job.and_then(|j| j.file).and_then(|f| f.display_name.or(f.name));

    TelemetrySnapshot {
        state: status.printer.state.as_deref().map(map_state),
        nozzle_temp: status.printer.temp_nozzle,
        nozzle_temp_target: status.printer.target_nozzle,
        bed_temp: status.printer.temp_bed,
        bed_temp_target: status.printer.target_bed,
        progress: status.job.as_ref().and_then(|j| j.progress),
        time_remaining_secs: status.job.as_ref().and_then(|j| j.time_remaining),
        time_printing_secs: status.job.as_ref().and_then(|j| j.time_printing),
        axis_z_mm: status.printer.axis_z,
        fan_hotend_rpm: status.printer.fan_hotend,
        fan_print_rpm: status.printer.fan_print,
        flow_percent: status.printer.flow,
        speed_percent: status.printer.speed,
        job_file_name: file_name,
    }
}
