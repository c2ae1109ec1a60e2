//! Integration tests for printer telemetry ingestion.

use sqlx::PgPool;
use uberprints_db::models::printer::{CreatePrinter, TelemetrySnapshot};
use uberprints_db::models::status::PrinterState;
use uberprints_db::repositories::PrinterRepo;

fn new_printer(name: &str, address: &str) -> CreatePrinter {
    CreatePrinter {
        name: name.to_string(),
        address: address.to_string(),
        api_key: "secret".to_string(),
        location: None,
        is_active: None,
    }
}

fn printing_snapshot() -> TelemetrySnapshot {
    TelemetrySnapshot {
        state: Some(PrinterState::Printing),
        nozzle_temp: Some(215.3),
        nozzle_temp_target: Some(215.0),
        bed_temp: Some(60.1),
        bed_temp_target: Some(60.0),
        progress: Some(42.0),
        time_remaining_secs: Some(3600),
        time_printing_secs: Some(2400),
        axis_z_mm: Some(12.4),
        fan_hotend_rpm: Some(6000),
        fan_print_rpm: Some(4500),
        flow_percent: Some(100),
        speed_percent: Some(100),
        job_file_name: Some("benchy.gcode".to_string()),
    }
}

#[sqlx::test]
async fn snapshot_overwrites_all_telemetry(pool: PgPool) {
    let printer = PrinterRepo::create(&pool, &new_printer("mk4", "10.0.0.5")).await.unwrap();
    assert_eq!(printer.state, PrinterState::Unknown);
    assert!(printer.last_status_update.is_none());

    let updated = PrinterRepo::apply_snapshot(&pool, printer.id, &printing_snapshot())
        .await
        .unwrap()
        .expect("printer exists");

    assert_eq!(updated.state, PrinterState::Printing);
    assert_eq!(updated.nozzle_temp, Some(215.3));
    assert_eq!(updated.progress, Some(42.0));
    assert_eq!(updated.job_file_name.as_deref(), Some("benchy.gcode"));
    assert!(updated.last_status_update.is_some());
}

#[sqlx::test]
async fn absent_snapshot_fields_become_null(pool: PgPool) {
    let printer = PrinterRepo::create(&pool, &new_printer("mk4", "10.0.0.5")).await.unwrap();
    PrinterRepo::apply_snapshot(&pool, printer.id, &printing_snapshot())
        .await
        .unwrap()
        .unwrap();

    // An idle poll carries no job fields; last-known values are
    // all-or-nothing per snapshot, never merged per field.
    let idle = TelemetrySnapshot {
        state: Some(PrinterState::Idle),
        nozzle_temp: Some(28.0),
        bed_temp: Some(25.0),
        ..Default::default()
    };
    let updated = PrinterRepo::apply_snapshot(&pool, printer.id, &idle)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.state, PrinterState::Idle);
    assert_eq!(updated.progress, None);
    assert_eq!(updated.job_file_name, None);
    assert_eq!(updated.time_remaining_secs, None);
    assert_eq!(updated.nozzle_temp, Some(28.0));
}

#[sqlx::test]
async fn each_snapshot_appends_one_history_row(pool: PgPool) {
    let printer = PrinterRepo::create(&pool, &new_printer("mk4", "10.0.0.5")).await.unwrap();

    PrinterRepo::apply_snapshot(&pool, printer.id, &printing_snapshot())
        .await
        .unwrap()
        .unwrap();
    PrinterRepo::apply_snapshot(&pool, printer.id, &TelemetrySnapshot::default())
        .await
        .unwrap()
        .unwrap();

    let history = PrinterRepo::history(&pool, printer.id, 50).await.unwrap();
    assert_eq!(history.len(), 2);
    // Newest first: the default snapshot has no state and lands as unknown.
    assert_eq!(history[0].state, PrinterState::Unknown);
    assert_eq!(history[1].state, PrinterState::Printing);
}

#[sqlx::test]
async fn snapshot_for_missing_printer_returns_none(pool: PgPool) {
    let result = PrinterRepo::apply_snapshot(&pool, 9999, &TelemetrySnapshot::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test]
async fn deleting_printer_cascades_history(pool: PgPool) {
    let printer = PrinterRepo::create(&pool, &new_printer("mk4", "10.0.0.5")).await.unwrap();
    PrinterRepo::apply_snapshot(&pool, printer.id, &printing_snapshot())
        .await
        .unwrap()
        .unwrap();

    assert!(PrinterRepo::delete(&pool, printer.id).await.unwrap());

    let orphans: i64 = sqlx::query_scalar(
        "SELECT COUNT(*)::BIGINT FROM printer_status_history WHERE printer_id = $1",
    )
    .bind(printer.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(orphans, 0);
}

#[sqlx::test]
async fn duplicate_printer_address_is_rejected(pool: PgPool) {
    PrinterRepo::create(&pool, &new_printer("mk4-a", "10.0.0.5")).await.unwrap();
    let result = PrinterRepo::create(&pool, &new_printer("mk4-b", "10.0.0.5")).await;
    assert!(result.is_err(), "uq_printers_address must reject duplicates");
}
