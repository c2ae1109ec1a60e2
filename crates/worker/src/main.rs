//! Telemetry polling worker.
//!
//! Polls every active printer's PrusaLink API on a fixed interval and
//! writes the resulting snapshot through the printer repository. A
//! printer that cannot be reached gets an `offline` snapshot so the
//! dashboard reflects reality rather than the last good reading.

use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use uberprints_db::models::printer::TelemetrySnapshot;
use uberprints_db::models::status::PrinterState;
use uberprints_db::repositories::PrinterRepo;
use uberprints_db::DbPool;
use uberprints_prusalink::PrusaLinkClient;

/// Default seconds between poll rounds when POLL_INTERVAL_SECS is unset.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "uberprints_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let poll_interval = Duration::from_secs(
        std::env::var("POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
    );
    tracing::info!(interval_secs = poll_interval.as_secs(), "Loaded worker configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = uberprints_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    uberprints_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    // --- Poll loop ---
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                poll_all_printers(&pool).await;
            }
            () = shutdown_signal() => {
                break;
            }
        }
    }

    tracing::info!("Graceful shutdown complete");
}

/// Poll every active printer once and persist the results.
///
/// Failures are per-printer: one unreachable printer never blocks the
/// rest of the round.
async fn poll_all_printers(pool: &DbPool) {
    let printers = match PrinterRepo::list(pool, true).await {
        Ok(printers) => printers,
        Err(e) => {
            tracing::error!(error = %e, "Failed to list active printers, skipping round");
            return;
        }
    };

    if printers.is_empty() {
        tracing::debug!("No active printers to poll");
        return;
    }

    tracing::debug!(count = printers.len(), "Starting poll round");

    for printer in printers {
        let client = PrusaLinkClient::new(printer.id, &printer.address, &printer.api_key);

        let snapshot = match client.fetch_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(
                    printer_id = printer.id,
                    printer_name = %printer.name,
                    error = %e,
                    "Printer unreachable, marking offline"
                );
                TelemetrySnapshot {
                    state: Some(PrinterState::Offline),
                    ..TelemetrySnapshot::default()
                }
            }
        };

        match PrinterRepo::apply_snapshot(pool, printer.id, &snapshot).await {
            Ok(Some(updated)) => {
                tracing::debug!(
                    printer_id = updated.id,
                    state = %updated.state,
                    "Applied telemetry snapshot"
                );
            }
            Ok(None) => {
                // Deleted between the list and the write. Nothing to do.
                tracing::debug!(printer_id = printer.id, "Printer vanished mid-round");
            }
            Err(e) => {
                tracing::error!(
                    printer_id = printer.id,
                    error = %e,
                    "Failed to persist telemetry snapshot"
                );
            }
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
