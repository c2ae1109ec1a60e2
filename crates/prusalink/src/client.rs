//! HTTP client for a single PrusaLink printer.

use std::time::Duration;

use uberprints_core::types::DbId;
use uberprints_db::models::printer::TelemetrySnapshot;

use crate::wire::{self, JobResponse, StatusResponse};

/// HTTP request timeout for one PrusaLink call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from talking to a PrusaLink printer.
#[derive(Debug, thiserror::Error)]
pub enum PrusaLinkError {
    /// The printer was unreachable or the request failed in transit.
    #[error("Request to printer failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The printer answered with a non-success status code.
    #[error("Printer returned HTTP {0}")]
    HttpStatus(u16),
}

/// Client for one printer's PrusaLink API.
///
/// Holds the printer's database id, its network address, and the API
/// key used for the `X-Api-Key` header.
pub struct PrusaLinkClient {
    printer_id: DbId,
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl PrusaLinkClient {
    /// Create a client for a specific printer.
    ///
    /// * `printer_id` - database row id for this printer.
    /// * `address`    - host or host:port, e.g. `10.0.0.5`.
    /// * `api_key`    - PrusaLink API key.
    pub fn new(printer_id: DbId, address: &str, api_key: &str) -> Self {
        let base_url = if address.starts_with("http://") || address.starts_with("https://") {
            address.trim_end_matches('/').to_string()
        } else {
            format!("http://{address}")
        };

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");

        Self {
            printer_id,
            base_url,
            api_key: api_key.to_string(),
            http,
        }
    }

    /// Database row id of this printer.
    pub fn printer_id(&self) -> DbId {
        self.printer_id
    }

    /// Fetch `GET /api/v1/status`.
    pub async fn status(&self) -> Result<StatusResponse, PrusaLinkError> {
        self.get_json("/api/v1/status").await
    }

    /// Fetch `GET /api/v1/job`; `None` when no job is active (204).
    pub async fn job(&self) -> Result<Option<JobResponse>, PrusaLinkError> {
        let url = format!("{}{}", self.base_url, "/api/v1/job");
        let response = self
            .http
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(PrusaLinkError::HttpStatus(response.status().as_u16()));
        }
        Ok(Some(response.json::<JobResponse>().await?))
    }

    /// Fetch one full telemetry snapshot (status plus job file name).
    ///
    /// A failing job lookup degrades to a snapshot without a file
    /// name rather than failing the whole poll.
    pub async fn fetch_snapshot(&self) -> Result<TelemetrySnapshot, PrusaLinkError> {
        let status = self.status().await?;

        let job = match self.job().await {
            Ok(job) => job,
            Err(e) => {
                tracing::debug!(
                    printer_id = self.printer_id,
                    error = %e,
                    "Job lookup failed, applying snapshot without file name"
                );
                None
            }
        };

        Ok(wire::into_snapshot(status, job))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, PrusaLinkError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PrusaLinkError::HttpStatus(response.status().as_u16()));
        }
        Ok(response.json::<T>().await?)
    }
}
