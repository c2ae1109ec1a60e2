//! Webhook delivery with exponential-backoff retry.
//!
//! [`Notifier`] sends a JSON-encoded [`StatusNotification`] to an
//! external URL via HTTP POST. Failed attempts are retried up to three
//! times with exponential backoff (1 s, 2 s, 4 s).

use std::time::Duration;

use crate::notification::StatusNotification;

/// Retry delays in seconds (exponential backoff: 1s, 2s, 4s).
const RETRY_DELAYS_SECS: [u64; 3] = [1, 2, 4];

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for webhook delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Delivers status notifications to a configured webhook endpoint.
///
/// With no URL configured the notifier is a no-op.
pub struct Notifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl Notifier {
    /// Create a notifier with a pre-configured HTTP client.
    pub fn new(webhook_url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            webhook_url,
        }
    }

    /// Whether deliveries will actually be sent anywhere.
    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Dispatch a notification in the background.
    ///
    /// Spawns a task so the caller's response is never held up by the
    /// webhook. Delivery failures are logged, not returned.
    pub fn dispatch(&self, notification: StatusNotification) {
        let Some(url) = self.webhook_url.clone() else {
            tracing::debug!(
                request_id = notification.request_id,
                "No webhook URL configured, dropping notification"
            );
            return;
        };

        let client = self.client.clone();
        tokio::spawn(async move {
            if let Err(e) = deliver(&client, &url, &notification).await {
                tracing::error!(
                    request_id = notification.request_id,
                    error = %e,
                    "Status notification delivery failed after all retries"
                );
            }
        });
    }
}

/// Deliver a notification payload to a webhook URL with retry.
///
/// Makes up to four attempts, backing off between them. Returns
/// `Ok(())` on the first success, or the error of the final attempt.
async fn deliver(
    client: &reqwest::Client,
    url: &str,
    notification: &StatusNotification,
) -> Result<(), WebhookError> {
    let mut attempt = 0;
    loop {
        match try_send(client, url, notification).await {
            Ok(()) => return Ok(()),
            Err(e) => {
                let Some(delay_secs) = RETRY_DELAYS_SECS.get(attempt) else {
                    return Err(e);
                };
                tracing::warn!(
                    attempt = attempt + 1,
                    url,
                    error = %e,
                    "Notification delivery attempt failed, retrying"
                );
                tokio::time::sleep(Duration::from_secs(*delay_secs)).await;
                attempt += 1;
            }
        }
    }
}

/// Execute a single POST request and check the response status.
async fn try_send(
    client: &reqwest::Client,
    url: &str,
    notification: &StatusNotification,
) -> Result<(), WebhookError> {
    let response = client.post(url).json(notification).send().await?;
    if !response.status().is_success() {
        return Err(WebhookError::HttpStatus(response.status().as_u16()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
