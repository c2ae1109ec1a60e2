//! Status-change notifications for print requests.
//!
//! When an admin moves a request to a new status and the requester
//! opted in, a [`StatusNotification`] is posted as JSON to an external
//! webhook (typically a Discord relay). Delivery is fire-and-forget:
//! failures are logged and never surfaced to the request that
//! triggered them.

pub mod notification;
pub mod webhook;

pub use notification::StatusNotification;
pub use webhook::{Notifier, WebhookError};
