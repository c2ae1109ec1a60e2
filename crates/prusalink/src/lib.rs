//! HTTP client for the PrusaLink printer API.
//!
//! PrusaLink exposes a plain REST API on the printer's network
//! address, authenticated with an `X-Api-Key` header. This crate
//! fetches the status and job endpoints and maps the wire payload
//! into the platform's [`TelemetrySnapshot`].

pub mod client;
pub mod wire;

pub use client::{PrusaLinkClient, PrusaLinkError};
