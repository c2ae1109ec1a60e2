//! Response envelope.

use serde::Serialize;

/// The `{ "data": T }` envelope every successful endpoint returns.
///
/// Errors use the `{ "error", "code" }` shape from [`crate::error`]
/// instead, so a client can tell the two apart by key.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
