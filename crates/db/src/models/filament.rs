//! Filament inventory entity and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uberprints_core::types::{DbId, Timestamp};

use super::patch;

/// A row from the `filaments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Filament {
    pub id: DbId,
    pub name: String,
    pub material: String,
    pub brand: String,
    pub colour: String,
    pub stock_amount: f64,
    pub stock_unit: String,
    pub link: Option<String>,
    pub photo_url: Option<String>,
    /// Explicit availability flag; not derived from `stock_amount`.
    pub is_available: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /filaments`.
#[derive(Debug, Deserialize)]
pub struct CreateFilament {
    pub name: String,
    pub material: String,
    pub brand: String,
    pub colour: String,
    pub stock_amount: Option<f64>,
    pub stock_unit: Option<String>,
    pub link: Option<String>,
    pub photo_url: Option<String>,
    pub is_available: Option<bool>,
}

/// DTO for `PATCH /filaments/{id}`. Absent fields are left untouched;
/// `link` and `photo_url` are clearable with an explicit `null`.
#[derive(Debug, Deserialize)]
pub struct UpdateFilament {
    pub name: Option<String>,
    pub material: Option<String>,
    pub brand: Option<String>,
    pub colour: Option<String>,
    pub stock_unit: Option<String>,
    #[serde(default, deserialize_with = "patch::clearable")]
    pub link: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::clearable")]
    pub photo_url: Option<Option<String>>,
    pub is_available: Option<bool>,
}

/// DTO for the stock ledger: `PUT /filaments/{id}/stock`.
///
/// The amount is an absolute set (an admin reconciling physical
/// inventory), never an increment.
#[derive(Debug, Deserialize)]
pub struct SetStock {
    pub stock_amount: f64,
}
