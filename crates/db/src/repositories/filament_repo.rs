//! Repository for the `filaments` table, including the stock ledger.

use sqlx::PgPool;
use uberprints_core::types::DbId;

use crate::models::filament::{CreateFilament, Filament, UpdateFilament};

/// Column list for `filaments` SELECT queries.
const COLUMNS: &str = "\
    id, name, material, brand, colour, stock_amount, stock_unit, \
    link, photo_url, is_available, created_at, updated_at";

/// Provides CRUD and stock operations for the filament catalog.
pub struct FilamentRepo;

impl FilamentRepo {
    /// Insert a new filament.
    pub async fn create(pool: &PgPool, input: &CreateFilament) -> Result<Filament, sqlx::Error> {
        let query = format!(
            "INSERT INTO filaments \
                (name, material, brand, colour, stock_amount, stock_unit, \
                 link, photo_url, is_available) \
             VALUES ($1, $2, $3, $4, COALESCE($5, 0), COALESCE($6, 'g'), \
                     $7, $8, COALESCE($9, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Filament>(&query)
            .bind(&input.name)
            .bind(&input.material)
            .bind(&input.brand)
            .bind(&input.colour)
            .bind(input.stock_amount)
            .bind(&input.stock_unit)
            .bind(&input.link)
            .bind(&input.photo_url)
            .bind(input.is_available)
            .fetch_one(pool)
            .await
    }

    /// Find a filament by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Filament>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM filaments WHERE id = $1");
        sqlx::query_as::<_, Filament>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List filaments. Non-admin callers only see available ones.
    pub async fn list(pool: &PgPool, include_unavailable: bool) -> Result<Vec<Filament>, sqlx::Error> {
        let query = if include_unavailable {
            format!("SELECT {COLUMNS} FROM filaments ORDER BY name")
        } else {
            format!("SELECT {COLUMNS} FROM filaments WHERE is_available ORDER BY name")
        };
        sqlx::query_as::<_, Filament>(&query).fetch_all(pool).await
    }

    /// Patch a filament's catalog fields. Absent fields are untouched.
    ///
    /// `link` and `photo_url` are nullable, so they take a presence
    /// flag plus value instead of COALESCE; a present NULL clears the
    /// column.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFilament,
    ) -> Result<Option<Filament>, sqlx::Error> {
        let query = format!(
            "UPDATE filaments SET \
                name = COALESCE($2, name), \
                material = COALESCE($3, material), \
                brand = COALESCE($4, brand), \
                colour = COALESCE($5, colour), \
                stock_unit = COALESCE($6, stock_unit), \
                link = CASE WHEN $7 THEN $8 ELSE link END, \
                photo_url = CASE WHEN $9 THEN $10 ELSE photo_url END, \
                is_available = COALESCE($11, is_available), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Filament>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.material)
            .bind(&input.brand)
            .bind(&input.colour)
            .bind(&input.stock_unit)
            .bind(input.link.is_some())
            .bind(input.link.as_ref().and_then(|v| v.as_deref()))
            .bind(input.photo_url.is_some())
            .bind(input.photo_url.as_ref().and_then(|v| v.as_deref()))
            .bind(input.is_available)
            .fetch_optional(pool)
            .await
    }

    /// Stock ledger: set the absolute stock amount.
    ///
    /// Negative amounts are rejected before this call at the handler
    /// level; the CHECK constraint backs that up.
    pub async fn set_stock(
        pool: &PgPool,
        id: DbId,
        stock_amount: f64,
    ) -> Result<Option<Filament>, sqlx::Error> {
        let query = format!(
            "UPDATE filaments SET stock_amount = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Filament>(&query)
            .bind(id)
            .bind(stock_amount)
            .fetch_optional(pool)
            .await
    }

    /// Delete a filament. Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM filaments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
