//! Repository for the `users` table.

use sqlx::PgPool;
use uberprints_core::types::DbId;

use crate::models::user::{UpsertDiscordUser, User};

/// Column list for `users` SELECT queries.
const COLUMNS: &str = "id, discord_id, guest_token, username, is_admin, created_at";

/// Provides user lookup and identity creation.
pub struct UserRepo;

impl UserRepo {
    /// Create a guest user identified only by a bearer session token.
    ///
    /// A duplicate token violates `uq_users_guest_token` and surfaces
    /// as a Conflict at the API layer.
    pub async fn create_guest(
        pool: &PgPool,
        token: &str,
        username: &str,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (guest_token, username) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(token)
            .bind(username)
            .fetch_one(pool)
            .await
    }

    /// Create or refresh a Discord-identified user.
    ///
    /// Used by the token-exchange endpoint after the out-of-scope
    /// OAuth flow has verified the identity. The admin flag is only
    /// ever raised here, never lowered implicitly.
    pub async fn upsert_discord(
        pool: &PgPool,
        input: &UpsertDiscordUser,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (discord_id, username, is_admin) \
             VALUES ($1, $2, COALESCE($3, false)) \
             ON CONFLICT (discord_id) DO UPDATE SET \
                username = EXCLUDED.username, \
                is_admin = users.is_admin OR EXCLUDED.is_admin \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.discord_id)
            .bind(&input.username)
            .bind(input.is_admin)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a guest user by their session token.
    pub async fn find_by_guest_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE guest_token = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// List all users, newest first. Admin console surface.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY id DESC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }
}
