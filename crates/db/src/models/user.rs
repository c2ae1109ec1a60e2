//! User entity and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uberprints_core::types::{DbId, Timestamp};

/// A row from the `users` table.
///
/// Exactly one of `discord_id` / `guest_token` is set: a user is
/// either an authenticated (Discord-identified) account or a guest
/// session. The two are never merged.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub discord_id: Option<String>,
    #[serde(skip_serializing)]
    pub guest_token: Option<String>,
    pub username: String,
    pub is_admin: bool,
    pub created_at: Timestamp,
}

/// DTO for the token-exchange endpoint used by the OAuth callback.
#[derive(Debug, Deserialize)]
pub struct UpsertDiscordUser {
    pub discord_id: String,
    pub username: String,
    /// Admin flag, decided by the out-of-scope OAuth layer.
    pub is_admin: Option<bool>,
}

/// Optional display name for a fresh guest session.
#[derive(Debug, Default, Deserialize)]
pub struct CreateGuestSession {
    pub username: Option<String>,
}
