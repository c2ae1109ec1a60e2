//! Handlers for session and identity endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uberprints_core::error::CoreError;
use uberprints_core::Actor;
use uberprints_db::models::user::{CreateGuestSession, UpsertDiscordUser, User};
use uberprints_db::repositories::UserRepo;
use uuid::Uuid;

use crate::auth::jwt::{generate_access_token, ROLE_ADMIN, ROLE_MEMBER};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthActor;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for a fresh guest session.
///
/// The token is the guest's only credential; it is returned exactly
/// once, here.
#[derive(Debug, Serialize)]
pub struct GuestSessionResponse {
    pub token: String,
    pub user: User,
}

/// Response body for the token-exchange endpoint.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub user: User,
}

/// Response body for `GET /auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub kind: &'static str,
    pub user: User,
}

/// POST /auth/guest
///
/// Create an anonymous guest session. The generated token tags every
/// request the guest submits and is the only way to get back to them.
pub async fn create_guest(
    State(state): State<AppState>,
    Json(input): Json<CreateGuestSession>,
) -> AppResult<(StatusCode, Json<DataResponse<GuestSessionResponse>>)> {
    let token = Uuid::new_v4().to_string();
    let username = input.username.as_deref().unwrap_or("guest");

    let user = UserRepo::create_guest(&state.pool, &token, username).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: GuestSessionResponse { token, user },
        }),
    ))
}

/// POST /auth/token
///
/// Exchange a verified Discord identity for a JWT. The caller is the
/// OAuth callback relay, which has already verified the identity with
/// Discord; this endpoint only mints the local session.
pub async fn token_exchange(
    State(state): State<AppState>,
    Json(input): Json<UpsertDiscordUser>,
) -> AppResult<Json<DataResponse<TokenResponse>>> {
    if input.discord_id.is_empty() || input.username.is_empty() {
        return Err(AppError::Core(CoreError::InvalidArgument(
            "discord_id and username are required".into(),
        )));
    }

    let user = UserRepo::upsert_discord(&state.pool, &input).await?;

    let role = if user.is_admin { ROLE_ADMIN } else { ROLE_MEMBER };
    let access_token = generate_access_token(user.id, role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    Ok(Json(DataResponse {
        data: TokenResponse { access_token, user },
    }))
}

/// GET /auth/me
///
/// Resolve the calling actor back to its user row.
pub async fn me(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
) -> AppResult<Json<DataResponse<MeResponse>>> {
    let (kind, user) = match &actor {
        Actor::Guest { token } => {
            let user = UserRepo::find_by_guest_token(&state.pool, token)
                .await?
                .ok_or_else(|| CoreError::Unauthorized("Unknown guest token".into()))?;
            ("guest", user)
        }
        Actor::Member { user_id } | Actor::Admin { user_id } => {
            let user = UserRepo::find_by_id(&state.pool, *user_id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "user",
                    id: *user_id,
                })?;
            let kind = if actor.is_admin() { "admin" } else { "member" };
            (kind, user)
        }
    };

    Ok(Json(DataResponse {
        data: MeResponse { kind, user },
    }))
}
