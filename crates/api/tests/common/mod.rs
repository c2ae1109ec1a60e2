//! Shared helpers for HTTP-level integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use uberprints_api::auth::jwt::{generate_access_token, JwtConfig, ROLE_ADMIN, ROLE_MEMBER};
use uberprints_api::config::ServerConfig;
use uberprints_api::router::build_app_router;
use uberprints_api::state::AppState;
use uberprints_db::models::user::{UpsertDiscordUser, User};
use uberprints_db::repositories::UserRepo;
use uberprints_notify::Notifier;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        notify_webhook_url: None,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool.
///
/// This mirrors the router construction in `main.rs` so integration
/// tests exercise the same middleware stack that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        notifier: Arc::new(Notifier::new(None)),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Issue a request with an optional JSON body and extra headers.
pub async fn request(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    headers: &[(&str, &str)],
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    request(app, Method::GET, uri, None, &[]).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let bearer = format!("Bearer {token}");
    request(app, Method::GET, uri, None, &[("authorization", &bearer)]).await
}

pub async fn get_guest(app: Router, uri: &str, token: &str) -> Response<Body> {
    request(app, Method::GET, uri, None, &[("x-guest-token", token)]).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    request(app, Method::POST, uri, Some(body), &[]).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let bearer = format!("Bearer {token}");
    request(app, Method::POST, uri, Some(body), &[("authorization", &bearer)]).await
}

pub async fn post_json_guest(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    request(app, Method::POST, uri, Some(body), &[("x-guest-token", token)]).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let bearer = format!("Bearer {token}");
    request(app, Method::PATCH, uri, Some(body), &[("authorization", &bearer)]).await
}

pub async fn patch_json_guest(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    request(app, Method::PATCH, uri, Some(body), &[("x-guest-token", token)]).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let bearer = format!("Bearer {token}");
    request(app, Method::PUT, uri, Some(body), &[("authorization", &bearer)]).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let bearer = format!("Bearer {token}");
    request(app, Method::DELETE, uri, None, &[("authorization", &bearer)]).await
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Identity helpers
// ---------------------------------------------------------------------------

/// Create an admin user directly in the database and mint a JWT for it.
pub async fn admin_identity(pool: &PgPool) -> (User, String) {
    let user = UserRepo::upsert_discord(
        pool,
        &UpsertDiscordUser {
            discord_id: "admin#test".to_string(),
            username: "test-admin".to_string(),
            is_admin: Some(true),
        },
    )
    .await
    .expect("admin creation should succeed");

    let token = generate_access_token(user.id, ROLE_ADMIN, &test_config().jwt)
        .expect("token generation should succeed");
    (user, token)
}

/// Create a non-admin member and mint a JWT for it.
pub async fn member_identity(pool: &PgPool, discord_id: &str) -> (User, String) {
    let user = UserRepo::upsert_discord(
        pool,
        &UpsertDiscordUser {
            discord_id: discord_id.to_string(),
            username: discord_id.to_string(),
            is_admin: None,
        },
    )
    .await
    .expect("member creation should succeed");

    let token = generate_access_token(user.id, ROLE_MEMBER, &test_config().jwt)
        .expect("token generation should succeed");
    (user, token)
}

/// Create a guest session via the API and return its bearer token.
pub async fn guest_session(app: Router, username: &str) -> String {
    let response = post_json(
        app,
        "/api/v1/auth/guest",
        serde_json::json!({ "username": username }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    json["data"]["token"]
        .as_str()
        .expect("guest session must return a token")
        .to_string()
}
