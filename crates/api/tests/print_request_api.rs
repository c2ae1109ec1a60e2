//! HTTP-level integration tests for the print request lifecycle.

mod common;

use axum::http::StatusCode;
use common::{
    admin_identity, body_json, get_auth, get_guest, guest_session, patch_json_auth,
    patch_json_guest, post_json_auth, post_json_guest,
};
use sqlx::PgPool;

/// Create a request as a guest and return its id.
async fn create_guest_request(app: axum::Router, token: &str) -> i64 {
    let body = serde_json::json!({
        "requester_name": "Ada",
        "model_url": "https://www.printables.com/model/3161-benchy",
        "notes": "PLA please",
    });
    let response = post_json_guest(app, "/api/v1/print-requests", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_i64().expect("created request has id")
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn guest_creates_request_with_pending_status(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = guest_session(app.clone(), "ada").await;

    let body = serde_json::json!({
        "requester_name": "Ada",
        "model_url": "https://example.com/benchy.stl",
    });
    let response = post_json_guest(app.clone(), "/api/v1/print-requests", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "pending");
    assert_eq!(json["data"]["requester_name"], "Ada");
    // The guest token is a credential and never serialized back.
    assert!(json["data"].get("guest_token").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_model_url_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = guest_session(app.clone(), "ada").await;

    let body = serde_json::json!({
        "requester_name": "Ada",
        "model_url": "not a url",
    });
    let response = post_json_guest(app.clone(), "/api/v1/print-requests", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_ARGUMENT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unauthenticated_create_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "requester_name": "Nobody",
        "model_url": "https://example.com/thing.stl",
    });
    let response = common::post_json(app, "/api/v1/print-requests", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Status changes and history
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn status_change_appends_history(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = guest_session(app.clone(), "ada").await;
    let id = create_guest_request(app.clone(), &token).await;
    let (_admin, admin_token) = admin_identity(&pool).await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/print-requests/{id}/status"),
        serde_json::json!({ "status": "accepted", "note": "queue is short" }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "accepted");

    // History: initial pending row plus the accepted row, in order.
    let response = get_guest(
        app.clone(),
        &format!("/api/v1/print-requests/{id}/history"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let entries = json["data"].as_array().expect("history is an array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["status"], "pending");
    assert_eq!(entries[1]["status"], "accepted");
    assert_eq!(entries[1]["note"], "queue is short");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn owner_edit_is_logged_and_blocked_after_acceptance(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = guest_session(app.clone(), "ada").await;
    let id = create_guest_request(app.clone(), &token).await;
    let (_admin, admin_token) = admin_identity(&pool).await;

    // Pending: the owner may still edit submission fields.
    let response = patch_json_guest(
        app.clone(),
        &format!("/api/v1/print-requests/{id}"),
        serde_json::json!({ "notes": "PETG actually" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["notes"], "PETG actually");

    // The edit landed in the change log (admin surface).
    let response = get_auth(
        app.clone(),
        &format!("/api/v1/print-requests/{id}/changes"),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let changes = json["data"].as_array().unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0]["field"], "notes");

    // Past accepted, owner edits are rejected as invalid.
    post_json_auth(
        app.clone(),
        &format!("/api/v1/print-requests/{id}/status"),
        serde_json::json!({ "status": "delivering" }),
        &admin_token,
    )
    .await;

    let response = patch_json_guest(
        app.clone(),
        &format!("/api/v1/print-requests/{id}"),
        serde_json::json!({ "notes": "too late" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn explicit_null_clears_notes(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = guest_session(app.clone(), "ada").await;
    let id = create_guest_request(app.clone(), &token).await;

    // A patch that omits notes leaves them untouched.
    let response = patch_json_guest(
        app.clone(),
        &format!("/api/v1/print-requests/{id}"),
        serde_json::json!({ "needs_delivery": true }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["notes"], "PLA please");

    // An explicit null clears them.
    let response = patch_json_guest(
        app.clone(),
        &format!("/api/v1/print-requests/{id}"),
        serde_json::json!({ "notes": null }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["notes"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_can_unset_assignment_fields(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = guest_session(app.clone(), "ada").await;
    let id = create_guest_request(app.clone(), &token).await;
    let (_admin, admin_token) = admin_identity(&pool).await;

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/v1/print-requests/{id}/admin"),
        serde_json::json!({ "gcode_url": "https://files.example.com/benchy.gcode" }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/v1/print-requests/{id}/admin"),
        serde_json::json!({ "gcode_url": null }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["gcode_url"].is_null());

    // Both the set and the clear landed in the change log.
    let response = get_auth(
        app.clone(),
        &format!("/api/v1/print-requests/{id}/changes"),
        &admin_token,
    )
    .await;
    let json = body_json(response).await;
    let changes = json["data"].as_array().unwrap();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0]["field"], "gcode_url");
    assert_eq!(changes[1]["new_value"], "null");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn noop_patch_writes_no_change_rows(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = guest_session(app.clone(), "ada").await;
    let id = create_guest_request(app.clone(), &token).await;
    let (_admin, admin_token) = admin_identity(&pool).await;

    // Patch the name to its current value.
    let response = patch_json_guest(
        app.clone(),
        &format!("/api/v1/print-requests/{id}"),
        serde_json::json!({ "requester_name": "Ada" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(
        app.clone(),
        &format!("/api/v1/print-requests/{id}/changes"),
        &admin_token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn mine_lists_only_own_requests(pool: PgPool) {
    let app = common::build_test_app(pool);
    let ada = guest_session(app.clone(), "ada").await;
    let grace = guest_session(app.clone(), "grace").await;

    create_guest_request(app.clone(), &ada).await;
    create_guest_request(app.clone(), &grace).await;
    create_guest_request(app.clone(), &grace).await;

    let response = get_guest(app.clone(), "/api/v1/print-requests/mine", &ada).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let response = get_guest(app.clone(), "/api/v1/print-requests/mine", &grace).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn all_supports_status_filter(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = guest_session(app.clone(), "ada").await;
    let id = create_guest_request(app.clone(), &token).await;
    create_guest_request(app.clone(), &token).await;
    let (_admin, admin_token) = admin_identity(&pool).await;

    post_json_auth(
        app.clone(),
        &format!("/api/v1/print-requests/{id}/status"),
        serde_json::json!({ "status": "completed" }),
        &admin_token,
    )
    .await;

    let response = get_auth(
        app.clone(),
        "/api/v1/print-requests/all?status=completed",
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"].as_i64(), Some(id));
}
