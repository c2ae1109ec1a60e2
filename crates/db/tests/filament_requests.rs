//! Integration tests for filament acquisition requests.

use sqlx::PgPool;
use uberprints_db::models::filament::CreateFilament;
use uberprints_db::models::filament_request::CreateFilamentRequest;
use uberprints_db::models::status::FilamentRequestStatus;
use uberprints_db::models::user::UpsertDiscordUser;
use uberprints_db::repositories::{FilamentRepo, FilamentRequestRepo, UserRepo};

fn new_request(material: &str) -> CreateFilamentRequest {
    CreateFilamentRequest {
        requester_name: "ada".to_string(),
        material: material.to_string(),
        brand: Some("Prusament".to_string()),
        colour: Some("Orange".to_string()),
        link: None,
        notes: None,
    }
}

async fn admin_id(pool: &PgPool) -> i64 {
    UserRepo::upsert_discord(
        pool,
        &UpsertDiscordUser {
            discord_id: "admin#0001".to_string(),
            username: "admin".to_string(),
            is_admin: Some(true),
        },
    )
    .await
    .unwrap()
    .id
}

#[sqlx::test]
async fn create_starts_pending_with_history(pool: PgPool) {
    let request = FilamentRequestRepo::create(&pool, None, Some("tok"), &new_request("PETG"))
        .await
        .unwrap();

    assert_eq!(request.status, FilamentRequestStatus::Pending);
    assert_eq!(request.filament_id, None);

    let history = FilamentRequestRepo::history(&pool, request.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, FilamentRequestStatus::Pending);
}

#[sqlx::test]
async fn fulfilling_transition_attaches_filament(pool: PgPool) {
    let admin = admin_id(&pool).await;
    let filament = FilamentRepo::create(
        &pool,
        &CreateFilament {
            name: "orange petg".to_string(),
            material: "PETG".to_string(),
            brand: "Prusament".to_string(),
            colour: "Orange".to_string(),
            stock_amount: None,
            stock_unit: None,
            link: None,
            photo_url: None,
            is_available: None,
        },
    )
    .await
    .unwrap();

    let request = FilamentRequestRepo::create(&pool, None, Some("tok"), &new_request("PETG"))
        .await
        .unwrap();

    let updated = FilamentRequestRepo::change_status(
        &pool,
        request.id,
        FilamentRequestStatus::Received,
        admin,
        Some("arrived"),
        Some(filament.id),
    )
    .await
    .unwrap()
    .expect("request exists");

    assert_eq!(updated.status, FilamentRequestStatus::Received);
    assert_eq!(updated.filament_id, Some(filament.id));

    let history = FilamentRequestRepo::history(&pool, request.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].note.as_deref(), Some("arrived"));
    assert_eq!(history[1].changed_by_user_id, Some(admin));
}

#[sqlx::test]
async fn non_fulfilling_transition_never_attaches_filament(pool: PgPool) {
    let admin = admin_id(&pool).await;
    let request = FilamentRequestRepo::create(&pool, None, Some("tok"), &new_request("PETG"))
        .await
        .unwrap();

    // A filament id supplied on a non-fulfilled transition is ignored.
    let updated = FilamentRequestRepo::change_status(
        &pool,
        request.id,
        FilamentRequestStatus::Ordered,
        admin,
        None,
        Some(12345),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.status, FilamentRequestStatus::Ordered);
    assert_eq!(updated.filament_id, None);
}

#[sqlx::test]
async fn fulfilled_without_filament_stays_unset(pool: PgPool) {
    let admin = admin_id(&pool).await;
    let request = FilamentRequestRepo::create(&pool, None, Some("tok"), &new_request("ASA"))
        .await
        .unwrap();

    let updated = FilamentRequestRepo::change_status(
        &pool,
        request.id,
        FilamentRequestStatus::Received,
        admin,
        None,
        None,
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.status, FilamentRequestStatus::Received);
    assert_eq!(updated.filament_id, None);
}
