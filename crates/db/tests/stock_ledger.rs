//! Integration tests for the filament catalog and stock ledger.

use sqlx::PgPool;
use uberprints_db::models::filament::{CreateFilament, UpdateFilament};
use uberprints_db::repositories::FilamentRepo;

fn new_filament(name: &str) -> CreateFilament {
    CreateFilament {
        name: name.to_string(),
        material: "PLA".to_string(),
        brand: "Prusament".to_string(),
        colour: "Galaxy Black".to_string(),
        stock_amount: Some(1000.0),
        stock_unit: None,
        link: None,
        photo_url: None,
        is_available: None,
    }
}

#[sqlx::test]
async fn stock_is_an_absolute_set(pool: PgPool) {
    let filament = FilamentRepo::create(&pool, &new_filament("galaxy")).await.unwrap();
    assert_eq!(filament.stock_amount, 1000.0);

    let updated = FilamentRepo::set_stock(&pool, filament.id, 420.5)
        .await
        .unwrap()
        .expect("filament exists");
    assert_eq!(updated.stock_amount, 420.5);
}

#[sqlx::test]
async fn negative_stock_is_rejected_and_amount_unchanged(pool: PgPool) {
    let filament = FilamentRepo::create(&pool, &new_filament("galaxy")).await.unwrap();

    // The handler rejects negatives up front; the CHECK constraint is
    // the backstop for any path that reaches the database.
    let result = FilamentRepo::set_stock(&pool, filament.id, -5.0).await;
    assert!(result.is_err());

    let stored = FilamentRepo::find_by_id(&pool, filament.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.stock_amount, 1000.0);
}

#[sqlx::test]
async fn availability_is_independent_of_stock(pool: PgPool) {
    let filament = FilamentRepo::create(&pool, &new_filament("galaxy")).await.unwrap();

    // Mark unavailable while stock remains positive.
    let updated = FilamentRepo::update(
        &pool,
        filament.id,
        &UpdateFilament {
            name: None,
            material: None,
            brand: None,
            colour: None,
            stock_unit: None,
            link: None,
            photo_url: None,
            is_available: Some(false),
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert!(!updated.is_available);
    assert_eq!(updated.stock_amount, 1000.0);

    // The public listing hides it; the admin listing still shows it.
    assert!(FilamentRepo::list(&pool, false).await.unwrap().is_empty());
    assert_eq!(FilamentRepo::list(&pool, true).await.unwrap().len(), 1);
}

#[sqlx::test]
async fn update_distinguishes_clearing_from_leaving_untouched(pool: PgPool) {
    let mut input = new_filament("galaxy");
    input.link = Some("https://shop.example.com/galaxy".to_string());
    let filament = FilamentRepo::create(&pool, &input).await.unwrap();

    // An absent field is left alone.
    let updated = FilamentRepo::update(
        &pool,
        filament.id,
        &UpdateFilament {
            name: Some("Galaxy".to_string()),
            material: None,
            brand: None,
            colour: None,
            stock_unit: None,
            link: None,
            photo_url: None,
            is_available: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.link.as_deref(), Some("https://shop.example.com/galaxy"));

    // A field set to NULL is cleared.
    let updated = FilamentRepo::update(
        &pool,
        filament.id,
        &UpdateFilament {
            name: None,
            material: None,
            brand: None,
            colour: None,
            stock_unit: None,
            link: Some(None),
            photo_url: None,
            is_available: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.link, None);
}

#[sqlx::test]
async fn set_stock_on_missing_filament_returns_none(pool: PgPool) {
    assert!(FilamentRepo::set_stock(&pool, 9999, 1.0).await.unwrap().is_none());
}
