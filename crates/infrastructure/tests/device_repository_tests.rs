//! Integration tests for SeaOrmDeviceRepository
//!
//! Each test runs against a fresh in-memory SQLite database with the
//! migrations applied, so no external server is needed.

use chrono::{TimeZone, Utc};
use domain::device::{DeviceRepository, DeviceTransaction};
use domain::{DeviceChanges, DeviceId, DeviceState, DomainError, NewDevice};
use infrastructure::SeaOrmDeviceRepository;
use infrastructure::config::DatabaseConfig;
use infrastructure::database;

/// Helper to create a migrated test database
async fn create_test_repository() -> SeaOrmDeviceRepository {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        run_migrations: true,
    };
    let db = database::connect(&config)
        .await
        .expect("Failed to open test database");

    SeaOrmDeviceRepository::new(db)
}

fn draft(name: &str, brand: &str, state: DeviceState) -> NewDevice {
    NewDevice::new(name, brand, state).unwrap()
}

#[tokio::test]
async fn test_insert_and_find_device() {
    let repo = create_test_repository().await;
    let created_at = Utc.with_ymd_and_hms(2024, 5, 17, 9, 15, 0).unwrap();

    let stored = repo
        .insert(&draft("Tablet", "BrandZ", DeviceState::Available), created_at)
        .await
        .expect("Failed to insert device");

    assert_eq!(stored.name(), "Tablet");
    assert_eq!(stored.brand(), "BrandZ");
    assert_eq!(stored.state(), DeviceState::Available);
    assert_eq!(stored.creation_time(), created_at);

    let found = repo
        .find_by_id(stored.id())
        .await
        .expect("Query failed")
        .expect("Device not found");

    assert_eq!(found, stored);
}

#[tokio::test]
async fn test_insert_assigns_unique_ids() {
    let repo = create_test_repository().await;
    let now = Utc::now();

    let first = repo
        .insert(&draft("Phone", "BrandX", DeviceState::Available), now)
        .await
        .unwrap();
    let second = repo
        .insert(&draft("Phone", "BrandX", DeviceState::Available), now)
        .await
        .unwrap();

    assert_ne!(first.id(), second.id());
}

#[tokio::test]
async fn test_find_nonexistent_device() {
    let repo = create_test_repository().await;

    let result = repo
        .find_by_id(DeviceId::new(4242))
        .await
        .expect("Query failed");

    assert!(result.is_none());
}

#[tokio::test]
async fn test_find_by_brand_is_exact() {
    let repo = create_test_repository().await;
    let now = Utc::now();

    repo.insert(&draft("A", "Acme", DeviceState::Available), now)
        .await
        .unwrap();
    repo.insert(&draft("B", "acme", DeviceState::InUse), now)
        .await
        .unwrap();
    repo.insert(&draft("C", "Acme", DeviceState::Inactive), now)
        .await
        .unwrap();

    let acme = repo.find_by_brand("Acme").await.unwrap();
    assert_eq!(acme.len(), 2);
    assert!(acme.iter().all(|d| d.brand() == "Acme"));

    assert!(repo.find_by_brand("Acm").await.unwrap().is_empty());
    assert_eq!(repo.find_all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_find_by_state() {
    let repo = create_test_repository().await;
    let now = Utc::now();

    repo.insert(&draft("A", "X", DeviceState::InUse), now)
        .await
        .unwrap();
    repo.insert(&draft("B", "X", DeviceState::Available), now)
        .await
        .unwrap();

    let in_use = repo.find_by_state(DeviceState::InUse).await.unwrap();
    assert_eq!(in_use.len(), 1);
    assert_eq!(in_use[0].name(), "A");

    assert!(
        repo.find_by_state(DeviceState::Inactive)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_update_in_transaction_keeps_creation_time() {
    let repo = create_test_repository().await;
    let created_at = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
    let stored = repo
        .insert(&draft("Old", "BrandA", DeviceState::Available), created_at)
        .await
        .unwrap();

    let mut tx = repo.begin().await.unwrap();
    let mut device = tx.find_for_update(stored.id()).await.unwrap().unwrap();
    device.apply(
        &DeviceChanges::new(
            Some("NewName".into()),
            Some("BrandB".into()),
            Some(DeviceState::Inactive),
        )
        .unwrap(),
    );
    tx.update(&device).await.unwrap();
    tx.commit().await.unwrap();

    let found = repo.find_by_id(stored.id()).await.unwrap().unwrap();
    assert_eq!(found.name(), "NewName");
    assert_eq!(found.brand(), "BrandB");
    assert_eq!(found.state(), DeviceState::Inactive);
    assert_eq!(found.creation_time(), created_at);
}

#[tokio::test]
async fn test_delete_in_transaction() {
    let repo = create_test_repository().await;
    let stored = repo
        .insert(&draft("ToDelete", "Trash", DeviceState::Available), Utc::now())
        .await
        .unwrap();

    let mut tx = repo.begin().await.unwrap();
    tx.delete(stored.id()).await.unwrap();
    tx.commit().await.unwrap();

    assert!(repo.find_by_id(stored.id()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_dropped_transaction_rolls_back() {
    let repo = create_test_repository().await;
    let stored = repo
        .insert(&draft("Keep", "Safe", DeviceState::Available), Utc::now())
        .await
        .unwrap();

    {
        let mut tx = repo.begin().await.unwrap();
        tx.delete(stored.id()).await.unwrap();
    }

    assert!(repo.find_by_id(stored.id()).await.unwrap().is_some());
}

#[tokio::test]
async fn test_commit_twice_fails() {
    let repo = create_test_repository().await;

    let mut tx = repo.begin().await.unwrap();
    tx.commit().await.unwrap();

    assert!(matches!(tx.commit().await, Err(DomainError::Storage(_))));
}

#[tokio::test]
async fn test_find_id_beyond_32_bits() {
    let repo = create_test_repository().await;

    let result = repo
        .find_by_id(DeviceId::new(3_000_000_000))
        .await
        .expect("Query failed");

    assert!(result.is_none());
}
