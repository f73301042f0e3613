//! The SQLite backend reached through the store registry, the way the CLI
//! opens it.

use intake_core::store::{SNAPSHOT_KEY, StoreConfig, StoreRegistry};
use intake_core::{DealType, FieldInput, IntakeSession, Step, StoreError};
use intake_store_sqlite::SqliteStoreFactory;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn registry() -> StoreRegistry {
    let mut registry = StoreRegistry::with_memory();
    registry.register(Box::new(SqliteStoreFactory));
    registry
}

fn file_config(dir: &TempDir) -> StoreConfig {
    StoreConfig {
        backend: "sqlite".to_string(),
        connection_string: dir.path().join("intake.db").display().to_string(),
    }
}

#[tokio::test]
async fn test_registry_lists_sqlite_backend() {
    assert_eq!(registry().available_backends(), vec!["memory", "sqlite"]);
}

#[tokio::test]
async fn test_file_database_is_created_and_persists() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);

    let store = registry().create(&config).await.unwrap();
    store.save(SNAPSHOT_KEY, "{}").await.unwrap();
    drop(store);

    assert!(dir.path().join("intake.db").exists());
    let reopened = registry().create(&config).await.unwrap();
    assert_eq!(
        reopened.load(SNAPSHOT_KEY).await.unwrap().as_deref(),
        Some("{}")
    );
}

#[tokio::test]
async fn test_memory_connection_string() {
    let config = StoreConfig {
        backend: "sqlite".to_string(),
        connection_string: ":memory:".to_string(),
    };

    let store = registry().create(&config).await.unwrap();
    store.save("k", "v").await.unwrap();

    assert_eq!(store.load("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn test_empty_connection_string_is_configuration_error() {
    let config = StoreConfig {
        backend: "sqlite".to_string(),
        connection_string: "  ".to_string(),
    };

    assert!(matches!(
        registry().create(&config).await,
        Err(StoreError::Configuration(_))
    ));
}

#[tokio::test]
async fn test_session_resumes_from_sqlite_file() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);

    {
        let store = registry().create(&config).await.unwrap();
        let mut session = IntakeSession::open(store).await;
        session.select_deal_type(DealType::Land).await.unwrap();
        session.next().await.unwrap();
        session
            .set_field("apn", FieldInput::text("045-210-33"))
            .await
            .unwrap();
    }

    let store = registry().create(&config).await.unwrap();
    let session = IntakeSession::open(store).await;

    assert_eq!(session.state().step(), Step::DealDetails);
    assert_eq!(session.state().deal_type(), Some(DealType::Land));
    let Some(intake_core::DealDetails::Land(land)) = session.state().deal() else {
        panic!("expected land details");
    };
    assert_eq!(land.apn, "045-210-33");
}
