use std::path::Path;

use async_trait::async_trait;
use intake_core::store::{StoreConfig, StoreFactory};
use intake_core::{SnapshotStore, StoreError};

use crate::store::SqliteSnapshotStore;

/// [`StoreFactory`] for SQLite.
///
/// Register this with a [`intake_core::store::StoreRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use intake_core::store::StoreRegistry;
/// use intake_store_sqlite::SqliteStoreFactory;
///
/// let mut registry = StoreRegistry::with_memory();
/// registry.register(Box::new(SqliteStoreFactory));
/// ```
pub struct SqliteStoreFactory;

#[async_trait]
impl StoreFactory for SqliteStoreFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.connection_string`.
    ///
    /// Accepted values:
    /// * A bare file path, e.g. `"intake.db"`. Created if missing.
    /// * `":memory:"` for an ephemeral database.
    /// * A sqlx URL starting with `sqlite:`, passed through as is.
    async fn create(&self, config: &StoreConfig) -> Result<Box<dyn SnapshotStore>, StoreError> {
        let target = config.connection_string.trim();
        let store = if target == ":memory:" {
            SqliteSnapshotStore::in_memory().await?
        } else if target.starts_with("sqlite:") {
            SqliteSnapshotStore::new(target).await?
        } else if target.is_empty() {
            return Err(StoreError::Configuration(
                "sqlite backend needs a connection_string".to_string(),
            ));
        } else {
            SqliteSnapshotStore::open_file(Path::new(target)).await?
        };
        store.run_migrations().await?;
        Ok(Box::new(store))
    }
}
