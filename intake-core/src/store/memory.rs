use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::{SnapshotStore, StoreError};

/// Process-local store. Clones share the same map, so a test can keep a
/// handle and inspect what a session saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|e| StoreError::Database(format!("memory store poisoned: {e}")))
    }

    /// Synchronous peek, handy outside async code.
    pub fn get(
        &self,
        key: &str,
    ) -> Option<String> {
        self.entries().ok()?.get(key).cloned()
    }

    pub fn insert(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        if let Ok(mut entries) = self.entries() {
            entries.insert(key.into(), value.into());
        }
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries()?.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries()?.remove(key);
        Ok(())
    }
}
