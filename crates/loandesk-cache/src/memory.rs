//! In-memory implementation of IKeyValueStore
//!
//! Nothing outlives the process. Used by tests and by embedders that do
//! not need durability.

use std::collections::HashMap;
use std::sync::Mutex;

use loandesk_core::ports::IKeyValueStore;

/// Key-value store held in a `HashMap`
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock leaves the map itself intact.
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait::async_trait]
impl IKeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = MemoryKeyValueStore::new();
        assert!(store.get("absent").await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemoryKeyValueStore::new();
        store.set("k", "one").await.unwrap();
        store.set("k", "two").await.unwrap();

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("two"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let store = MemoryKeyValueStore::new();
        store.set("k", "v").await.unwrap();

        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();

        assert!(store.get("k").await.unwrap().is_none());
    }
}
