use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{KeyValueStore, Result, StorageError, validate_key};

#[derive(Debug, Default)]
struct InMemoryState {
    documents: HashMap<String, serde_json::Value>,
    save_count: usize,
    fail_all_saves: bool,
    failing_keys: HashSet<String>,
}

/// In-memory key-value store.
///
/// Nothing survives the process. Used for tests and for running the server
/// without a data directory. Saves can be made to fail on demand so callers
/// can exercise their error paths.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures every subsequent save to fail.
    pub async fn set_fail_on_save(&self, fail: bool) {
        self.state.write().await.fail_all_saves = fail;
    }

    /// Configures saves to `key` to fail until cleared.
    pub async fn fail_saves_to(&self, key: impl Into<String>) {
        self.state.write().await.failing_keys.insert(key.into());
    }

    /// Clears every configured failure.
    pub async fn clear_failures(&self) {
        let mut state = self.state.write().await;
        state.fail_all_saves = false;
        state.failing_keys.clear();
    }

    /// Returns the number of successful saves since creation.
    pub async fn save_count(&self) -> usize {
        self.state.read().await.save_count
    }

    /// Returns the number of keys holding a document.
    pub async fn len(&self) -> usize {
        self.state.read().await.documents.len()
    }

    /// Returns true if no document has been saved.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.documents.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn load(&self, key: &str) -> Result<Option<serde_json::Value>> {
        validate_key(key)?;
        let state = self.state.read().await;
        Ok(state.documents.get(key).cloned())
    }

    async fn save(&self, key: &str, value: serde_json::Value) -> Result<()> {
        validate_key(key)?;
        let mut state = self.state.write().await;

        if state.fail_all_saves || state.failing_keys.contains(key) {
            return Err(StorageError::Unavailable(format!(
                "save to {key:?} rejected"
            )));
        }

        state.documents.insert(key.to_string(), value);
        state.save_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyValueStoreExt;

    #[tokio::test]
    async fn test_load_missing_key_returns_none() {
        let store = InMemoryStore::new();
        assert!(store.load("products").await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_save_replaces_previous_document() {
        let store = InMemoryStore::new();
        store
            .save("orders", serde_json::json!([1, 2]))
            .await
            .unwrap();
        store.save("orders", serde_json::json!([3])).await.unwrap();

        let loaded = store.load("orders").await.unwrap().unwrap();
        assert_eq!(loaded, serde_json::json!([3]));
        assert_eq!(store.len().await, 1);
        assert_eq!(store.save_count().await, 2);
    }

    #[tokio::test]
    async fn test_typed_access() {
        let store = InMemoryStore::new();
        store.save_as("numbers", &vec![1u32, 2, 3]).await.unwrap();

        let numbers: Vec<u32> = store.load_as("numbers").await.unwrap().unwrap();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(store.contains("numbers").await.unwrap());
        assert!(!store.contains("missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_fail_on_save_leaves_document_untouched() {
        let store = InMemoryStore::new();
        store.save("products", serde_json::json!("v1")).await.unwrap();
        store.set_fail_on_save(true).await;

        let result = store.save("products", serde_json::json!("v2")).await;
        assert!(matches!(result, Err(StorageError::Unavailable(_))));
        assert_eq!(
            store.load("products").await.unwrap(),
            Some(serde_json::json!("v1"))
        );

        store.clear_failures().await;
        store.save("products", serde_json::json!("v2")).await.unwrap();
    }

    #[tokio::test]
    async fn test_failing_key_only_affects_that_key() {
        let store = InMemoryStore::new();
        store.fail_saves_to("orders").await;

        assert!(store.save("products", serde_json::json!([])).await.is_ok());
        assert!(store.save("orders", serde_json::json!([])).await.is_err());
    }

    #[tokio::test]
    async fn test_rejects_invalid_keys() {
        let store = InMemoryStore::new();
        let result = store.save("../x", serde_json::json!(null)).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
