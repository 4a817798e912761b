use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{Result, StorageError};

/// Core trait for persistence backends.
///
/// A store maps string keys to whole JSON documents. Writes replace the
/// previous document for the key. All implementations must be thread-safe
/// (Send + Sync).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Loads the document stored under `key`.
    ///
    /// Returns None if nothing has been saved under the key yet.
    async fn load(&self, key: &str) -> Result<Option<serde_json::Value>>;

    /// Saves `value` under `key`, replacing any previous document.
    ///
    /// Backends that write to disk have synced the document by the time the
    /// future resolves.
    async fn save(&self, key: &str, value: serde_json::Value) -> Result<()>;
}

/// Extension trait providing typed access on top of raw JSON documents.
#[async_trait]
pub trait KeyValueStoreExt: KeyValueStore {
    /// Loads and deserializes the document stored under `key`.
    async fn load_as<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.load(key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Serializes `value` and saves it under `key`.
    async fn save_as<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let value = serde_json::to_value(value)?;
        self.save(key, value).await
    }

    /// Checks if a document exists for `key`.
    async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.load(key).await?.is_some())
    }
}

// Blanket implementation for all KeyValueStore implementations
impl<T: KeyValueStore + ?Sized> KeyValueStoreExt for T {}

/// Validates a key before it reaches a backend.
///
/// Keys double as file names for the flat-file backend, so only ASCII
/// alphanumerics, `-` and `_` are accepted.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey(key.to_string()));
    }

    let valid = key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(StorageError::InvalidKey(key.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_keys() {
        assert!(validate_key("products").is_ok());
        assert!(validate_key("orders").is_ok());
        assert!(validate_key("order-archive_2").is_ok());
    }

    #[test]
    fn test_rejects_empty_and_path_like_keys() {
        assert!(matches!(
            validate_key(""),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("orders.json").is_err());
    }
}
