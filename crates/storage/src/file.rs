use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::{KeyValueStore, Result, StorageError, validate_key};

/// Flat-file JSON store.
///
/// Each key is kept in `<root>/<key>.json` as a pretty-printed document.
/// Writes go to a sibling temporary file that is renamed over the target, so
/// a crash mid-write never leaves a truncated document behind. There is no
/// locking across processes; callers serialize their own writes.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| StorageError::io(&root, e))?;
        tracing::debug!(root = %root.display(), "opened JSON file store");
        Ok(Self { root })
    }

    /// Returns the directory holding the documents.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file path backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn load(&self, key: &str) -> Result<Option<serde_json::Value>> {
        validate_key(key)?;
        let path = self.path_for(key);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::io(path, e)),
        };

        let value = serde_json::from_slice(&bytes)?;
        Ok(Some(value))
    }

    #[tracing::instrument(skip(self, value), fields(root = %self.root.display()))]
    async fn save(&self, key: &str, value: serde_json::Value) -> Result<()> {
        validate_key(key)?;
        let path = self.path_for(key);
        let tmp_path = self.root.join(format!("{key}.json.tmp"));

        let bytes = serde_json::to_vec_pretty(&value)?;
        write_synced(&tmp_path, &bytes)
            .await
            .map_err(|e| StorageError::io(&tmp_path, e))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| StorageError::io(&path, e))?;
        sync_dir(&self.root)
            .await
            .map_err(|e| StorageError::io(&self.root, e))?;

        metrics::counter!("storage_file_writes_total").increment(1);
        tracing::debug!(bytes = bytes.len(), "document written");
        Ok(())
    }
}

/// Writes `bytes` to `path` and waits until they reach the disk.
async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

/// Persists the directory entry created by a rename.
#[cfg(unix)]
async fn sync_dir(dir: &Path) -> std::io::Result<()> {
    tokio::fs::File::open(dir).await?.sync_all().await
}

#[cfg(not(unix))]
async fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}
