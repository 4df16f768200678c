use async_trait::async_trait;
use std::{
    collections::{BTreeMap, HashMap},
    path::PathBuf,
};
use thiserror::Error;
use tokio::{fs, sync::Mutex};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt store data: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// External key-value service holding serialized blobs.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.values.lock().await.remove(key);
        Ok(())
    }
}

/// Keeps every key in a single JSON object file. The file is read (and
/// rewritten on mutation) inside each call while holding the lock, so no
/// state outlives an operation.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let payload = serde_json::to_vec_pretty(values)?;
        fs::write(&self.path, payload).await?;
        Ok(())
    }
}

#[async_trait]
impl KvStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut values = self.read_all().await?;
        values.insert(key.to_string(), value);
        self.write_all(&values).await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut values = self.read_all().await?;
        if values.remove(key).is_some() {
            self.write_all(&values).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn memory_store_get_set_delete() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a").await.unwrap(), None);

        store.set("a", "1".into()).await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));

        store.delete("a").await.unwrap();
        store.delete("a").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_persists_across_handles() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::new(&path);
        assert_eq!(store.get("k").await.unwrap(), None);
        store.set("k", "[]".into()).await.unwrap();
        store.set("other", "x".into()).await.unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("k").await.unwrap().as_deref(), Some("[]"));

        reopened.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
        assert_eq!(store.get("other").await.unwrap().as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn file_store_reports_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, b"not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.get("k").await, Err(StoreError::Corrupt(_))));
    }
}
