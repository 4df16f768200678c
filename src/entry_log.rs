use crate::errors::JarError;
use crate::models::Entry;
use crate::store::{KvStore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Where a scope's whole log lives. Every mutation replaces the full list.
#[async_trait]
pub trait LogBackend: Send + Sync {
    /// `None` when the scope has never stored a log.
    async fn load(&self, scope: &str) -> Result<Option<Vec<Entry>>, StoreError>;

    async fn save(&self, scope: &str, entries: &[Entry]) -> Result<(), StoreError>;

    async fn clear(&self, scope: &str) -> Result<(), StoreError>;
}

/// Server variant: one JSON list per identity in the key-value store.
#[derive(Clone)]
pub struct StoreBackend {
    store: Arc<dyn KvStore>,
}

impl StoreBackend {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }
}

pub fn entries_key(scope: &str) -> String {
    format!("swearjar:{scope}:entries")
}

#[async_trait]
impl LogBackend for StoreBackend {
    async fn load(&self, scope: &str) -> Result<Option<Vec<Entry>>, StoreError> {
        match self.store.get(&entries_key(scope)).await? {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, scope: &str, entries: &[Entry]) -> Result<(), StoreError> {
        let payload = serde_json::to_string(entries)?;
        self.store.set(&entries_key(scope), payload).await
    }

    async fn clear(&self, scope: &str) -> Result<(), StoreError> {
        self.store.delete(&entries_key(scope)).await
    }
}

/// Newest-first log operations over any [`LogBackend`].
///
/// Each mutation is a read-then-write with no version check: two concurrent
/// mutations for the same scope race, and the last full-list write wins.
#[derive(Clone)]
pub struct EntryLog<B> {
    backend: B,
}

impl<B: LogBackend> EntryLog<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn list(&self, scope: &str) -> Result<Vec<Entry>, JarError> {
        Ok(self.backend.load(scope).await?.unwrap_or_default())
    }

    pub async fn append(
        &self,
        scope: &str,
        raw_word: &str,
    ) -> Result<(Entry, Vec<Entry>), JarError> {
        self.append_at(scope, raw_word, Utc::now()).await
    }

    pub async fn append_at(
        &self,
        scope: &str,
        raw_word: &str,
        now: DateTime<Utc>,
    ) -> Result<(Entry, Vec<Entry>), JarError> {
        let word = raw_word.trim().to_lowercase();
        if word.is_empty() {
            return Err(JarError::Validation("Word is required".to_string()));
        }

        let mut entries = self.list(scope).await?;
        let entry = new_entry(word, now);
        entries.insert(0, entry.clone());
        self.backend.save(scope, &entries).await?;

        debug!(scope, id = %entry.id, total = entries.len(), "entry appended");
        Ok((entry, entries))
    }

    /// Removes the first entry with `id`. The stored log is untouched when
    /// nothing matches.
    pub async fn remove(&self, scope: &str, id: &str) -> Result<Vec<Entry>, JarError> {
        if id.is_empty() {
            return Err(JarError::Validation("Entry ID is required".to_string()));
        }

        let Some(mut entries) = self.backend.load(scope).await? else {
            return Err(not_found());
        };
        let Some(position) = entries.iter().position(|entry| entry.id == id) else {
            return Err(not_found());
        };
        entries.remove(position);
        self.backend.save(scope, &entries).await?;

        debug!(scope, id, total = entries.len(), "entry removed");
        Ok(entries)
    }

    pub async fn clear_all(&self, scope: &str) -> Result<(), JarError> {
        self.backend.clear(scope).await?;
        debug!(scope, "entries cleared");
        Ok(())
    }
}

fn not_found() -> JarError {
    JarError::NotFound("Entry not found".to_string())
}

fn new_entry(word: String, now: DateTime<Utc>) -> Entry {
    Entry {
        id: Uuid::new_v4().simple().to_string(),
        word,
        timestamp: now.timestamp_millis(),
        date: now.date_naive().format("%Y-%m-%d").to_string(),
    }
}
