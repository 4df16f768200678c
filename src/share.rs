//! Shareable board state: the whole log packed into one URL query value,
//! mirrored into an on-device cache for the client-only variant.

use crate::entry_log::{EntryLog, LogBackend};
use crate::models::Entry;
use crate::store::{KvStore, StoreError};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use tokio::sync::Mutex;
use tracing::warn;
use url::{form_urlencoded, Url};

pub const SNAPSHOT_PARAM: &str = "data";
pub const CACHE_KEY: &str = "swear-jar-entries";

/// JSON, then base64, then query escaping. An empty log encodes to `""`.
pub fn encode(entries: &[Entry]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let json = serde_json::to_string(entries).unwrap_or_default();
    form_urlencoded::byte_serialize(STANDARD.encode(json).as_bytes()).collect()
}

/// Inverse of [`encode`]. Anything that fails to decode is an empty board.
pub fn decode(text: &str) -> Vec<Entry> {
    try_decode(text).unwrap_or_default()
}

fn try_decode(text: &str) -> Option<Vec<Entry>> {
    // Escaped output never contains raw separators.
    if text.is_empty() || text.contains(['=', '&']) {
        return None;
    }
    let (unescaped, _) = form_urlencoded::parse(text.as_bytes()).next()?;
    let bytes = STANDARD.decode(unescaped.as_bytes()).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// The still-escaped value of the snapshot parameter in a raw query string.
pub fn snapshot_param(query: &str) -> Option<&str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| *name == SNAPSHOT_PARAM)
        .map(|(_, value)| value)
}

/// Client-only variant backend. The page URL wins over the cache when it
/// carries a non-empty snapshot; every save rewrites both. The scope
/// argument is ignored since one device holds one board.
pub struct SnapshotBackend<C> {
    cache: C,
    page: Mutex<Url>,
}

pub type LocalBoard<C> = EntryLog<SnapshotBackend<C>>;

impl<C: KvStore> SnapshotBackend<C> {
    pub fn new(cache: C, page: Url) -> Self {
        Self {
            cache,
            page: Mutex::new(page),
        }
    }

    /// Current page URL, suitable as a share link.
    pub async fn page_url(&self) -> Url {
        self.page.lock().await.clone()
    }

    async fn cached(&self) -> Result<Option<Vec<Entry>>, StoreError> {
        let Some(data) = self.cache.get(CACHE_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&data) {
            Ok(entries) => Ok(Some(entries)),
            Err(err) => {
                warn!("ignoring unreadable cached board: {err}");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl<C: KvStore> LogBackend for SnapshotBackend<C> {
    async fn load(&self, _scope: &str) -> Result<Option<Vec<Entry>>, StoreError> {
        let from_url = {
            let page = self.page.lock().await;
            page.query().and_then(snapshot_param).map(decode)
        };
        if let Some(entries) = from_url.filter(|entries| !entries.is_empty()) {
            return Ok(Some(entries));
        }
        self.cached().await
    }

    async fn save(&self, _scope: &str, entries: &[Entry]) -> Result<(), StoreError> {
        {
            let mut page = self.page.lock().await;
            let query = with_snapshot(page.query().unwrap_or(""), &encode(entries));
            page.set_query((!query.is_empty()).then_some(query.as_str()));
        }
        let payload = serde_json::to_string(entries)?;
        self.cache.set(CACHE_KEY, payload).await
    }

    async fn clear(&self, scope: &str) -> Result<(), StoreError> {
        self.save(scope, &[]).await
    }
}

/// Replaces (or drops, when `encoded` is empty) the snapshot parameter while
/// keeping every other pair as written.
fn with_snapshot(query: &str, encoded: &str) -> String {
    let mut pairs: Vec<String> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some(SNAPSHOT_PARAM))
        .map(str::to_string)
        .collect();
    if !encoded.is_empty() {
        pairs.push(format!("{SNAPSHOT_PARAM}={encoded}"));
    }
    pairs.join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::JarError;
    use crate::store::MemoryStore;

    fn sample() -> Vec<Entry> {
        vec![
            Entry {
                id: "b".into(),
                word: "heck".into(),
                timestamp: 1_704_888_000_000,
                date: "2024-01-10".into(),
            },
            Entry {
                id: "a".into(),
                word: "d\u{e4}rn & co=?".into(),
                timestamp: 1_704_801_600_000,
                date: "2024-01-09".into(),
            },
        ]
    }

    fn board(page: &str) -> LocalBoard<MemoryStore> {
        EntryLog::new(SnapshotBackend::new(
            MemoryStore::new(),
            Url::parse(page).unwrap(),
        ))
    }

    #[test]
    fn codec_round_trips_and_is_query_safe() {
        let encoded = encode(&sample());
        assert!(!encoded.contains(['=', '&', '+', '/']));
        assert_eq!(decode(&encoded), sample());
    }

    #[test]
    fn empty_and_malformed_decode_to_empty() {
        assert_eq!(encode(&[]), "");
        assert!(decode("").is_empty());
        assert!(decode("not base64 at all!").is_empty());
        assert!(decode("a=b&c").is_empty());
        // Valid base64, not an entry list.
        assert!(decode(&STANDARD.encode("{\"x\":1}")).is_empty());
    }

    #[test]
    fn snapshot_param_finds_raw_value() {
        assert_eq!(snapshot_param("tab=1&data=abc%3D"), Some("abc%3D"));
        assert_eq!(snapshot_param("tab=1"), None);
    }

    #[tokio::test]
    async fn url_snapshot_wins_over_cache() {
        let cache = MemoryStore::new();
        cache.set(CACHE_KEY, "[]".into()).await.unwrap();
        let page = format!("https://jar.example/?data={}", encode(&sample()));
        let log = EntryLog::new(SnapshotBackend::new(cache, Url::parse(&page).unwrap()));

        assert_eq!(log.list("").await.unwrap(), sample());
    }

    #[tokio::test]
    async fn falls_back_to_cache_then_empty() {
        let log = board("https://jar.example/?data=garbage");
        assert!(log.list("").await.unwrap().is_empty());

        let cache = MemoryStore::new();
        cache
            .set(CACHE_KEY, serde_json::to_string(&sample()).unwrap())
            .await
            .unwrap();
        let log = EntryLog::new(SnapshotBackend::new(
            cache,
            Url::parse("https://jar.example/").unwrap(),
        ));
        assert_eq!(log.list("").await.unwrap(), sample());
    }

    #[tokio::test]
    async fn mutations_write_through_to_url_and_cache() {
        let log = board("https://jar.example/?tab=top");
        let (entry, entries) = log.append("", " Darn ").await.unwrap();

        let url = log.backend().page_url().await;
        let query = url.query().unwrap();
        assert!(query.starts_with("tab=top&data="));
        assert_eq!(decode(snapshot_param(query).unwrap()), entries);

        let cached = log.backend().cache.get(CACHE_KEY).await.unwrap().unwrap();
        assert_eq!(serde_json::from_str::<Vec<Entry>>(&cached).unwrap(), entries);

        let remaining = log.remove("", &entry.id).await.unwrap();
        assert!(remaining.is_empty());
        assert_eq!(log.backend().page_url().await.query(), Some("tab=top"));
    }

    #[tokio::test]
    async fn clear_resets_both_sinks_and_is_idempotent() {
        let log = board("https://jar.example/");
        log.append("", "heck").await.unwrap();

        log.clear_all("").await.unwrap();
        log.clear_all("").await.unwrap();

        assert!(log.list("").await.unwrap().is_empty());
        assert_eq!(log.backend().page_url().await.query(), None);
        assert!(matches!(
            log.remove("", "missing").await,
            Err(JarError::NotFound(_))
        ));
    }
}
