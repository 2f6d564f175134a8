//! Cache store backends

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::domain::cache::{CacheEntry, CacheStore};
use crate::shared::errors::CacheError;

/// Process-local store, lost on exit
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, entry: CacheEntry) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        // entries from earlier days can never be read again
        entries.retain(|_, existing| existing.expires_at > entry.created_at);
        entries.insert(entry.key.clone(), entry);
        Ok(())
    }
}

/// All entries in one JSON document on disk, so results survive process restarts.
pub struct JsonFileCacheStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileCacheStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<HashMap<String, CacheEntry>, CacheError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(HashMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl CacheStore for JsonFileCacheStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, entry: CacheEntry) -> Result<(), CacheError> {
        let _guard = self.write_lock.lock().await;

        // an unreadable file is replaced rather than blocking every future write
        let mut entries = self.load().await.unwrap_or_default();
        entries.retain(|_, existing| existing.expires_at > entry.created_at);
        entries.insert(entry.key.clone(), entry);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(&entries)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!("Cache file {} now holds {} entries", self.path.display(), entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip_and_prune() {
        let store = MemoryCacheStore::new();
        let monday = at("2024-03-04T10:00:00+08:00");
        let tuesday = at("2024-03-05T10:00:00+08:00");

        store.set(CacheEntry::new("a_20240304", monday, 30, vec![])).await.unwrap();
        assert!(store.get("a_20240304").await.unwrap().is_some());
        assert!(store.get("missing").await.unwrap().is_none());

        store.set(CacheEntry::new("a_20240305", tuesday, 30, vec![])).await.unwrap();
        assert!(store.get("a_20240304").await.unwrap().is_none());
        assert!(store.get("a_20240305").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");
        let now = at("2024-03-05T10:00:00+08:00");

        let store = JsonFileCacheStore::new(&path);
        assert!(store.get("k").await.unwrap().is_none());
        store.set(CacheEntry::new("k", now, 120, vec![])).await.unwrap();

        let reopened = JsonFileCacheStore::new(&path);
        let entry = reopened.get("k").await.unwrap().unwrap();
        assert_eq!(entry.created_at, now);
        assert_eq!(entry.expires_at, at("2024-03-05T12:00:00+08:00"));
    }

    #[tokio::test]
    async fn test_file_store_reports_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonFileCacheStore::new(&path);
        assert!(matches!(store.get("k").await, Err(CacheError::Serde(_))));

        let now = at("2024-03-05T10:00:00+08:00");
        store.set(CacheEntry::new("k", now, 30, vec![])).await.unwrap();
        assert!(store.get("k").await.unwrap().is_some());
    }
}
