use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A value paired with the instant (epoch millis) it stops being fresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheCell<T> {
    pub data: T,
    pub expires_at: i64,
}

impl<T> CacheCell<T> {
    pub fn new(data: T, stored_at: i64, ttl_ms: i64) -> Self {
        Self { data, expires_at: stored_at.saturating_add(ttl_ms) }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }

    /// Data if still fresh at `now`.
    pub fn into_fresh(self, now: i64) -> Option<T> {
        if self.is_expired(now) { None } else { Some(self.data) }
    }
}

/// Synchronous-semantics key/value store. Last writer wins.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn put(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;

    /// Write several entries. Stores that can should make this all-or-nothing.
    async fn put_all(&self, entries: &[(&str, String)]) -> Result<()> {
        for (key, value) in entries {
            self.put(key, value).await?;
        }
        Ok(())
    }
}

/// Process-local store, used for `--no-persist` runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries.lock().map_err(|_| anyhow!("memory store lock poisoned"))
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    async fn put_all(&self, entries: &[(&str, String)]) -> Result<()> {
        let mut map = self.lock()?;
        for (key, value) in entries {
            map.insert(key.to_string(), value.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_expires_at_boundary() {
        let cell = CacheCell::new("x", 1_000, 300_000);
        assert_eq!(cell.expires_at, 301_000);
        assert!(!cell.is_expired(300_999));
        assert!(cell.is_expired(301_000));
        assert_eq!(cell.clone().into_fresh(1_000), Some("x"));
        assert_eq!(cell.into_fresh(301_001), None);
    }

    #[tokio::test]
    async fn memory_store_overwrites_and_removes() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);
        store.put("k", "1").await.unwrap();
        store.put_all(&[("k", "2".to_string()), ("j", "3".to_string())]).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("2"));
        assert_eq!(store.get("j").await.unwrap().as_deref(), Some("3"));
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
