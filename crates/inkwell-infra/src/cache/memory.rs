//! In-process expiring map. Holds the session registry of a single server process.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use inkwell_core::ports::{Cache, CacheError};

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|exp| now < exp)
    }
}

/// Expiring key-value map behind an async `RwLock`.
///
/// Expired entries are dropped lazily on read and in bulk by [`InMemoryCache::purge_expired`].
/// Contents are lost on restart, which logs everybody out.
#[derive(Default)]
pub struct InMemoryCache {
    store: RwLock<HashMap<String, Entry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every expired entry; returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut store = self.store.write().await;
        let before = store.len();
        store.retain(|_, entry| entry.is_live(now));
        before - store.len()
    }

    /// Remove `key` if it is still expired at `now`; a value set since the read survives.
    async fn evict_if_expired(&self, key: &str, now: Instant) {
        let mut store = self.store.write().await;
        if store.get(key).is_some_and(|entry| !entry.is_live(now)) {
            store.remove(key);
        }
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        {
            let store = self.store.read().await;
            match store.get(key) {
                Some(entry) if entry.is_live(now) => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        self.evict_if_expired(key, now).await;
        None
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let entry = Entry {
            value: value.to_string(),
            expires_at: ttl.map(|d| Instant::now() + d),
        };
        self.store.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = InMemoryCache::new();
        cache.set("session:a", "1", None).await.unwrap();
        assert_eq!(cache.get("session:a").await, Some("1".to_string()));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let cache = InMemoryCache::new();
        cache.set("session:a", "1", None).await.unwrap();
        cache.delete("session:a").await.unwrap();
        cache.delete("session:a").await.unwrap();
        assert_eq!(cache.get("session:a").await, None);
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let cache = InMemoryCache::new();
        cache
            .set("session:short", "1", Some(Duration::from_millis(20)))
            .await
            .unwrap();
        cache.set("session:long", "2", None).await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(cache.get("session:short").await, None);
        assert_eq!(cache.get("session:long").await, Some("2".to_string()));
    }

    #[tokio::test]
    async fn test_eviction_keeps_a_value_refreshed_after_the_read() {
        let cache = InMemoryCache::new();
        cache
            .set("session:a", "old", Some(Duration::from_millis(10)))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        let read_at = Instant::now();
        cache
            .set("session:a", "new", Some(Duration::from_secs(60)))
            .await
            .unwrap();
        cache.evict_if_expired("session:a", read_at).await;

        assert_eq!(cache.get("session:a").await, Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let cache = InMemoryCache::new();
        cache
            .set("a", "1", Some(Duration::from_millis(10)))
            .await
            .unwrap();
        cache.set("b", "2", None).await.unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(cache.purge_expired().await, 1);
        assert_eq!(cache.get("b").await, Some("2".to_string()));
    }
}
