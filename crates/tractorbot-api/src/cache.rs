//! In-memory TTL cache used for retrieval results

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Key/value cache whose entries stop being visible once their TTL passes
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    default_ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone + Send + Sync> TtlCache<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }
    
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }
    
    pub async fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired(now) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(entry.value.clone());
                }
                Some(_) => {}
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    return None;
                }
            }
        }
        
        // expired: drop it unless someone refreshed it meanwhile
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| e.is_expired(now)) {
            entries.remove(key);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }
    
    /// Store with `ttl`, or the default TTL when `None`
    pub async fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let expires_at = Instant::now() + ttl.unwrap_or(self.default_ttl);
        self.entries
            .write()
            .await
            .insert(key.into(), CacheEntry { value, expires_at });
    }
    
    /// Returns whether the key was present
    pub async fn delete(&self, key: &str) -> bool {
        self.entries.write().await.remove(key).is_some()
    }
    
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
    
    /// Remove expired entries; returns how many were dropped
    pub async fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired(now));
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, "Cleaned up expired cache entries");
        }
        removed
    }
    
    pub async fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.entries.read().await;
        let total = entries.len();
        let expired = entries.values().filter(|e| e.is_expired(now)).count();
        CacheStats {
            total_entries: total,
            expired_entries: expired,
            active_entries: total - expired,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_cache_basic() {
        let cache = TtlCache::new(Duration::from_secs(10));
        cache.set("key1", vec![1, 2, 3], None).await;

        assert_eq!(cache.get("key1").await, Some(vec![1, 2, 3]));
        assert_eq!(cache.get("key2").await, None);

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_cache_expiration() {
        let cache = TtlCache::new(Duration::from_secs(10));
        cache.set("short", "a".to_string(), Some(Duration::from_millis(50))).await;
        cache.set("long", "b".to_string(), None).await;

        sleep(Duration::from_millis(100)).await;

        assert_eq!(cache.get("short").await, None);
        assert_eq!(cache.get("long").await.as_deref(), Some("b"));
        // the expired read removed the entry
        assert_eq!(cache.stats().await.total_entries, 1);
    }

    #[tokio::test]
    async fn test_zero_ttl_is_never_visible() {
        let cache = TtlCache::new(Duration::from_secs(10));
        cache.set("k", 1u8, Some(Duration::ZERO)).await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn test_cache_delete_and_clear() {
        let cache = TtlCache::new(Duration::from_secs(10));
        cache.set("a", 1, None).await;
        cache.set("b", 2, None).await;

        assert!(cache.delete("a").await);
        assert!(!cache.delete("a").await);
        assert_eq!(cache.get("a").await, None);

        cache.clear().await;
        assert_eq!(cache.stats().await.total_entries, 0);
    }

    #[tokio::test]
    async fn test_cache_cleanup() {
        let cache = TtlCache::new(Duration::from_millis(50));
        cache.set("key1", 1, None).await;
        cache.set("key2", 2, None).await;

        sleep(Duration::from_millis(100)).await;
        cache.set("key3", 3, None).await;

        let stats = cache.stats().await;
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.expired_entries, 2);
        assert_eq!(stats.active_entries, 1);

        assert_eq!(cache.cleanup_expired().await, 2);
        let stats = cache.stats().await;
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.expired_entries, 0);
        assert_eq!(cache.cleanup_expired().await, 0);
    }
}
