//! In-memory query store with LRU eviction.
//!
//! Provides a thread-safe store using tokio synchronization primitives.
//! Invalidated entries stay readable (flagged stale) until overwritten or
//! evicted.

use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use lru::LruCache;
use tokio::sync::RwLock;

use registrar_core::cache::{pattern_matches, CachedValue, QueryStore, Result};

/// In-memory query store with LRU eviction.
///
/// Every distinct search term gets its own key, so the store is bounded;
/// the least recently read or written result is evicted first.
#[derive(Debug, Clone)]
pub struct MemoryQueryCache {
    store: Arc<RwLock<LruCache<String, CachedValue>>>,
}

impl MemoryQueryCache {
    /// Creates a store holding at most `max_entries` results.
    ///
    /// A capacity of 0 is raised to 1.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    /// Number of cached results.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

#[async_trait]
impl QueryStore for MemoryQueryCache {
    async fn get(&self, key: &str) -> Result<Option<CachedValue>> {
        // Write lock: a read promotes the key in the LRU order.
        let mut store = self.store.write().await;
        Ok(store.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut store = self.store.write().await;
        let entry = CachedValue {
            bytes: value.to_vec(),
            stale: false,
            stored_at: Utc::now(),
        };
        if let Some((evicted, _)) = store.push(key.to_string(), entry) {
            if evicted != key {
                tracing::trace!(key = %evicted, "Evicted cached query");
            }
        }
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> Result<bool> {
        let mut store = self.store.write().await;
        match store.peek_mut(key) {
            Some(entry) => {
                entry.stale = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn invalidate_pattern(&self, pattern: &str) -> Result<Vec<String>> {
        let mut store = self.store.write().await;
        let mut invalidated = Vec::new();
        for (key, entry) in store.iter_mut() {
            if pattern_matches(pattern, key) {
                entry.stale = true;
                invalidated.push(key.clone());
            }
        }
        Ok(invalidated)
    }
}
