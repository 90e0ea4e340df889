use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::Result;

/// A cached query result together with its freshness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedValue {
    pub bytes: Vec<u8>,
    /// Set by invalidation; cleared when the key is written again.
    pub stale: bool,
    pub stored_at: DateTime<Utc>,
}

impl CachedValue {
    /// Returns true if the value may be served without refetching.
    ///
    /// A value is fresh when it has not been invalidated and is younger than
    /// `stale_time`. A zero stale time means nothing is ever fresh.
    pub fn is_fresh(&self, stale_time: std::time::Duration, now: DateTime<Utc>) -> bool {
        if self.stale || stale_time.is_zero() {
            return false;
        }
        match (now - self.stored_at).to_std() {
            Ok(age) => age < stale_time,
            // Stored "in the future" (clock skew): treat as just written.
            Err(_) => true,
        }
    }
}

/// Key/value store backing the query layer.
///
/// Invalidation marks entries stale instead of dropping them, so the last
/// known data stays available while a refetch is in flight.
#[async_trait]
pub trait QueryStore: Send + Sync {
    /// Gets a cached value by key.
    async fn get(&self, key: &str) -> Result<Option<CachedValue>>;

    /// Stores a value, marking it fresh.
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Marks a single key stale. Returns true if the key was cached.
    async fn invalidate(&self, key: &str) -> Result<bool>;

    /// Marks every key matching a glob pattern stale and returns those keys.
    async fn invalidate_pattern(&self, pattern: &str) -> Result<Vec<String>>;
}
