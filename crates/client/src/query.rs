//! Query layer: keyed reads over an injected `QueryStore`.
//!
//! Each key tracks a status and a fetch generation. Every fetch bumps the
//! generation, and only the response for the latest generation is written
//! back, so an older, slower response can never replace a newer one.

use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use lru::LruCache;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

use registrar_core::api;
use registrar_core::cache::{
    self, deserialize_value, serialize_value, CacheError, CachedValue, KeyFilter, QueryStore,
};
use registrar_core::console::{QueryState, QueryStatus};

/// Default number of keys whose status is tracked.
pub const DEFAULT_MAX_KEYS: usize = 256;

/// Freshness and refetch policy shared by every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// How long fetched data may be served without refetching.
    pub stale_time: Duration,
    /// Refetch active queries when the console regains focus.
    pub refetch_on_focus: bool,
    /// Most keys whose status is tracked; the least recently fetched is forgotten first.
    pub max_keys: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::ZERO,
            refetch_on_focus: true,
            max_keys: DEFAULT_MAX_KEYS,
        }
    }
}

#[derive(Debug, Default)]
struct KeyMeta {
    status: QueryStatus,
    error: Option<String>,
    generation: u64,
    fetched_at: Option<DateTime<Utc>>,
}

/// Issues reads through the store and tracks their status.
pub struct QueryClient {
    store: Arc<dyn QueryStore>,
    meta: RwLock<LruCache<String, KeyMeta>>,
    options: QueryOptions,
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl QueryClient {
    pub fn new(store: Arc<dyn QueryStore>, options: QueryOptions) -> Self {
        let capacity = NonZeroUsize::new(options.max_keys).unwrap_or(NonZeroUsize::MIN);
        Self {
            store,
            meta: RwLock::new(LruCache::new(capacity)),
            options,
        }
    }

    pub fn options(&self) -> QueryOptions {
        self.options
    }

    /// Reads `key`, running `fetcher` unless cached data is still fresh.
    ///
    /// `fetcher` is only polled on a miss. The returned state is the key's
    /// state after this fetch settles, which may reflect a newer fetch if
    /// this one was superseded.
    pub async fn fetch<T, F>(&self, key: &str, fetcher: F) -> QueryState<T>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = api::Result<T>>,
    {
        if let Some(state) = self.fresh_state(key).await {
            tracing::trace!(key = %key, "Cache hit for query");
            return state;
        }

        tracing::trace!(key = %key, "Cache miss for query");
        let generation = self.begin(key).await;
        let result = fetcher.await;
        self.settle(key, generation, result).await;
        self.state(key).await
    }

    /// Current state of `key`, with data read from the store.
    ///
    /// A successful result the store has since evicted reads as `Idle`, so
    /// the next fetch of the key goes to the backend.
    pub async fn state<T: DeserializeOwned>(&self, key: &str) -> QueryState<T> {
        let (status, error, fetched_at) = {
            let meta = self.meta.read().await;
            match meta.peek(key) {
                Some(m) => (m.status, m.error.clone(), m.fetched_at),
                None => (QueryStatus::Idle, None, None),
            }
        };

        let data = self.cached(key).await.map(|(data, _)| data);
        if data.is_none() && status == QueryStatus::Success {
            tracing::trace!(key = %key, "Query result was evicted");
            return QueryState::default();
        }

        QueryState {
            status,
            data,
            error,
            fetched_at,
        }
    }

    /// Marks matching cached results stale. Returns the keys that were cached.
    pub async fn invalidate(&self, filter: &KeyFilter) -> Vec<String> {
        let result = match filter {
            KeyFilter::Exact(key) => self
                .store
                .invalidate(key)
                .await
                .map(|found| if found { vec![key.clone()] } else { Vec::new() }),
            KeyFilter::Pattern(pattern) => self.store.invalidate_pattern(pattern).await,
        };

        match result {
            Ok(keys) => {
                tracing::debug!(filter = %filter, invalidated = keys.len(), "Invalidated queries");
                keys
            }
            Err(err) => {
                tracing::warn!(filter = %filter, error = %err, "Failed to invalidate queries");
                Vec::new()
            }
        }
    }

    #[cfg(test)]
    async fn tracked_keys(&self) -> usize {
        self.meta.read().await.len()
    }

    async fn fresh_state<T: DeserializeOwned>(&self, key: &str) -> Option<QueryState<T>> {
        let (data, cached) = self.cached(key).await?;
        if !cached.is_fresh(self.options.stale_time, Utc::now()) {
            return None;
        }
        Some(QueryState {
            status: QueryStatus::Success,
            data: Some(data),
            error: None,
            fetched_at: Some(cached.stored_at),
        })
    }

    /// Decoded data and freshness of `key`. Read failures are logged and
    /// treated as a miss.
    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<(T, CachedValue)> {
        match self.read(key).await {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Failed to read cached query");
                None
            }
        }
    }

    async fn read<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> cache::Result<Option<(T, CachedValue)>> {
        let Some(cached) = self.store.get(key).await? else {
            return Ok(None);
        };
        let data = deserialize_value(&cached.bytes)?;
        Ok(Some((data, cached)))
    }

    async fn begin(&self, key: &str) -> u64 {
        let mut meta = self.meta.write().await;
        let entry = meta.get_or_insert_mut(key.to_string(), KeyMeta::default);
        entry.generation += 1;
        entry.status = QueryStatus::Loading;
        entry.generation
    }

    async fn settle<T: Serialize>(&self, key: &str, generation: u64, result: api::Result<T>) {
        let mut meta = self.meta.write().await;
        let Some(entry) = meta.get_mut(key) else {
            tracing::debug!(key = %key, "Discarding response for a key no longer tracked");
            return;
        };
        if entry.generation != generation {
            tracing::debug!(
                key = %key,
                generation,
                latest = entry.generation,
                "Discarding superseded query response"
            );
            return;
        }

        let outcome = match result {
            Ok(data) => serialize_value(&data).map_err(|e| CacheError::from(e).to_string()),
            Err(err) => Err(err.to_string()),
        };

        match outcome {
            Ok(bytes) => {
                if let Err(err) = self.store.set(key, &bytes).await {
                    tracing::warn!(key = %key, error = %err, "Failed to cache query result");
                }
                entry.status = QueryStatus::Success;
                entry.error = None;
                entry.fetched_at = Some(Utc::now());
            }
            Err(message) => {
                tracing::warn!(key = %key, error = %message, "Query failed");
                entry.status = QueryStatus::Error;
                entry.error = Some(message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use registrar_core::api::ApiError;
    use registrar_core::users::User;
    use tokio::sync::oneshot;

    use super::*;
    use crate::cache::MemoryQueryCache;

    fn client(options: QueryOptions) -> Arc<QueryClient> {
        Arc::new(QueryClient::new(
            Arc::new(MemoryQueryCache::new(64)),
            options,
        ))
    }

    fn ada() -> Vec<User> {
        vec![User::new("1", "Ada", "Lovelace")]
    }

    async fn counted(calls: &AtomicUsize, users: Vec<User>) -> api::Result<Vec<User>> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(users)
    }

    /// A fetcher that resolves when the test sends on the returned channel.
    fn gated() -> (
        oneshot::Sender<api::Result<Vec<User>>>,
        impl Future<Output = api::Result<Vec<User>>>,
    ) {
        let (tx, rx) = oneshot::channel();
        let fut = async move {
            rx.await
                .unwrap_or_else(|_| Err(ApiError::Transport("dropped".to_string())))
        };
        (tx, fut)
    }

    async fn wait_for_status(client: &QueryClient, key: &str, status: QueryStatus) {
        for _ in 0..100 {
            if client.state::<Vec<User>>(key).await.status == status {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("{} never reached {:?}", key, status);
    }

    #[tokio::test]
    async fn test_unknown_key_is_idle() {
        let client = client(QueryOptions::default());
        let state: QueryState<Vec<User>> = client.state("users").await;
        assert_eq!(state.status, QueryStatus::Idle);
        assert!(state.data.is_none());
    }

    #[tokio::test]
    async fn test_fetch_success_populates_cache() {
        let client = client(QueryOptions::default());
        let state = client.fetch("users", async { Ok(ada()) }).await;

        assert_eq!(state.status, QueryStatus::Success);
        assert_eq!(state.data, Some(ada()));
        assert!(state.fetched_at.is_some());
        assert_eq!(client.state::<Vec<User>>("users").await.data, Some(ada()));
    }

    #[tokio::test]
    async fn test_zero_stale_time_always_refetches() {
        let client = client(QueryOptions::default());
        let calls = AtomicUsize::new(0);

        client.fetch("users", counted(&calls, ada())).await;
        client.fetch("users", counted(&calls, ada())).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fresh_data_is_served_from_cache() {
        let client = client(QueryOptions {
            stale_time: Duration::from_secs(60),
            ..QueryOptions::default()
        });
        let calls = AtomicUsize::new(0);

        client.fetch("users", counted(&calls, ada())).await;
        let state = client.fetch("users", counted(&calls, Vec::new())).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(state.data, Some(ada()));
    }

    #[tokio::test]
    async fn test_invalidated_data_is_refetched_despite_stale_time() {
        let client = client(QueryOptions {
            stale_time: Duration::from_secs(60),
            ..QueryOptions::default()
        });
        let calls = AtomicUsize::new(0);

        client.fetch("users", counted(&calls, ada())).await;
        assert_eq!(
            client.invalidate(&KeyFilter::exact("users")).await,
            vec!["users".to_string()]
        );
        let state = client.fetch("users", counted(&calls, Vec::new())).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(state.data, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_error_keeps_previous_data() {
        let client = client(QueryOptions::default());
        client.fetch("users", async { Ok(ada()) }).await;

        let state: QueryState<Vec<User>> = client
            .fetch("users", async {
                Err(ApiError::Server {
                    status: 500,
                    message: "boom".to_string(),
                })
            })
            .await;

        assert_eq!(state.status, QueryStatus::Error);
        assert_eq!(state.error.as_deref(), Some("Server returned 500: boom"));
        assert_eq!(state.data, Some(ada()));
    }

    #[tokio::test]
    async fn test_success_clears_error() {
        let client = client(QueryOptions::default());
        client
            .fetch::<Vec<User>, _>("users", async {
                Err(ApiError::Transport("down".to_string()))
            })
            .await;
        let state = client.fetch("users", async { Ok(ada()) }).await;

        assert_eq!(state.status, QueryStatus::Success);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_loading_while_in_flight() {
        let client = client(QueryOptions::default());
        let (tx, fut) = gated();

        let task = {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.fetch("users", fut).await })
        };
        wait_for_status(&client, "users", QueryStatus::Loading).await;

        tx.send(Ok(ada())).unwrap();
        let state = task.await.unwrap();
        assert_eq!(state.status, QueryStatus::Success);
    }

    #[tokio::test]
    async fn test_superseded_response_is_discarded() {
        let client = client(QueryOptions::default());
        let (slow_tx, slow) = gated();
        let (fast_tx, fast) = gated();

        let slow_task = {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.fetch("users:search:J", slow).await })
        };
        wait_for_status(&client, "users:search:J", QueryStatus::Loading).await;

        let fast_task = {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.fetch("users:search:J", fast).await })
        };
        // Let the second fetch register its generation.
        tokio::time::sleep(Duration::from_millis(20)).await;

        fast_tx.send(Ok(ada())).unwrap();
        fast_task.await.unwrap();
        slow_tx.send(Ok(Vec::new())).unwrap();
        slow_task.await.unwrap();

        let state: QueryState<Vec<User>> = client.state("users:search:J").await;
        assert_eq!(state.status, QueryStatus::Success);
        assert_eq!(state.data, Some(ada()));
    }

    #[tokio::test]
    async fn test_invalidate_pattern_returns_matching_keys() {
        let client = client(QueryOptions::default());
        client.fetch("users", async { Ok(ada()) }).await;
        client.fetch("users:search:", async { Ok(ada()) }).await;
        client.fetch("users:search:Ada", async { Ok(ada()) }).await;

        let mut keys = client
            .invalidate(&KeyFilter::pattern("users:search:*"))
            .await;
        keys.sort();
        assert_eq!(keys, vec!["users:search:", "users:search:Ada"]);
    }

    #[tokio::test]
    async fn test_invalidate_uncached_key() {
        let client = client(QueryOptions::default());
        assert!(client
            .invalidate(&KeyFilter::exact("users"))
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_status_tracking_is_bounded() {
        let client = client(QueryOptions {
            max_keys: 2,
            ..QueryOptions::default()
        });

        for term in ["a", "b", "c", "d", "e"] {
            let key = format!("users:search:{}", term);
            client.fetch(&key, async { Ok(ada()) }).await;
        }

        assert_eq!(client.tracked_keys().await, 2);
        let latest: QueryState<Vec<User>> = client.state("users:search:e").await;
        assert_eq!(latest.status, QueryStatus::Success);
        let forgotten: QueryState<Vec<User>> = client.state("users:search:a").await;
        assert_eq!(forgotten.status, QueryStatus::Idle);
    }

    #[tokio::test]
    async fn test_evicted_result_reads_as_idle_and_refetches() {
        let client = Arc::new(QueryClient::new(
            Arc::new(MemoryQueryCache::new(1)),
            QueryOptions {
                stale_time: Duration::from_secs(60),
                ..QueryOptions::default()
            },
        ));
        let calls = AtomicUsize::new(0);

        client.fetch("users", counted(&calls, ada())).await;
        client.fetch("users:search:x", async { Ok(Vec::<User>::new()) }).await;

        let evicted: QueryState<Vec<User>> = client.state("users").await;
        assert_eq!(evicted, QueryState::default());

        let state = client.fetch("users", counted(&calls, ada())).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(state.data, Some(ada()));
    }
}
