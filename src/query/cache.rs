//! Query Cache
//!
//! Request-deduplicating cache with interval refetching. Each key owns a
//! `watch` channel; views subscribe to it and re-render on change.

use futures_util::future::BoxFuture;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::state::{QueryKey, QueryOptions, QueryState};
use crate::api::ApiResult;

/// Produces one fetch of a query's data
pub type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, ApiResult<T>> + Send + Sync>;

/// Wrap an async closure as a [`Fetcher`]
pub fn fetcher<T, F, Fut>(f: F) -> Fetcher<T>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ApiResult<T>> + Send + 'static,
{
    Arc::new(move || Box::pin(f()))
}

struct Entry<T> {
    sender: Arc<watch::Sender<QueryState<T>>>,
    in_flight: Arc<AtomicBool>,
}

impl<T> Entry<T> {
    fn new() -> Self {
        let (sender, _) = watch::channel(QueryState::Pending);
        Self {
            sender: Arc::new(sender),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// Clears the in-flight flag when a fetch task ends, even by panic
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Shared cache of query states, one entry per [`QueryKey`]
pub struct QueryClient<T> {
    entries: Arc<RwLock<HashMap<QueryKey, Entry<T>>>>,
}

impl<T> Clone for QueryClient<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T> Default for QueryClient<T> {
    fn default() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T: Send + Sync + 'static> QueryClient<T> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or create) the channel and in-flight flag for a key
    async fn entry(
        &self,
        key: &QueryKey,
    ) -> (Arc<watch::Sender<QueryState<T>>>, Arc<AtomicBool>) {
        if let Some(entry) = self.entries.read().await.get(key) {
            return (Arc::clone(&entry.sender), Arc::clone(&entry.in_flight));
        }

        let mut entries = self.entries.write().await;
        let entry = entries.entry(key.clone()).or_insert_with(Entry::new);
        (Arc::clone(&entry.sender), Arc::clone(&entry.in_flight))
    }

    /// Subscribe to state changes for a key
    ///
    /// The receiver immediately holds the cached state, so a late subscriber
    /// sees data fetched before it arrived.
    pub async fn subscribe(&self, key: &QueryKey) -> watch::Receiver<QueryState<T>> {
        let (sender, _) = self.entry(key).await;
        sender.subscribe()
    }

    /// Snapshot of the cached state for a key
    pub async fn state(&self, key: &QueryKey) -> QueryState<T> {
        match self.entries.read().await.get(key) {
            Some(entry) => entry.sender.borrow().clone(),
            None => QueryState::Pending,
        }
    }

    /// Number of cached keys
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Run one fetch for `key` and publish the outcome.
    ///
    /// Returns `false` without calling `fetcher` if a fetch for the same key
    /// is already in flight; that fetch's result is published to every
    /// subscriber of the key. The fetch runs on its own task, so cancelling
    /// the caller (or dropping the [`QueryHandle`] that started it) never
    /// loses the result.
    pub async fn fetch(&self, key: &QueryKey, fetcher: &Fetcher<T>) -> bool {
        let (sender, in_flight) = self.entry(key).await;

        if in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::trace!(key = %key, "Fetch already in flight, skipping");
            return false;
        }
        let guard = InFlightGuard(in_flight);

        let task_key = key.clone();
        let fetcher = Arc::clone(fetcher);
        let task = tokio::spawn(async move {
            let _guard = guard;
            tracing::debug!(key = %task_key, "Fetching query");

            let state = match fetcher().await {
                Ok(data) => QueryState::Success { data: Arc::new(data) },
                Err(e) => {
                    tracing::warn!(key = %task_key, error = %e, "Query failed");
                    QueryState::Error(Arc::new(e))
                }
            };

            sender.send_replace(state);
        });

        if let Err(e) = task.await {
            tracing::error!(key = %key, error = %e, "Fetch task panicked");
        }
        true
    }

    /// Mount a query: fetch now, then refetch on `options.refetch_interval`.
    ///
    /// Polling stops when the returned handle is dropped.
    pub async fn watch(
        &self,
        key: QueryKey,
        options: QueryOptions,
        fetcher: Fetcher<T>,
    ) -> QueryHandle<T> {
        let receiver = self.subscribe(&key).await;
        let client = self.clone();
        let task_key = key.clone();
        let task_fetcher = Arc::clone(&fetcher);

        let task = tokio::spawn(async move {
            client.fetch(&task_key, &task_fetcher).await;

            let Some(period) = options.refetch_interval else {
                return;
            };

            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately; the mount fetch already ran
            interval.tick().await;

            loop {
                interval.tick().await;
                client.fetch(&task_key, &task_fetcher).await;
            }
        });

        QueryHandle {
            key,
            receiver,
            client: self.clone(),
            fetcher,
            task,
        }
    }
}

/// A mounted query owned by a view
pub struct QueryHandle<T> {
    key: QueryKey,
    receiver: watch::Receiver<QueryState<T>>,
    client: QueryClient<T>,
    fetcher: Fetcher<T>,
    task: JoinHandle<()>,
}

impl<T: Send + Sync + 'static> QueryHandle<T> {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Current state
    pub fn state(&self) -> QueryState<T> {
        self.receiver.borrow().clone()
    }

    /// Fetch now, outside the polling schedule
    pub async fn refetch(&self) -> bool {
        self.client.fetch(&self.key, &self.fetcher).await
    }

    /// Wait for the next state change
    pub async fn changed(&mut self) {
        if self.receiver.changed().await.is_err() {
            // Sender lives as long as the cache; nothing will ever arrive
            std::future::pending::<()>().await;
        }
    }
}

impl<T> Drop for QueryHandle<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
