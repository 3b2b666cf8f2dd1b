use std::{
    collections::HashMap,
    fmt::Debug,
    future::Future,
    hash::Hash,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};

use chrono::{DateTime, Utc};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::debug;

use crate::web_client::{ApiError, ApiResult};

/// How long an unread entry survives a `gc` pass by default
pub const DEFAULT_GC_TIME: Duration = Duration::from_secs(5 * 60);

pub type FetchResult<V> = Result<Arc<V>, ApiError>;

type InFlight<V> = Shared<BoxFuture<'static, FetchResult<V>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Nothing loaded yet
    Pending,
    Success,
    /// The last fetch failed; older data may still be present
    Error,
}

/// Snapshot of one cache entry
#[derive(Debug, Clone)]
pub struct QueryState<V> {
    pub data: Option<Arc<V>>,
    #[cfg(test)]
    pub error: Option<ApiError>,
    pub status: QueryStatus,
    pub is_fetching: bool,
    #[cfg(test)]
    pub is_invalidated: bool,
    pub data_updated_at: Option<DateTime<Utc>>,
}

impl<V> Default for QueryState<V> {
    fn default() -> Self {
        Self {
            data: None,
            #[cfg(test)]
            error: None,
            status: QueryStatus::Pending,
            is_fetching: false,
            #[cfg(test)]
            is_invalidated: false,
            data_updated_at: None,
        }
    }
}

struct Entry<V> {
    data: Option<Arc<V>>,
    error: Option<ApiError>,
    data_updated_at: Option<DateTime<Utc>>,
    invalidated: bool,
    in_flight: Option<(u64, InFlight<V>)>,
    last_used: Instant,
}

impl<V> Entry<V> {
    fn new() -> Self {
        Self {
            data: None,
            error: None,
            data_updated_at: None,
            invalidated: false,
            in_flight: None,
            last_used: Instant::now(),
        }
    }

    fn snapshot(&self) -> QueryState<V> {
        let status = match (&self.error, &self.data) {
            (Some(_), _) => QueryStatus::Error,
            (None, Some(_)) => QueryStatus::Success,
            (None, None) => QueryStatus::Pending,
        };

        QueryState {
            data: self.data.clone(),
            #[cfg(test)]
            error: self.error.clone(),
            status,
            is_fetching: self.in_flight.is_some(),
            #[cfg(test)]
            is_invalidated: self.invalidated,
            data_updated_at: self.data_updated_at,
        }
    }
}

/// Serializable copy of the successful entries of a cache
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DehydratedState<K, V> {
    pub queries: Vec<DehydratedQuery<K, V>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DehydratedQuery<K, V> {
    pub key: K,
    pub data: V,
    pub data_updated_at: DateTime<Utc>,
}

/// Keyed cache of remote data.
///
/// Identical concurrent fetches are coalesced: the first caller starts the
/// request, later callers for the same key await the same shared future.
/// Only the entry's current fetch may write its result back.
pub struct QueryCache<K, V> {
    entries: Mutex<HashMap<K, Entry<V>>>,
    next_fetch_id: AtomicU64,
}

impl<K, V> Default for QueryCache<K, V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            next_fetch_id: AtomicU64::new(1),
        }
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<K, Entry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetches `key`, joining the in-flight request for it if there is one.
    pub async fn fetch<F, Fut>(&self, key: K, fetcher: F) -> FetchResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<V>> + Send + 'static,
    {
        let (fetch_id, in_flight) = {
            let mut entries = self.entries();
            let entry = entries.entry(key.clone()).or_insert_with(Entry::new);
            entry.last_used = Instant::now();

            match &entry.in_flight {
                Some((id, shared)) => {
                    debug!("Joining in-flight fetch for {:?}", key);
                    (*id, shared.clone())
                }
                None => {
                    debug!("Fetching {:?}", key);
                    let id = self.next_fetch_id.fetch_add(1, Ordering::Relaxed);
                    let shared = fetcher().map(|r| r.map(Arc::new)).boxed().shared();
                    entry.in_flight = Some((id, shared.clone()));
                    (id, shared)
                }
            }
        };

        let result = in_flight.await;
        self.settle(&key, fetch_id, &result);
        result
    }

    fn settle(&self, key: &K, fetch_id: u64, result: &FetchResult<V>) {
        let mut entries = self.entries();
        let Some(entry) = entries.get_mut(key) else {
            return;
        };

        if !matches!(entry.in_flight, Some((id, _)) if id == fetch_id) {
            return;
        }

        entry.in_flight = None;
        match result {
            Ok(data) => {
                entry.data = Some(Arc::clone(data));
                entry.data_updated_at = Some(Utc::now());
                entry.error = None;
                entry.invalidated = false;
            }
            Err(e) => {
                debug!("Fetch for {:?} failed: {}", key, e);
                entry.error = Some(e.clone());
            }
        }
    }

    /// Returns cached data unless it is missing or invalidated, otherwise fetches.
    pub async fn ensure<F, Fut>(&self, key: K, fetcher: F) -> FetchResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<V>> + Send + 'static,
    {
        if let Some(data) = self.fresh_data(&key) {
            debug!("Cache hit for {:?}", key);
            return Ok(data);
        }

        self.fetch(key, fetcher).await
    }

    /// Fetches and stores `key`; a failure is recorded on the entry, not returned.
    pub async fn prefetch<F, Fut>(&self, key: K, fetcher: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<V>> + Send + 'static,
    {
        let _ = self.fetch(key, fetcher).await;
    }

    fn fresh_data(&self, key: &K) -> Option<Arc<V>> {
        let mut entries = self.entries();
        let entry = entries.get_mut(key)?;
        entry.last_used = Instant::now();

        if entry.invalidated {
            return None;
        }
        entry.data.clone()
    }

    pub fn state(&self, key: &K) -> QueryState<V> {
        self.entries()
            .get(key)
            .map(Entry::snapshot)
            .unwrap_or_default()
    }

    pub fn get_data(&self, key: &K) -> Option<Arc<V>> {
        self.entries().get(key).and_then(|e| e.data.clone())
    }

    pub fn set_data(&self, key: K, data: V, updated_at: DateTime<Utc>) {
        let mut entries = self.entries();
        let entry = entries.entry(key).or_insert_with(Entry::new);
        entry.data = Some(Arc::new(data));
        entry.data_updated_at = Some(updated_at);
        entry.error = None;
        entry.invalidated = false;
    }

    /// Marks matching entries stale so the next `ensure` refetches them.
    /// A fetch already in flight for such an entry is detached and its result dropped.
    pub fn invalidate(&self, predicate: impl Fn(&K) -> bool) -> usize {
        let mut count = 0;
        for (key, entry) in self.entries().iter_mut().filter(|(k, _)| predicate(k)) {
            debug!("Invalidating {:?}", key);
            entry.invalidated = true;
            entry.in_flight = None;
            count += 1;
        }
        count
    }

    pub fn remove(&self, predicate: impl Fn(&K) -> bool) {
        self.entries().retain(|k, _| !predicate(k));
    }

    /// Drops entries that are idle and have not been read for `max_idle`.
    pub fn gc(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut entries = self.entries();
        let before = entries.len();

        entries.retain(|_, e| e.in_flight.is_some() || now.duration_since(e.last_used) < max_idle);

        before - entries.len()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries().len()
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone + Send + Sync + 'static,
{
    pub fn dehydrate(&self) -> DehydratedState<K, V> {
        let queries = self
            .entries()
            .iter()
            .filter(|(_, e)| e.error.is_none())
            .filter_map(|(key, e)| {
                let data = e.data.as_ref()?;
                let data_updated_at = e.data_updated_at?;
                Some(DehydratedQuery {
                    key: key.clone(),
                    data: V::clone(data),
                    data_updated_at,
                })
            })
            .collect();

        DehydratedState { queries }
    }

    /// Seeds entries from a snapshot. Entries holding newer data are kept.
    pub fn hydrate(&self, state: DehydratedState<K, V>) {
        for query in state.queries {
            let newer_local = self
                .state(&query.key)
                .data_updated_at
                .is_some_and(|local| local >= query.data_updated_at);

            if !newer_local {
                self.set_data(query.key, query.data, query.data_updated_at);
            }
        }
    }
}
