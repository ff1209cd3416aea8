//! The query coordinator.
//!
//! One [`QueryClient`] holds every cache entry. Pages call [`QueryClient::query`]
//! with a key and a fetcher; concurrent callers for the same key share one
//! in-flight request. Mutations run through [`QueryClient::mutate`], which
//! invalidates key prefixes on success and refetches the affected entries
//! that still have subscribers.
//!
//! Fetches run on the ambient tokio runtime. Every fetch takes a generation
//! number from a single counter; a completion is applied only if it carries
//! the latest generation issued for its entry, so the last-issued fetch wins
//! and completions for evicted entries are dropped.

use crate::error::QueryError;
use crate::key::QueryKey;
use crate::observer::QueryObserver;
use crate::policy::{QueryConfig, RefetchPolicy};
use crate::state::{AnyData, QueryState, QueryStatus, RawState};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use parking_lot::Mutex;
use std::collections::{hash_map, HashMap};
use std::error::Error as StdError;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::Instant;

type Fetcher = Arc<dyn Fn() -> BoxFuture<'static, Result<AnyData, QueryError>> + Send + Sync>;

struct Entry {
    /// Distinguishes this entry from a later one created under the same key.
    id: u64,
    tx: watch::Sender<RawState>,
    subscribers: usize,
    invalidated: bool,
    fetched_at: Option<Instant>,
    /// Generation of the most recently issued fetch (0 = none yet).
    issued: u64,
    /// Generation of the most recently applied completion.
    settled: u64,
    fetch_count: u64,
    idle_since: Option<Instant>,
    fetcher: Option<Fetcher>,
}

impl Entry {
    fn new(id: u64) -> Self {
        let (tx, _) = watch::channel(RawState::pending());
        Self {
            id,
            tx,
            subscribers: 0,
            invalidated: false,
            fetched_at: None,
            issued: 0,
            settled: 0,
            fetch_count: 0,
            idle_since: None,
            fetcher: None,
        }
    }

    fn is_fetching(&self) -> bool {
        self.issued != self.settled
    }

    fn has_data(&self) -> bool {
        self.tx.borrow().data.is_some()
    }

    fn status(&self) -> QueryStatus {
        self.tx.borrow().status
    }

    /// An in-flight fetch was always issued after the latest invalidation,
    /// so joining it is enough.
    fn needs_fetch_on_mount(&self, policy: RefetchPolicy, now: Instant) -> bool {
        if self.is_fetching() {
            return false;
        }
        if self.invalidated || !self.has_data() {
            return true;
        }
        policy.should_refetch(self.fetched_at, now)
    }

    /// Marks a new fetch as issued and returns what the task needs to run it.
    fn begin_fetch(&mut self, generation: u64) -> Option<Fetcher> {
        let fetcher = self.fetcher.clone()?;
        self.issued = generation;
        self.fetch_count += 1;
        self.tx.send_modify(|state| state.is_fetching = true);
        Some(fetcher)
    }

    /// Drops the in-flight fetch without issuing a new one. Its completion
    /// no longer matches `issued` and is discarded.
    fn abandon_fetch(&mut self, generation: u64) {
        self.issued = generation;
        self.settled = generation;
        self.tx.send_modify(|state| state.is_fetching = false);
    }
}

#[derive(Default)]
struct Store {
    entries: HashMap<QueryKey, Entry>,
    next_generation: u64,
}

impl Store {
    fn next_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    /// Returns the entry for `key`, creating it with a fresh id.
    fn entry_mut(&mut self, key: QueryKey) -> &mut Entry {
        match self.entries.entry(key) {
            hash_map::Entry::Occupied(slot) => slot.into_mut(),
            hash_map::Entry::Vacant(slot) => {
                self.next_generation += 1;
                slot.insert(Entry::new(self.next_generation))
            }
        }
    }

    fn begin_fetch(&mut self, key: &QueryKey) -> Option<(u64, Fetcher)> {
        let generation = self.next_generation();
        let entry = self.entries.get_mut(key)?;
        let fetcher = entry.begin_fetch(generation)?;
        Some((generation, fetcher))
    }
}

struct Inner {
    store: Mutex<Store>,
    config: QueryConfig,
}

/// Diagnostics for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryStats {
    pub key: QueryKey,
    pub status: QueryStatus,
    pub subscribers: usize,
    pub fetch_count: u64,
    pub is_fetching: bool,
    pub invalidated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: Vec<EntryStats>,
}

impl CacheStats {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &QueryKey) -> Option<&EntryStats> {
        self.entries.iter().find(|e| &e.key == key)
    }

    pub fn fetching(&self) -> usize {
        self.entries.iter().filter(|e| e.is_fetching).count()
    }
}

/// Shared handle to the cache. Clones refer to the same store.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(QueryConfig::default())
    }
}

impl QueryClient {
    pub fn new(config: QueryConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                store: Mutex::new(Store::default()),
                config,
            }),
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.inner.config
    }

    /// Subscribes to `key`, fetching with `fetcher` when the entry is new,
    /// invalidated, without data, or stale under `policy`.
    ///
    /// The most recent fetcher registered for a key is the one used by later
    /// background refetches. Must be called from within a tokio runtime.
    pub fn query<T, E, F, Fut>(&self, key: QueryKey, policy: RefetchPolicy, fetcher: F) -> QueryObserver<T>
    where
        T: Send + Sync + 'static,
        E: StdError + Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let erased: Fetcher = Arc::new(move || {
            fetcher()
                .map(|result| {
                    result
                        .map(|value| Arc::new(value) as AnyData)
                        .map_err(QueryError::new)
                })
                .boxed()
        });

        let now = Instant::now();
        let (rx, entry_id, fetch) = {
            let mut store = self.inner.store.lock();
            let entry = store.entry_mut(key.clone());
            let entry_id = entry.id;
            entry.fetcher = Some(erased);
            entry.subscribers += 1;
            entry.idle_since = None;
            let rx = entry.tx.subscribe();
            let fetch = if entry.needs_fetch_on_mount(policy, now) {
                store.begin_fetch(&key)
            } else {
                None
            };
            (rx, entry_id, fetch)
        };

        if let Some((generation, fetcher)) = fetch {
            self.spawn_fetch(key.clone(), generation, fetcher);
        }

        QueryObserver::new(self.clone(), key, entry_id, rx)
    }

    /// Runs a mutation once. On success every entry under `invalidates` is
    /// marked invalid and those with subscribers refetch in the background.
    /// On failure nothing is invalidated.
    pub async fn mutate<T, E, Fut>(&self, mutation: Fut, invalidates: &[QueryKey]) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
    {
        let result = mutation.await;
        match &result {
            Ok(_) => {
                self.invalidate(invalidates);
            }
            Err(_) => {
                tracing::debug!("mutation failed, cache left untouched");
            }
        }
        result
    }

    /// Marks every entry whose key starts with one of `prefixes` invalid.
    /// Returns the number of matching entries.
    pub fn invalidate(&self, prefixes: &[QueryKey]) -> usize {
        let mut to_fetch = Vec::new();
        let matched = {
            let mut store = self.inner.store.lock();
            let keys: Vec<QueryKey> = store
                .entries
                .keys()
                .filter(|k| k.matches_any(prefixes))
                .cloned()
                .collect();
            for key in &keys {
                let generation = store.next_generation();
                let active = match store.entries.get_mut(key) {
                    Some(entry) => {
                        entry.invalidated = true;
                        if entry.subscribers == 0 && entry.is_fetching() {
                            tracing::debug!(%key, "dropping fetch issued before invalidation");
                            entry.abandon_fetch(generation);
                        }
                        entry.subscribers > 0
                    }
                    None => false,
                };
                if active {
                    if let Some((generation, fetcher)) = store.begin_fetch(key) {
                        to_fetch.push((key.clone(), generation, fetcher));
                    }
                }
            }
            keys.len()
        };

        tracing::info!(
            matched,
            refetching = to_fetch.len(),
            prefixes = %format_keys(prefixes),
            "invalidated queries"
        );
        for (key, generation, fetcher) in to_fetch {
            self.spawn_fetch(key, generation, fetcher);
        }
        matched
    }

    /// Starts a new fetch for `key` even if one is in flight. Returns false
    /// when the key is unknown.
    pub fn refetch(&self, key: &QueryKey) -> bool {
        let fetch = self.inner.store.lock().begin_fetch(key);
        match fetch {
            Some((generation, fetcher)) => {
                self.spawn_fetch(key.clone(), generation, fetcher);
                true
            }
            None => false,
        }
    }

    /// Refetches every entry that currently has subscribers.
    pub fn refetch_active(&self) -> usize {
        let fetches: Vec<(QueryKey, u64, Fetcher)> = {
            let mut store = self.inner.store.lock();
            let keys: Vec<QueryKey> = store
                .entries
                .iter()
                .filter(|(_, e)| e.subscribers > 0)
                .map(|(k, _)| k.clone())
                .collect();
            keys.into_iter()
                .filter_map(|key| {
                    store
                        .begin_fetch(&key)
                        .map(|(generation, fetcher)| (key, generation, fetcher))
                })
                .collect()
        };
        let count = fetches.len();
        for (key, generation, fetcher) in fetches {
            self.spawn_fetch(key, generation, fetcher);
        }
        count
    }

    pub fn get_query_state<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<QueryState<T>> {
        let store = self.inner.store.lock();
        store
            .entries
            .get(key)
            .map(|entry| QueryState::from_raw(&entry.tx.borrow()))
    }

    pub fn get_query_data<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        self.get_query_state::<T>(key).and_then(|state| state.data)
    }

    /// Stores `value` as fresh data for `key`, creating the entry if needed.
    pub fn set_query_data<T: Send + Sync + 'static>(&self, key: QueryKey, value: T) {
        let now = Instant::now();
        let mut store = self.inner.store.lock();
        let entry = store.entry_mut(key);
        if entry.subscribers == 0 && entry.idle_since.is_none() {
            entry.idle_since = Some(now);
        }
        entry.fetched_at = Some(now);
        entry.invalidated = false;
        entry.tx.send_modify(|state| {
            state.status = QueryStatus::Success;
            state.data = Some(Arc::new(value) as AnyData);
            state.error = None;
        });
    }

    /// Drops the entry. Observers keep their last snapshot; in-flight
    /// completions for it are discarded.
    pub fn remove(&self, key: &QueryKey) -> bool {
        self.inner.store.lock().entries.remove(key).is_some()
    }

    /// Evicts entries that have had no subscribers for longer than the grace
    /// period. Returns the number evicted.
    pub fn gc(&self) -> usize {
        let grace = self.inner.config.gc_grace;
        let now = Instant::now();
        let mut store = self.inner.store.lock();
        let before = store.entries.len();
        store.entries.retain(|key, entry| {
            let expired = entry.subscribers == 0
                && entry
                    .idle_since
                    .is_some_and(|since| now.saturating_duration_since(since) >= grace);
            if expired {
                tracing::debug!(%key, "evicting idle query");
            }
            !expired
        });
        before - store.entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        let store = self.inner.store.lock();
        let mut entries: Vec<EntryStats> = store
            .entries
            .iter()
            .map(|(key, entry)| EntryStats {
                key: key.clone(),
                status: entry.status(),
                subscribers: entry.subscribers,
                fetch_count: entry.fetch_count,
                is_fetching: entry.is_fetching(),
                invalidated: entry.invalidated,
            })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        CacheStats { entries }
    }

    /// Number of fetches issued for `key` so far (0 if unknown).
    pub fn fetch_count(&self, key: &QueryKey) -> u64 {
        self.inner
            .store
            .lock()
            .entries
            .get(key)
            .map(|e| e.fetch_count)
            .unwrap_or(0)
    }

    /// Ignored when `key` now names a different entry than the one
    /// subscribed to, e.g. after `remove`.
    pub(crate) fn unsubscribe(&self, key: &QueryKey, entry_id: u64) {
        let mut store = self.inner.store.lock();
        if let Some(entry) = store.entries.get_mut(key).filter(|e| e.id == entry_id) {
            entry.subscribers = entry.subscribers.saturating_sub(1);
            if entry.subscribers == 0 {
                entry.idle_since = Some(Instant::now());
            }
        }
    }

    fn spawn_fetch(&self, key: QueryKey, generation: u64, fetcher: Fetcher) {
        tracing::debug!(%key, generation, "fetch started");
        let client = self.clone();
        tokio::spawn(async move {
            let result = fetcher().await;
            client.complete(&key, generation, result);
        });
    }

    fn complete(&self, key: &QueryKey, generation: u64, result: Result<AnyData, QueryError>) {
        let mut store = self.inner.store.lock();
        let Some(entry) = store.entries.get_mut(key) else {
            tracing::debug!(%key, generation, "fetch finished for evicted query, discarded");
            return;
        };
        if generation != entry.issued {
            tracing::debug!(
                %key,
                generation,
                latest = entry.issued,
                "superseded fetch finished, discarded"
            );
            return;
        }

        entry.settled = generation;
        match result {
            Ok(data) => {
                tracing::debug!(%key, generation, "fetch succeeded");
                entry.fetched_at = Some(Instant::now());
                entry.invalidated = false;
                entry.tx.send_modify(|state| {
                    state.status = QueryStatus::Success;
                    state.data = Some(data);
                    state.error = None;
                    state.is_fetching = false;
                });
            }
            Err(error) => {
                tracing::debug!(%key, generation, %error, "fetch failed");
                entry.tx.send_modify(|state| {
                    state.status = QueryStatus::Error;
                    state.error = Some(error);
                    state.is_fetching = false;
                });
            }
        }
    }
}

fn format_keys(keys: &[QueryKey]) -> String {
    keys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_key;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Debug, thiserror::Error)]
    #[error("fetch failed: {0}")]
    struct FetchFailed(&'static str);

    fn counting_fetcher(
        calls: Arc<AtomicUsize>,
    ) -> impl Fn() -> BoxFuture<'static, Result<usize, FetchFailed>> + Send + Sync + 'static {
        move || {
            let calls = calls.clone();
            async move { Ok(calls.fetch_add(1, Ordering::SeqCst) + 1) }.boxed()
        }
    }

    #[tokio::test]
    async fn concurrent_subscribers_share_one_fetch() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = query_key!["branches"];

        let mut a = client.query(key.clone(), RefetchPolicy::Always, counting_fetcher(calls.clone()));
        let mut b = client.query(key.clone(), RefetchPolicy::Always, counting_fetcher(calls.clone()));

        let sa = a.wait_settled().await;
        let sb = b.wait_settled().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(sa.data(), Some(&1));
        let (da, db) = (sa.data.unwrap(), sb.data.unwrap());
        assert!(Arc::ptr_eq(&da, &db));
        assert_eq!(client.fetch_count(&key), 1);
    }

    #[tokio::test]
    async fn never_policy_reuses_cached_data() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = query_key!["dashboard"];

        let mut first = client.query(key.clone(), RefetchPolicy::Never, counting_fetcher(calls.clone()));
        first.wait_settled().await;
        drop(first);

        let mut second = client.query(key.clone(), RefetchPolicy::Never, counting_fetcher(calls.clone()));
        let state = second.wait_settled().await;
        assert_eq!(state.data(), Some(&1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn always_policy_refetches_on_mount() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = query_key!["transfers"];

        let mut first = client.query(key.clone(), RefetchPolicy::Always, counting_fetcher(calls.clone()));
        first.wait_settled().await;
        drop(first);

        let mut second = client.query(key.clone(), RefetchPolicy::Always, counting_fetcher(calls.clone()));
        // Cached value is visible while the refetch runs.
        assert_eq!(second.state().data(), Some(&1));
        let state = second.wait_settled().await;
        assert_eq!(state.data(), Some(&2));
    }

    #[tokio::test(start_paused = true)]
    async fn if_stale_policy_waits_for_age() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = query_key!["branches"];
        let policy = RefetchPolicy::IfStale(Duration::from_secs(30));

        let mut first = client.query(key.clone(), policy, counting_fetcher(calls.clone()));
        first.wait_settled().await;

        let _fresh = client.query(key.clone(), policy, counting_fetcher(calls.clone()));
        assert_eq!(client.fetch_count(&key), 1);

        tokio::time::advance(Duration::from_secs(31)).await;
        let mut stale = client.query(key.clone(), policy, counting_fetcher(calls.clone()));
        let state = stale.wait_settled().await;
        assert_eq!(client.fetch_count(&key), 2);
        assert_eq!(state.data(), Some(&2));
    }

    #[tokio::test]
    async fn successful_mutation_invalidates_and_refetches() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let all = query_key!["assets"];
        let branch = query_key!["assets", {"branchId" => 3}];
        let other = query_key!["transfers"];

        let mut all_obs = client.query(all.clone(), RefetchPolicy::Never, counting_fetcher(calls.clone()));
        let mut other_obs = client.query(other.clone(), RefetchPolicy::Never, counting_fetcher(Arc::new(AtomicUsize::new(0))));
        all_obs.wait_settled().await;
        other_obs.wait_settled().await;

        // Entry without subscribers: invalidated, refetched on next access.
        let mut branch_obs = client.query(branch.clone(), RefetchPolicy::Never, counting_fetcher(Arc::new(AtomicUsize::new(0))));
        branch_obs.wait_settled().await;
        drop(branch_obs);

        let result: Result<&str, FetchFailed> = client
            .mutate(async { Ok("created") }, &[query_key!["assets"]])
            .await;
        assert_eq!(result.unwrap(), "created");

        let state = all_obs.wait_settled().await;
        assert_eq!(state.data(), Some(&2));
        assert_eq!(client.fetch_count(&all), 2);
        assert_eq!(client.fetch_count(&other), 1);

        let stats = client.stats();
        assert!(stats.get(&branch).is_some_and(|e| e.invalidated && e.fetch_count == 1));

        let mut remount = client.query(branch.clone(), RefetchPolicy::Never, counting_fetcher(Arc::new(AtomicUsize::new(10))));
        remount.wait_settled().await;
        assert_eq!(client.fetch_count(&branch), 2);
        assert!(!client.stats().get(&branch).is_some_and(|e| e.invalidated));
    }

    #[tokio::test(start_paused = true)]
    async fn invalidation_supersedes_fetch_without_subscribers() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = query_key!["assets"];
        let fetcher = {
            let calls = calls.clone();
            move || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        tokio::time::sleep(Duration::from_millis(500)).await;
                        Ok::<_, FetchFailed>("before write")
                    } else {
                        Ok("after write")
                    }
                }
            }
        };

        // Unmount while the first fetch is still running.
        drop(client.query(key.clone(), RefetchPolicy::Never, fetcher.clone()));
        assert!(client.stats().get(&key).is_some_and(|e| e.is_fetching && e.subscribers == 0));

        let result: Result<(), FetchFailed> = client.mutate(async { Ok(()) }, &[query_key!["assets"]]).await;
        assert!(result.is_ok());
        assert!(client.stats().get(&key).is_some_and(|e| e.invalidated && !e.is_fetching));

        let mut obs = client.query(key.clone(), RefetchPolicy::Never, fetcher);
        let state = obs.wait_settled().await;
        assert_eq!(state.data(), Some(&"after write"));
        assert_eq!(client.fetch_count(&key), 2);

        // The old request finishing later changes nothing.
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(obs.state().data(), Some(&"after write"));
        assert!(!client.stats().get(&key).is_some_and(|e| e.invalidated));
    }

    #[tokio::test]
    async fn failed_mutation_invalidates_nothing() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = query_key!["users"];
        let mut obs = client.query(key.clone(), RefetchPolicy::Never, counting_fetcher(calls.clone()));
        obs.wait_settled().await;

        let result: Result<(), FetchFailed> = client
            .mutate(async { Err(FetchFailed("duplicate email")) }, &[query_key!["users"]])
            .await;
        assert!(result.is_err());
        assert_eq!(client.fetch_count(&key), 1);
        assert!(!client.stats().get(&key).is_some_and(|e| e.invalidated));
    }

    #[tokio::test]
    async fn failed_refetch_keeps_previous_data() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = query_key!["assets"];
        let fetcher = {
            let calls = calls.clone();
            move || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Ok(vec!["desk"])
                    } else {
                        Err(FetchFailed("server down"))
                    }
                }
            }
        };

        let mut obs = client.query(key.clone(), RefetchPolicy::Never, fetcher);
        obs.wait_settled().await;
        assert!(obs.refetch());
        let state = obs.wait_settled().await;

        assert_eq!(state.status, QueryStatus::Error);
        assert_eq!(state.data(), Some(&vec!["desk"]));
        let error = state.error.expect("error is recorded");
        assert_eq!(
            error.downcast_ref::<FetchFailed>().map(|e| e.0),
            Some("server down")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn last_issued_fetch_wins() {
        let client = QueryClient::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = query_key!["branch", 1];
        let fetcher = {
            let calls = calls.clone();
            move || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        tokio::time::sleep(Duration::from_millis(500)).await;
                        Ok::<_, FetchFailed>("old")
                    } else {
                        Ok("new")
                    }
                }
            }
        };

        let mut obs = client.query(key.clone(), RefetchPolicy::Never, fetcher);
        assert!(client.refetch(&key));
        let state = obs.wait_settled().await;
        assert_eq!(state.data(), Some(&"new"));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(obs.state().data(), Some(&"new"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn gc_evicts_idle_entries_after_grace() {
        let client = QueryClient::new(QueryConfig::new().with_gc_grace(Duration::from_secs(60)));
        let calls = Arc::new(AtomicUsize::new(0));
        let kept = query_key!["kept"];
        let dropped = query_key!["dropped"];

        let mut kept_obs = client.query(kept.clone(), RefetchPolicy::Never, counting_fetcher(calls.clone()));
        let mut dropped_obs = client.query(dropped.clone(), RefetchPolicy::Never, counting_fetcher(calls.clone()));
        kept_obs.wait_settled().await;
        dropped_obs.wait_settled().await;
        drop(dropped_obs);

        assert_eq!(client.gc(), 0);
        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(client.gc(), 1);
        assert!(client.get_query_data::<usize>(&dropped).is_none());
        assert!(client.get_query_data::<usize>(&kept).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn observer_from_removed_entry_leaves_new_entry_alone() {
        let client = QueryClient::new(QueryConfig::new().with_gc_grace(Duration::from_secs(1)));
        let calls = Arc::new(AtomicUsize::new(0));
        let key = query_key!["users"];

        let mut old = client.query(key.clone(), RefetchPolicy::Never, counting_fetcher(calls.clone()));
        old.wait_settled().await;
        assert!(client.remove(&key));

        let mut live = client.query(key.clone(), RefetchPolicy::Never, counting_fetcher(calls.clone()));
        live.wait_settled().await;
        drop(old);
        assert_eq!(client.stats().get(&key).map(|e| e.subscribers), Some(1));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(client.gc(), 0);
        assert_eq!(live.state().data(), Some(&2));

        drop(live);
        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(client.gc(), 1);
    }

    #[tokio::test]
    async fn set_and_remove_query_data() {
        let client = QueryClient::default();
        let key = query_key!["asset-history", 4];
        client.set_query_data(key.clone(), vec![1u8, 2]);
        assert_eq!(client.get_query_data::<Vec<u8>>(&key).as_deref(), Some(&vec![1, 2]));
        assert!(client.remove(&key));
        assert!(!client.remove(&key));
        assert!(!client.refetch(&key));
    }
}
