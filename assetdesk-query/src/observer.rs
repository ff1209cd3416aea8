use crate::client::QueryClient;
use crate::key::QueryKey;
use crate::state::{QueryState, RawState};
use std::marker::PhantomData;
use tokio::sync::watch;

/// A live subscription to one cache entry. Dropping it unsubscribes.
pub struct QueryObserver<T> {
    client: QueryClient,
    key: QueryKey,
    entry_id: u64,
    rx: watch::Receiver<RawState>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> QueryObserver<T> {
    pub(crate) fn new(
        client: QueryClient,
        key: QueryKey,
        entry_id: u64,
        rx: watch::Receiver<RawState>,
    ) -> Self {
        Self {
            client,
            key,
            entry_id,
            rx,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Current snapshot. Never blocks.
    pub fn state(&self) -> QueryState<T> {
        QueryState::from_raw(&self.rx.borrow())
    }

    /// Waits for the next published change. Returns false once the entry
    /// has been removed from the cache.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Waits until no fetch is in flight and returns that state.
    pub async fn wait_settled(&mut self) -> QueryState<T> {
        if let Ok(state) = self.rx.wait_for(|state| !state.is_fetching).await {
            return QueryState::from_raw(&state);
        }
        self.state()
    }

    /// Starts a fresh fetch of this entry.
    pub fn refetch(&self) -> bool {
        self.client.refetch(&self.key)
    }
}

impl<T> Drop for QueryObserver<T> {
    fn drop(&mut self) {
        self.client.unsubscribe(&self.key, self.entry_id);
    }
}
