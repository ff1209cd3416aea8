use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// Failure of a query fetcher, shared by every subscriber of the entry.
///
/// The original error stays reachable through [`QueryError::downcast_ref`].
#[derive(Debug, Clone, Error)]
#[error(transparent)]
pub struct QueryError(Arc<dyn StdError + Send + Sync + 'static>);

impl QueryError {
    pub fn new<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self(Arc::new(err))
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }

    pub fn ptr_eq(&self, other: &QueryError) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
