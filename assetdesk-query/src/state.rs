//! Published state of a cache entry.

use crate::error::QueryError;
use std::any::Any;
use std::sync::Arc;

pub(crate) type AnyData = Arc<dyn Any + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryStatus {
    /// No fetch has completed yet.
    Pending,
    Success,
    Error,
}

/// Type-erased snapshot sent through the entry's watch channel.
#[derive(Clone)]
pub(crate) struct RawState {
    pub status: QueryStatus,
    pub data: Option<AnyData>,
    pub error: Option<QueryError>,
    pub is_fetching: bool,
}

impl RawState {
    pub fn pending() -> Self {
        Self {
            status: QueryStatus::Pending,
            data: None,
            error: None,
            is_fetching: false,
        }
    }
}

/// What a subscriber sees.
pub struct QueryState<T> {
    pub status: QueryStatus,
    /// Last successful value. Survives failed refetches.
    pub data: Option<Arc<T>>,
    /// Last failure, cleared by the next success.
    pub error: Option<QueryError>,
    pub is_fetching: bool,
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            is_fetching: self.is_fetching,
        }
    }
}

impl<T: Send + Sync + 'static> QueryState<T> {
    pub(crate) fn from_raw(raw: &RawState) -> Self {
        let data = raw.data.as_ref().and_then(|d| match Arc::clone(d).downcast::<T>() {
            Ok(data) => Some(data),
            Err(_) => {
                tracing::warn!(
                    expected = std::any::type_name::<T>(),
                    "cached value has a different type than requested"
                );
                None
            }
        });
        Self {
            status: raw.status,
            data,
            error: raw.error.clone(),
            is_fetching: raw.is_fetching,
        }
    }
}

impl<T> QueryState<T> {
    /// First load still in flight: nothing to show yet.
    pub fn is_loading(&self) -> bool {
        self.data.is_none() && self.error.is_none()
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcast_to_requested_type() {
        let raw = RawState {
            status: QueryStatus::Success,
            data: Some(Arc::new(vec![1u32, 2, 3]) as AnyData),
            error: None,
            is_fetching: false,
        };
        let state: QueryState<Vec<u32>> = QueryState::from_raw(&raw);
        assert_eq!(state.data(), Some(&vec![1, 2, 3]));
        assert!(state.is_success());
        assert!(!state.is_loading());

        let wrong: QueryState<String> = QueryState::from_raw(&raw);
        assert!(wrong.data.is_none());
    }

    #[test]
    fn pending_is_loading() {
        let state: QueryState<u8> = QueryState::from_raw(&RawState::pending());
        assert!(state.is_loading());
        assert_eq!(state.status, QueryStatus::Pending);
    }
}
