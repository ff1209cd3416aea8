//! AssetDesk Query - Fetch/Cache/Mutation Coordinator
//!
//! A keyed cache of server data with request de-duplication, prefix
//! invalidation and background refetch. Values are stored type-erased and
//! handed back as `Arc<T>`; errors are shared as [`QueryError`].

mod client;
mod error;
mod key;
mod observer;
mod policy;
mod state;

pub use client::{CacheStats, EntryStats, QueryClient};
pub use error::QueryError;
pub use key::{KeyPart, QueryKey};
pub use observer::QueryObserver;
pub use policy::{QueryConfig, RefetchPolicy};
pub use state::{QueryState, QueryStatus};
