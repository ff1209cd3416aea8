//! AssetDesk Client - REST Adapter
//!
//! One [`HttpClient`] per process, shared by clones. Resource accessors hang
//! off it (`client.assets().list(None)`) and are plain pass-throughs: no
//! caching, no retries.

pub mod assets;
pub mod auth;
pub mod branches;
pub mod dashboard;
pub mod error;
pub mod http;
pub mod session;
pub mod transfers;
pub mod users;

pub use error::{ApiError, ApiResult};
pub use http::{ClientConfig, HttpClient};
pub use session::{AuthOutcome, Session, SessionStore};
