//! Error types for the terminal client.

use crate::config::ConfigError;
use crate::persistence::PersistenceError;
use assetdesk_client::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}
