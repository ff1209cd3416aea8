//! Normalized failures of the HTTP adapter.

use assetdesk_core::ValidationError;
use thiserror::Error;

/// Every failure a resource accessor can return.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// No response was received (connection refused, DNS, timeout).
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// 401 or 403. The session context signs the user out on these.
    #[error("Unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("Unexpected response body: {message}")]
    Decode { message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl ApiError {
    /// Builds the variant for a non-success status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if status == 401 || status == 403 {
            Self::Unauthorized { status, message }
        } else {
            Self::Http { status, message }
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } | ApiError::Unauthorized { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short text suitable for a toast or an inline form error.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { message, .. } | ApiError::Unauthorized { message, .. } => {
                message.clone()
            }
            ApiError::Network { .. } => "Unable to reach the server".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode {
                message: err.to_string(),
            }
        } else if err.is_builder() {
            ApiError::InvalidConfig(err.to_string())
        } else {
            ApiError::Network {
                message: err.to_string(),
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_statuses_map_to_unauthorized() {
        assert!(ApiError::from_status(401, "expired").is_auth_failure());
        assert!(ApiError::from_status(403, "forbidden").is_auth_failure());
        assert!(!ApiError::from_status(404, "missing").is_auth_failure());
        assert!(!ApiError::from_status(500, "boom").is_auth_failure());
    }

    #[test]
    fn user_message_prefers_server_text() {
        let err = ApiError::from_status(400, "Asset code already exists");
        assert_eq!(err.user_message(), "Asset code already exists");
        assert_eq!(err.status(), Some(400));

        let err = ApiError::Network {
            message: "connection refused".into(),
        };
        assert_eq!(err.user_message(), "Unable to reach the server");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn validation_errors_convert() {
        let err: ApiError = ValidationError::missing("reason").into();
        assert_eq!(err.to_string(), "Required field missing: reason");
    }
}
