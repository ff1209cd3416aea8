//! HTTP client adapter.
//!
//! Owns the `reqwest` client, prefixes the base URL, attaches the bearer
//! token of the current session and normalizes every failure into
//! [`ApiError`]. It never retries and never redirects the user anywhere.

use crate::error::{ApiError, ApiResult};
use crate::session::SessionStore;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest raw error body carried into an error message.
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Cheaply clonable handle; clones share the connection pool and session.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: Arc<str>,
    session: SessionStore,
}

impl HttpClient {
    pub fn new(config: &ClientConfig, session: SessionStore) -> ApiResult<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ApiError::InvalidConfig("base URL is empty".to_string()));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidConfig(format!(
                "base URL must start with http:// or https://, got {}",
                base_url
            )));
        }
        if config.request_timeout.is_zero() {
            return Err(ApiError::InvalidConfig("request timeout must be positive".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Issues one request and decodes the JSON response as `T`.
    ///
    /// Empty bodies decode as JSON `null`, so `()` and `Option<_>` work for
    /// endpoints that return nothing.
    pub async fn request<T, Q, B>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method.clone(), url);
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(%method, path, error = %err, "request failed without response");
                return Err(ApiError::from(err));
            }
        };

        let status = response.status();
        tracing::debug!(%method, path, status = status.as_u16(), "request completed");

        let bytes = response.bytes().await?;
        if status.is_success() {
            decode_body(&bytes)
        } else {
            Err(ApiError::from_status(
                status.as_u16(),
                error_message(status, &bytes),
            ))
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request::<T, (), ()>(Method::GET, path, None, None).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.request::<T, Q, ()>(Method::GET, path, Some(query), None)
            .await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request::<T, (), B>(Method::POST, path, None, Some(body))
            .await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request::<T, (), B>(Method::PUT, path, None, Some(body))
            .await
    }

    pub async fn patch<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request::<T, (), ()>(Method::PATCH, path, None, None)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request::<T, (), ()>(Method::DELETE, path, None, None)
            .await
    }

    pub async fn delete_with_body<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request::<T, (), B>(Method::DELETE, path, None, Some(body))
            .await
    }
}

fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> ApiResult<T> {
    let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        bytes
    };
    serde_json::from_slice(body).map_err(|e| ApiError::Decode {
        message: e.to_string(),
    })
}

/// Server `message` (or `error`) field, else the raw body, else the reason phrase.
fn error_message(status: reqwest::StatusCode, bytes: &[u8]) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_slice::<serde_json::Value>(bytes) {
        for key in ["message", "error"] {
            if let Some(serde_json::Value::String(text)) = map.get(key) {
                if !text.trim().is_empty() {
                    return text.clone();
                }
            }
        }
    }

    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    if !text.is_empty() {
        return text.chars().take(MAX_ERROR_BODY).collect();
    }

    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn rejects_bad_base_urls() {
        let session = SessionStore::new();
        assert!(matches!(
            HttpClient::new(&ClientConfig::new(""), session.clone()),
            Err(ApiError::InvalidConfig(_))
        ));
        assert!(matches!(
            HttpClient::new(&ClientConfig::new("localhost:3000"), session.clone()),
            Err(ApiError::InvalidConfig(_))
        ));
        assert!(matches!(
            HttpClient::new(
                &ClientConfig::new("http://localhost").with_timeout(Duration::ZERO),
                session
            ),
            Err(ApiError::InvalidConfig(_))
        ));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client =
            HttpClient::new(&ClientConfig::new("http://localhost:3000/api/"), SessionStore::new())
                .unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000/api");
    }

    #[test]
    fn error_message_sources() {
        let status = StatusCode::BAD_REQUEST;
        assert_eq!(error_message(status, br#"{"message":"Duplicate code"}"#), "Duplicate code");
        assert_eq!(error_message(status, br#"{"error":"Bad input"}"#), "Bad input");
        assert_eq!(error_message(status, b"plain failure"), "plain failure");
        assert_eq!(error_message(status, b""), "Bad Request");
    }

    #[test]
    fn empty_body_decodes_as_unit() {
        let unit: ApiResult<()> = decode_body(b"");
        assert!(unit.is_ok());
        let missing: ApiResult<Option<u32>> = decode_body(b"  ");
        assert_eq!(missing.unwrap(), None);
        let wrong: ApiResult<Vec<u32>> = decode_body(br#"{"a":1}"#);
        assert!(matches!(wrong, Err(ApiError::Decode { .. })));
    }
}
