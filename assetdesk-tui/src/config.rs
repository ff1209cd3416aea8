//! Configuration loading for the AssetDesk terminal client.
//!
//! Top-level keys are required. The `[cache]` and `[toast]` tables fall back
//! to their defaults when omitted.

use assetdesk_client::ClientConfig;
use assetdesk_query::QueryConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV: &str = "ASSETDESK_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout_ms: u64,
    pub refresh_interval_ms: u64,
    pub persistence_path: PathBuf,
    pub log_path: PathBuf,
    pub export_dir: PathBuf,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub toast: ToastConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    pub stale_time_ms: u64,
    pub gc_grace_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time_ms: 0,
            gc_grace_ms: 300_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToastConfig {
    pub duration_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self { duration_ms: 3_000 }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or ASSETDESK_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parses and expands `~/` in path fields. Does not validate.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let mut config: AppConfig = toml::from_str(contents)?;
        config.persistence_path = expand_home(&config.persistence_path);
        config.log_path = expand_home(&config.log_path);
        config.export_dir = expand_home(&config.export_dir);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                reason: "must not be empty".to_string(),
            });
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                reason: "must start with http:// or https://".to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "refresh_interval_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.persistence_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "persistence_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.log_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.export_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "export_dir",
                reason: "must not be empty".to_string(),
            });
        }
        if self.cache.gc_grace_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cache.gc_grace_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.toast.duration_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "toast.duration_ms",
                reason: "must be > 0".to_string(),
            });
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_base_url.trim())
            .with_timeout(Duration::from_millis(self.request_timeout_ms))
    }

    pub fn query_config(&self) -> QueryConfig {
        QueryConfig::new()
            .with_stale_time(Duration::from_millis(self.cache.stale_time_ms))
            .with_gc_grace(Duration::from_millis(self.cache.gc_grace_ms))
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast.duration_ms)
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV).ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
api_base_url = "http://localhost:3000/api"
request_timeout_ms = 10000
refresh_interval_ms = 250
persistence_path = "/tmp/assetdesk/ui.json"
log_path = "/tmp/assetdesk/assetdesk.log"
export_dir = "."

[cache]
stale_time_ms = 0
gc_grace_ms = 300000

[toast]
duration_ms = 3000
"#;

    #[test]
    fn parses_full_file() {
        let config = AppConfig::from_toml(SAMPLE).unwrap();
        config.validate().unwrap();
        assert_eq!(config.toast_duration(), Duration::from_secs(3));
        assert_eq!(config.query_config().gc_grace, Duration::from_secs(300));
        assert_eq!(
            config.client_config().request_timeout,
            Duration::from_secs(10)
        );
    }

    #[test]
    fn optional_tables_default() {
        let trimmed: String = SAMPLE.split("[cache]").next().unwrap().to_string();
        let config = AppConfig::from_toml(&trimmed).unwrap();
        assert_eq!(config.cache.gc_grace_ms, 300_000);
        assert_eq!(config.toast.duration_ms, 3_000);
    }

    #[test]
    fn rejects_unknown_keys() {
        let with_extra = format!("{}\ntheme = \"dark\"\n", SAMPLE.split("[cache]").next().unwrap());
        assert!(matches!(
            AppConfig::from_toml(&with_extra),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_url_without_scheme() {
        let mut config = AppConfig::from_toml(SAMPLE).unwrap();
        config.api_base_url = "localhost:3000".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "api_base_url", .. })
        ));
    }

    #[test]
    fn rejects_zero_timeouts() {
        let mut config = AppConfig::from_toml(SAMPLE).unwrap();
        config.request_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::from_toml(SAMPLE).unwrap();
        config.refresh_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn expands_home_prefix() {
        let config = AppConfig::from_toml(&SAMPLE.replace(
            "/tmp/assetdesk/ui.json",
            "~/.local/state/assetdesk/ui.json",
        ))
        .unwrap();
        if std::env::var_os("HOME").is_some() {
            assert!(!config.persistence_path.starts_with("~"));
        }
        assert!(config.persistence_path.ends_with(".local/state/assetdesk/ui.json"));
    }
}
