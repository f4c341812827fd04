//! Application configuration, read once at startup and passed into the
//! services that need it.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "sqlite:booboo.db";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:8080";
const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Where the AI webhooks live and how long to wait for them
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookConfig {
    pub enhancement_url: Option<String>,
    pub memo_url: Option<String>,
    pub timeout: Duration,
    /// Answer locally instead of calling the webhooks
    pub mock_ai: bool,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            enhancement_url: None,
            memo_url: None,
            timeout: Duration::from_secs(DEFAULT_WEBHOOK_TIMEOUT_SECS),
            mock_ai: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub frontend_origin: String,
    pub webhooks: WebhookConfig,
    /// Built frontend to serve alongside the API
    pub static_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            host: IpAddr::from([127, 0, 0, 1]),
            port: DEFAULT_PORT,
            frontend_origin: DEFAULT_FRONTEND_ORIGIN.to_string(),
            webhooks: WebhookConfig::default(),
            static_dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host_value = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host = host_value
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::Invalid { key: "HOST", value: host_value.clone() })?;

        let port = match get("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value })?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match get("WEBHOOK_TIMEOUT_SECS") {
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::Invalid { key: "WEBHOOK_TIMEOUT_SECS", value }),
            },
            None => DEFAULT_WEBHOOK_TIMEOUT_SECS,
        };

        let mock_ai = match get("MOCK_AI").as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("false") | Some("0") | Some("no") => false,
            Some("true") | Some("1") | Some("yes") => true,
            Some(other) => {
                return Err(ConfigError::Invalid { key: "MOCK_AI", value: other.to_string() })
            }
        };

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            host,
            port,
            frontend_origin: get("FRONTEND_ORIGIN").unwrap_or_else(|| DEFAULT_FRONTEND_ORIGIN.to_string()),
            webhooks: WebhookConfig {
                enhancement_url: get("ENHANCEMENT_WEBHOOK_URL"),
                memo_url: get("MEMO_WEBHOOK_URL"),
                timeout: Duration::from_secs(timeout_secs),
                mock_ai,
            },
            static_dir: get("STATIC_DIR").map(PathBuf::from),
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
