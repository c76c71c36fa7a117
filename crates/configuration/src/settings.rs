use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound on the peers that contribute to industry averages.
pub const MAX_PEERS: usize = 5;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

impl Settings {
    /// Checks the values that deserialization alone cannot catch.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "api.base_url must not be empty".to_string(),
            ));
        }
        if !(1..=MAX_PEERS).contains(&self.api.max_peers) {
            return Err(ConfigError::ValidationError(format!(
                "api.max_peers must be between 1 and {}, got {}",
                MAX_PEERS, self.api.max_peers
            )));
        }
        if self.api.request_timeout_secs == 0 || self.api.peer_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "api timeouts must be greater than zero seconds".to_string(),
            ));
        }
        Ok(())
    }
}

/// Connection settings for the market-data provider.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root of the provider's REST API, without a trailing slash.
    pub base_url: String,
    /// Provider API key. Usually supplied through `FINANCIAL_API_KEY`.
    pub api_key: Option<String>,
    /// Timeout for each request made on behalf of the scored company.
    pub request_timeout_secs: u64,
    /// Timeout for each request made while collecting peer benchmarks.
    pub peer_timeout_secs: u64,
    /// How many peers contribute to the industry averages.
    pub max_peers: usize,
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn peer_timeout(&self) -> Duration {
        Duration::from_secs(self.peer_timeout_secs)
    }

    /// Returns the API key when one is configured and not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://financialmodelingprep.com/api/v3".to_string(),
            api_key: None,
            request_timeout_secs: 10,
            peer_timeout_secs: 5,
            max_peers: MAX_PEERS,
        }
    }
}

// Keeps the key out of log lines and panic messages.
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("peer_timeout_secs", &self.peer_timeout_secs)
            .field("max_peers", &self.max_peers)
            .finish()
    }
}

/// Where the HTTP server listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                ConfigError::ValidationError(format!(
                    "invalid server address {}:{}: {}",
                    self.host, self.port, e
                ))
            })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Log verbosity and the optional rolling log file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
