use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{HushError, HushResult};

/// Upper bound on `server.max_duration_secs` (one year)
pub const MAX_DURATION_LIMIT_SECS: u64 = 365 * 24 * 3600;

/// Top-level configuration (loaded from hushlink.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HushConfig {
    pub server: ServerConfig,
    pub client: ClientConfig,
    pub log: LogConfig,
}

/// Storage service (`hushlinkd`) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// TCP listen address (default: 127.0.0.1:8080)
    pub listen: String,
    /// Seconds between sweeps of expired records (default: 60)
    pub cleanup_interval_secs: u64,
    /// Longest accepted time-to-live in seconds (default: 7 days)
    pub max_duration_secs: u64,
    /// Largest accepted request body in bytes (default: 1 MiB)
    pub max_payload_bytes: usize,
    /// Seal stored blobs under a per-process key (default: true)
    pub seal_at_rest: bool,
}

/// `hushlink` client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the storage service; also the origin of created links
    pub server_url: String,
    /// Time-to-live used when `create` is given no duration
    pub default_duration_secs: u64,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Refuse plaintext `http://` endpoints
    pub enforce_tls: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (default: info)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8080".into(),
            cleanup_interval_secs: 60,
            max_duration_secs: 7 * 24 * 3600,
            max_payload_bytes: 1024 * 1024,
            seal_at_rest: true,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".into(),
            default_duration_secs: 3600,
            request_timeout_secs: 30,
            enforce_tls: false,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl HushConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> HushResult<Self> {
        let config: HushConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> HushResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| HushError::Config(format!("{}: {e}", path.display())))
    }

    pub fn validate(&self) -> HushResult<()> {
        if self.server.cleanup_interval_secs == 0 {
            return Err(HushError::Config(
                "server.cleanup_interval_secs must be greater than 0".into(),
            ));
        }
        if self.server.max_duration_secs == 0 {
            return Err(HushError::Config(
                "server.max_duration_secs must be greater than 0".into(),
            ));
        }
        if self.server.max_duration_secs > MAX_DURATION_LIMIT_SECS {
            return Err(HushError::Config(format!(
                "server.max_duration_secs must not exceed {MAX_DURATION_LIMIT_SECS}"
            )));
        }
        if self.client.default_duration_secs == 0 {
            return Err(HushError::Config(
                "client.default_duration_secs must be greater than 0".into(),
            ));
        }
        if !matches!(self.log.format.as_str(), "json" | "text") {
            return Err(HushError::Config(format!(
                "log.format must be \"json\" or \"text\", got {:?}",
                self.log.format
            )));
        }
        Ok(())
    }
}
