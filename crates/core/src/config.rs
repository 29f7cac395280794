//! Configuration structures for the orbit tracker.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Public ISS ephemeris feed (CCSDS OEM, J2000 frame).
pub const DEFAULT_FEED_URL: &str =
    "https://nasa-public-data.s3.amazonaws.com/iss-coords/current/ISS_OEM/ISS.OEM_J2K_EPH.xml";

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upstream feed configuration.
    pub feed: FeedConfig,
    /// Series cache configuration.
    pub store: StoreConfig,
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Ground location configuration.
    pub location: LocationConfig,
}

impl Config {
    /// Load a configuration from a JSON file. Missing sections take defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        if self.feed.url.is_empty() && self.feed.path.is_none() {
            return Err(Error::config("feed needs either a url or a path"));
        }
        if self.feed.timeout_secs == 0 {
            return Err(Error::config("feed.timeout_secs must be positive"));
        }
        Ok(())
    }
}

/// Where the state-vector document comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Remote document URL.
    pub url: String,
    /// Local document; takes precedence over `url` when set.
    pub path: Option<PathBuf>,
    /// Upper bound on a single fetch, seconds.
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            path: None,
            timeout_secs: 30,
        }
    }
}

/// Series cache configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite file; in-memory when unset.
    pub path: Option<PathBuf>,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// TCP port to listen on.
    pub port: u16,
}

impl ServerConfig {
    /// `host:port` string for binding.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Reverse geocoding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Nominatim-compatible `/reverse` endpoint; place names are skipped when unset.
    pub geocoder_url: Option<String>,
    /// User agent sent to the geocoder.
    pub user_agent: String,
    /// Upper bound on a single geocoder call, seconds.
    pub timeout_secs: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            geocoder_url: None,
            user_agent: "orbit-tracker".to_string(),
            timeout_secs: 10,
        }
    }
}
