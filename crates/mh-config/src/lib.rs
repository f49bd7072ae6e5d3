//! Monzo Webhook Tooling Configuration
//!
//! Builds a [`MonzoConfig`] once at process start. Sources, lowest to highest
//! precedence:
//! - Built-in defaults
//! - Optional TOML file named by `MONZO_CONFIG_FILE`
//! - Environment variables
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MONZO_ACCESS_TOKEN` | - | Bearer token (required) |
//! | `MONZO_API_BASE_URL` | `https://api.monzo.com` | API base URL |
//! | `MONZO_REQUEST_TIMEOUT_SECS` | `30` | Per-request timeout |
//! | `MONZO_CONNECT_TIMEOUT_SECS` | `10` | Connect timeout |
//! | `MONZO_CONFIG_FILE` | - | Path to a TOML file with the non-secret settings |

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

mod webhook_url;

pub use webhook_url::WebhookUrl;

pub const DEFAULT_API_BASE_URL: &str = "https://api.monzo.com";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

pub const ENV_ACCESS_TOKEN: &str = "MONZO_ACCESS_TOKEN";
pub const ENV_API_BASE_URL: &str = "MONZO_API_BASE_URL";
pub const ENV_REQUEST_TIMEOUT: &str = "MONZO_REQUEST_TIMEOUT_SECS";
pub const ENV_CONNECT_TIMEOUT: &str = "MONZO_CONNECT_TIMEOUT_SECS";
pub const ENV_CONFIG_FILE: &str = "MONZO_CONFIG_FILE";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    MissingCredential(&'static str),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("{0}")]
    InvalidWebhookUrl(String),

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn invalid_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Operator instructions to print alongside the error, if any
    pub fn remediation(&self) -> Option<String> {
        match self {
            ConfigError::MissingCredential(var) => Some(format!(
                "Please set your Monzo access token:\n  export {}=your_token_here",
                var
            )),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Opaque bearer token. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Settings shared by every Monzo API call in a run
#[derive(Debug, Clone)]
pub struct MonzoConfig {
    pub access_token: AccessToken,
    /// Base URL without trailing slash
    pub api_base_url: String,
    /// Applied to every outbound request
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl MonzoConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: AccessToken::new(access_token),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // The token is opaque: only an unset or empty value counts as missing
        let token = lookup(ENV_ACCESS_TOKEN)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingCredential(ENV_ACCESS_TOKEN))?;
        let mut config = Self::new(token);

        if let Some(path) = get(ENV_CONFIG_FILE) {
            let file = FileConfig::load(Path::new(&path))?;
            config = file.apply(config);
        }

        if let Some(url) = get(ENV_API_BASE_URL) {
            config = config.with_api_base_url(url);
        }
        if let Some(raw) = get(ENV_REQUEST_TIMEOUT) {
            config.request_timeout = parse_secs(ENV_REQUEST_TIMEOUT, &raw)?;
        }
        if let Some(raw) = get(ENV_CONNECT_TIMEOUT) {
            config.connect_timeout = parse_secs(ENV_CONNECT_TIMEOUT, &raw)?;
        }

        debug!(
            api_base_url = %config.api_base_url,
            request_timeout = ?config.request_timeout,
            connect_timeout = ?config.connect_timeout,
            "Loaded Monzo configuration"
        );

        Ok(config)
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::invalid_value(key, raw)),
    }
}

/// Non-secret settings that may live in a TOML file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileConfig = toml::from_str(&raw).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;

        for (key, value) in [
            ("request_timeout_secs", file.request_timeout_secs),
            ("connect_timeout_secs", file.connect_timeout_secs),
        ] {
            if value == Some(0) {
                return Err(ConfigError::invalid_value(key, "0"));
            }
        }

        debug!(path = %path.display(), "Loaded config file");
        Ok(file)
    }

    fn apply(self, mut config: MonzoConfig) -> MonzoConfig {
        if let Some(url) = self.api_base_url {
            config = config.with_api_base_url(url);
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.connect_timeout_secs {
            config.connect_timeout = Duration::from_secs(secs);
        }
        config
    }
}
