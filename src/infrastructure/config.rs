//! Service configuration.
//!
//! Defaults point at the public services. Override via environment
//! variables or explicit construction for staging/testing.

use std::path::PathBuf;

use url::Url;

/// Pricing and posting service used when `POSTAQUI_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "https://f29faec4-6487-4b60-882f-383b4054cc32.mock.pstmn.io";
/// ViaCEP.
pub const DEFAULT_ADDRESS_LOOKUP_URL: &str = "https://viacep.com.br";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Base URL of the pricing and posting service.
    pub base_url: Url,
    /// Base URL of the postal-code lookup service.
    pub address_lookup_url: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Directory for the rolling log file.
    pub log_dir: PathBuf,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `POSTAQUI_BASE_URL` (default: the hosted mock pricing service)
    /// - `POSTAQUI_ADDRESS_LOOKUP_URL` (default: `https://viacep.com.br`)
    /// - `POSTAQUI_TIMEOUT_SECS` (default: 30)
    /// - `POSTAQUI_LOG_DIR` (default: `<local data dir>/postaqui/logs`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`ServiceConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs = match lookup("POSTAQUI_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url: parse_url("POSTAQUI_BASE_URL", lookup("POSTAQUI_BASE_URL"), DEFAULT_BASE_URL)?,
            address_lookup_url: parse_url(
                "POSTAQUI_ADDRESS_LOOKUP_URL",
                lookup("POSTAQUI_ADDRESS_LOOKUP_URL"),
                DEFAULT_ADDRESS_LOOKUP_URL,
            )?,
            timeout_secs,
            log_dir: lookup("POSTAQUI_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_log_dir),
        })
    }

    /// Configuration with every service at `base_url` (for testing).
    pub fn local(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_url("base_url", Some(base_url.to_string()), base_url)?,
            address_lookup_url: parse_url("address_lookup_url", Some(base_url.to_string()), base_url)?,
            timeout_secs: 5,
            log_dir: PathBuf::from("logs"),
        })
    }
}

fn parse_url(var: &str, value: Option<String>, default: &str) -> Result<Url, ConfigError> {
    let raw = value.unwrap_or_else(|| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("postaqui").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("POSTAQUI_TIMEOUT_SECS must be a whole number of seconds, got {0:?}")]
    InvalidTimeout(String),
}
