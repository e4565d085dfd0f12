//! Environment-driven client configuration.

use std::time::Duration;

use thiserror::Error;

use crate::request::RequestConfig;

pub const DEFAULT_API_URL: &str = "https://dummyjson.com";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

pub const API_URL_VAR: &str = "DASHBOARD_API_URL";
pub const TIMEOUT_VAR: &str = "DASHBOARD_API_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} must be an http(s) URL, got {value:?}")]
    InvalidUrl { name: &'static str, value: String },

    #[error("{name} must be a whole number of milliseconds, got {value:?}")]
    InvalidTimeout { name: &'static str, value: String },
}

/// Where the upstream lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Unset or blank variables
    /// fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_VAR).filter(|v| !v.trim().is_empty()) {
            let url = url.trim().trim_end_matches('/').to_string();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl {
                    name: API_URL_VAR,
                    value: url,
                });
            }
            config.base_url = url;
        }

        if let Some(raw) = lookup(TIMEOUT_VAR).filter(|v| !v.trim().is_empty()) {
            let millis = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout {
                    name: TIMEOUT_VAR,
                    value: raw.clone(),
                })?;
            config.timeout = Duration::from_millis(millis);
        }

        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Instance defaults for an `HttpClient`.
    pub fn defaults(&self) -> RequestConfig {
        RequestConfig {
            base_url: Some(self.base_url.clone()),
            timeout: Some(self.timeout),
            ..RequestConfig::default()
        }
    }
}
