use std::net::{Ipv4Addr, SocketAddr};

use dashboard_core::{ClientConfig, ConfigError};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 4000;
pub const PORT_VAR: &str = "PORT";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayConfigError {
    #[error("{PORT_VAR} must be a port number, got {0:?}")]
    InvalidPort(String),

    #[error(transparent)]
    Upstream(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub port: u16,
    pub upstream: ClientConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            upstream: ClientConfig::default(),
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, GatewayConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, GatewayConfigError> {
        let port = match lookup(PORT_VAR).filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| GatewayConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PORT,
        };
        Ok(Self {
            port,
            upstream: ClientConfig::from_lookup(lookup)?,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}
