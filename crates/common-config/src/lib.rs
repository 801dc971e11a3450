//! Shared configuration helpers for the platform services.

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading a service configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Configuration type owned by a single service.
///
/// Values come from `T::default()` or, when `<PREFIX>CONFIG` points at a file,
/// from that TOML document. Environment overrides are applied last.
pub trait ServiceConfig: DeserializeOwned + Default {
    /// Environment variable prefix, including the trailing underscore.
    const PREFIX: &'static str;

    fn apply_environment_overrides(&mut self, _prefix: &str) {}
}

/// Load the configuration for a service.
pub fn load<T: ServiceConfig>() -> Result<T, ConfigError> {
    let path_var = format!("{}CONFIG", T::PREFIX);
    let mut config = match env::var_os(&path_var) {
        Some(path) => load_file::<T>(Path::new(&path))?,
        None => T::default(),
    };
    config.apply_environment_overrides(T::PREFIX);
    Ok(config)
}

/// Parse a TOML configuration file without applying environment overrides.
pub fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Address a service listens on.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ListenConfig {
    pub bind_address: String,
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self::new("0.0.0.0", 8080)
    }
}

impl ListenConfig {
    pub fn new(bind_address: impl Into<String>, port: u16) -> Self {
        Self {
            bind_address: bind_address.into(),
            port,
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.bind_address, self.port).parse()
    }

    /// Honour `<PREFIX>BIND_ADDRESS` and `<PREFIX>PORT`.
    pub fn apply_environment_overrides(&mut self, prefix: &str) {
        if let Some(address) = env_override::<String>(&format!("{prefix}BIND_ADDRESS")) {
            self.bind_address = address;
        }
        self.port = service_port(&format!("{prefix}PORT"), self.port);
    }
}

/// Resolve the port for a service from an environment variable.
///
/// Falls back to the provided default when the variable is missing or cannot be
/// parsed into a `u16`.
pub fn service_port(var: &str, default: u16) -> u16 {
    env_override(var).unwrap_or(default)
}

/// Read and parse an environment variable, logging values that fail to parse.
pub fn env_override<T>(var: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = env::var(var).ok()?;
    value
        .parse::<T>()
        .inspect_err(|error| {
            tracing::warn!(%var, %value, %error, "invalid environment override, using default");
        })
        .ok()
}
