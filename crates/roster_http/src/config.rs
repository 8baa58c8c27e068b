//! Layered service configuration.
//!
//! # Responsibility
//! - Define the serde-backed configuration tree with working defaults.
//! - Load it from an optional TOML file overlaid by `ROSTER__*` env vars.
//!
//! # Invariants
//! - An absent file and empty environment yield `RosterConfig::default()`.
//! - Env keys map to nested fields with `__` (`ROSTER__SERVER__PORT`).

use config::{Config, ConfigError, Environment, File};
use roster_core::{default_log_level, LogTarget};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "ROSTER";
const ENV_SEPARATOR: &str = "__";

/// Top-level service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub errors: ErrorConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
}

/// SQLite database location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

/// Logging level and destination. `dir = None` logs to stderr.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ErrorConfig {
    pub exposure: ErrorExposure,
}

/// How much of a domain failure the HTTP surface reveals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorExposure {
    /// Fixed per-operation messages; every transfer failure is a 404.
    #[default]
    Generic,
    /// Status by error kind and the internal error text as detail.
    Detailed,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("roster.sqlite3"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}

impl LoggingConfig {
    pub fn target(&self) -> LogTarget {
        match &self.dir {
            Some(dir) => LogTarget::Directory(dir.clone()),
            None => LogTarget::Stderr,
        }
    }
}

/// Loads configuration from `path` (when given) and the process environment.
///
/// # Errors
/// - The given file does not exist or is not valid TOML.
/// - A value cannot be converted to its field type.
pub fn load_config(path: Option<&Path>) -> Result<RosterConfig, ConfigError> {
    load_with_env(path, env_source())
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

fn load_with_env(path: Option<&Path>, env: Environment) -> Result<RosterConfig, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }
    builder.add_source(env).build()?.try_deserialize()
}
