//! Configuration Module
//!
//! Loads server configuration from a YAML file or from environment variables.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Deployment environment, selects the log format and level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Dev,
    Prod,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            other => Err(ConfigError::Invalid(format!("unknown environment '{}'", other))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Environment::Local => "local",
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        })
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Deployment environment
    pub env: Environment,
    /// HTTP server port
    pub server_port: u16,
    /// TTL in seconds applied to every cached result
    pub cache_ttl: u64,
    /// Interval in seconds between expiry sweeps
    pub sweep_interval: u64,
}

/// On-disk layout of the YAML config file.
#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    env: Environment,
    port: u16,
    cache: FileCacheConfig,
}

#[derive(Debug, Deserialize)]
struct FileCacheConfig {
    ttl: u64,
    clear: u64,
}

impl From<FileConfig> for Config {
    fn from(file: FileConfig) -> Self {
        Self {
            env: file.env,
            server_port: file.port,
            cache_ttl: file.cache.ttl,
            sweep_interval: file.cache.clear,
        }
    }
}

impl Config {
    /// Loads the configuration from `path` if given, otherwise from the
    /// environment, and validates it.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::load_path(path)?,
            None => Self::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads a YAML config file.
    ///
    /// ```yaml
    /// env: prod
    /// port: 8080
    /// cache:
    ///   ttl: 300
    ///   clear: 60
    /// ```
    pub fn load_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileConfig = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(file.into())
    }

    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `APP_ENV` - `local`, `dev` or `prod` (default: local)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `CACHE_TTL` - TTL of cached results in seconds (default: 300)
    /// - `CACHE_SWEEP_INTERVAL` - Sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            env: var("APP_ENV")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.env),
            server_port: var("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            cache_ttl: var("CACHE_TTL")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_ttl),
            sweep_interval: var("CACHE_SWEEP_INTERVAL")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sweep_interval),
        }
    }

    /// Rejects values the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep_interval == 0 {
            return Err(ConfigError::Invalid(
                "sweep interval must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            env: Environment::Local,
            server_port: 8080,
            cache_ttl: 300,
            sweep_interval: 60,
        }
    }
}
