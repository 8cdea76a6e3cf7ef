//! services/companion/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use tracing::Level;

/// Browsers typically allow about 5 MiB of local storage per origin.
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;
pub const DEFAULT_WRITE_RETRIES: u32 = 3;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory holding one JSON document per record key.
    pub data_dir: PathBuf,
    pub log_level: Level,
    /// Total bytes the record store may hold. `None` means unlimited.
    pub quota_bytes: Option<u64>,
    /// How many times a repository re-applies a mutation after losing a write race.
    pub write_retries: u32,
}

impl Config {
    /// Default settings for the given data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            log_level: Level::INFO,
            quota_bytes: Some(DEFAULT_QUOTA_BYTES),
            write_retries: DEFAULT_WRITE_RETRIES,
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup("MINDCARE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./mindcare-data"));

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let quota_bytes = match lookup("MINDCARE_QUOTA_BYTES") {
            None => Some(DEFAULT_QUOTA_BYTES),
            Some(raw) => match raw.parse::<u64>() {
                Ok(0) => None,
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    return Err(ConfigError::InvalidValue(
                        "MINDCARE_QUOTA_BYTES".to_string(),
                        e.to_string(),
                    ))
                }
            },
        };

        let write_retries = lookup("MINDCARE_WRITE_RETRIES")
            .map(|raw| {
                raw.parse::<u32>().map_err(|e| {
                    ConfigError::InvalidValue("MINDCARE_WRITE_RETRIES".to_string(), e.to_string())
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_WRITE_RETRIES);

        Ok(Self {
            data_dir,
            log_level,
            quota_bytes,
            write_retries,
        })
    }
}
