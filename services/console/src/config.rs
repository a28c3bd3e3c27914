//! services/console/src/config.rs
//!
//! Defines the console's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which backend holds the persisted session blob.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStoreKind {
    File,
    Memory,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub seed_path: PathBuf,
    pub session_store: SessionStoreKind,
    pub session_dir: PathBuf,
    pub session_key: String,
    pub recent_records_limit: usize,
    pub log_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_path: PathBuf::from("./data/seed.json"),
            session_store: SessionStoreKind::File,
            session_dir: PathBuf::from("./.recordkeep"),
            session_key: "currentUser".to_string(),
            recent_records_limit: 5,
            log_level: Level::INFO,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to keep tests hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source. Unset variables take
    /// the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let seed_path = lookup("SEED_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.seed_path);

        let session_store = match lookup("SESSION_STORE").as_deref() {
            None => defaults.session_store,
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "file" => SessionStoreKind::File,
                "memory" => SessionStoreKind::Memory,
                _ => {
                    return Err(ConfigError::InvalidValue(
                        "SESSION_STORE".to_string(),
                        format!("'{}' is not one of 'file' or 'memory'", raw),
                    ))
                }
            },
        };

        let session_dir = lookup("SESSION_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.session_dir);

        let session_key = lookup("SESSION_KEY").unwrap_or(defaults.session_key);
        if session_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "SESSION_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let recent_records_limit = match lookup("RECENT_RECORDS_LIMIT") {
            None => defaults.recent_records_limit,
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                ConfigError::InvalidValue("RECENT_RECORDS_LIMIT".to_string(), e.to_string())
            })?,
        };

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            seed_path,
            session_store,
            session_dir,
            session_key,
            recent_records_limit,
            log_level,
        })
    }
}
