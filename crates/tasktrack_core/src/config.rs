//! Runtime configuration for hosts embedding the store.
//!
//! # Responsibility
//! - Read storage and logging settings from the environment.
//! - Open the configured key-value backend.
//!
//! # Invariants
//! - `log_level` is always a normalized level name.
//! - No path set means an ephemeral in-memory database.

use crate::logging::{default_log_level, init_logging, normalize_level};
use crate::storage::{SqliteKeyValueStore, StorageResult};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "TASKTRACK_DB";
pub const ENV_LOG_LEVEL: &str = "TASKTRACK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TASKTRACK_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    /// Logging could not be initialized with the configured values.
    Logging(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(message) | Self::Logging(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub storage_path: Option<PathBuf>,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let log_level = match non_empty(ENV_LOG_LEVEL) {
            Some(value) => normalize_level(&value).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        Ok(Self {
            storage_path: non_empty(ENV_DB_PATH).map(PathBuf::from),
            log_level: log_level.to_string(),
            log_dir: non_empty(ENV_LOG_DIR).map(PathBuf::from),
        })
    }

    /// Starts file logging when a log directory is configured.
    pub fn init_logging(&self) -> Result<bool, ConfigError> {
        let Some(dir) = &self.log_dir else {
            return Ok(false);
        };
        init_logging(&self.log_level, &dir.to_string_lossy()).map_err(ConfigError::Logging)?;
        Ok(true)
    }

    /// Opens the configured SQLite key-value backend.
    pub fn open_storage(&self) -> StorageResult<SqliteKeyValueStore> {
        match &self.storage_path {
            Some(path) => SqliteKeyValueStore::open(path),
            None => SqliteKeyValueStore::open_in_memory(),
        }
    }
}
