//! Application configuration
//!
//! Read from `{config-dir}/cardstack/config.toml`. Every key is optional:
//! ```toml
//! [scheduler]
//! passing_grade = 3.0
//! completion_repetitions = 4
//!
//! [storage]
//! backend = "sqlite"
//! data_dir = "/home/me/cards"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flashcards::storage::{self, JsonStatusStore, StatusStore};
use crate::flashcards::{SchedulerPolicy, SqliteStatusStore};

const APP_DIR: &str = "cardstack";
const CONFIG_FILE: &str = "config.toml";
const SQLITE_FILE: &str = "statuses.sqlite3";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scheduler: SchedulerPolicy,
    pub storage: StorageConfig,
}

/// Which status store backs the sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Json,
    Sqlite,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Overrides the platform data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Open the configured status store under `data_dir`
    pub fn open_store(&self, data_dir: &Path) -> storage::Result<Box<dyn StatusStore>> {
        match self.backend {
            StorageBackend::Json => Ok(Box::new(JsonStatusStore::new(data_dir.to_path_buf())?)),
            StorageBackend::Sqlite => {
                let store = SqliteStatusStore::open(&data_dir.join(SQLITE_FILE))?;
                Ok(Box::new(store))
            }
        }
    }
}

impl Config {
    /// Get the default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load the config file at `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load from the default location, falling back to defaults
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.scheduler.validate().map_err(ConfigError::Invalid)
    }

    /// Directory holding sets and statuses
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.storage.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_local_dir()
            .map(|p| p.join(APP_DIR))
            .ok_or(ConfigError::DataDirNotFound)
    }
}
