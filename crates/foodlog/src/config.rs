//! Configuration management for foodlog.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::Backend;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "foodlog";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FOODLOG_`)
/// 2. TOML config file at `~/.config/foodlog/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the record document and the image copies.
    /// Defaults to `~/.local/share/foodlog`
    pub data_dir: Option<PathBuf>,
    /// Which backend stores the records.
    pub backend: Backend,
    /// File name of the JSON document inside the data directory.
    pub document_name: String,
    /// File name of the `SQLite` database inside the data directory.
    pub database_name: String,
    /// Name of the image directory inside the data directory.
    pub images_dir_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None, // Will be resolved to default at runtime
            backend: Backend::Json,
            document_name: "foods.json".to_string(),
            database_name: "foods.db".to_string(),
            images_dir_name: "images".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `FOODLOG_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("FOODLOG_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let storage = &self.storage;
        for (field, value) in [
            ("document_name", &storage.document_name),
            ("database_name", &storage.database_name),
            ("images_dir_name", &storage.images_dir_name),
        ] {
            if !is_plain_file_name(value) {
                return Err(Error::ConfigValidation {
                    message: format!("{field} must be a single file name, got '{value}'"),
                });
            }
        }

        if storage.images_dir_name == storage.document_name
            || storage.images_dir_name == storage.database_name
        {
            return Err(Error::ConfigValidation {
                message: format!(
                    "images_dir_name '{}' collides with a data file name",
                    storage.images_dir_name
                ),
            });
        }

        Ok(())
    }

    /// Get the data directory, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the JSON document path.
    #[must_use]
    pub fn document_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.document_name)
    }

    /// Get the `SQLite` database path.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.database_name)
    }

    /// Get the directory picked images are copied into.
    #[must_use]
    pub fn images_dir(&self) -> PathBuf {
        self.data_dir().join(&self.storage.images_dir_name)
    }

    /// Get the path of the active backend's data file.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        match self.storage.backend {
            Backend::Json => self.document_path(),
            Backend::Sqlite => self.database_path(),
        }
    }
}

/// Check that `name` is one non-empty path component.
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(std::path::Component::Normal(_)), None)
    )
}
