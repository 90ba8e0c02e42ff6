//! Configuration management for coinshelf.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "coinshelf";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "collections.db";

/// Output formats the display section accepts.
const KNOWN_FORMATS: &[&str] = &["table", "plain", "json"];

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `COINSHELF_`)
/// 2. TOML config file at `~/.config/coinshelf/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Display configuration.
    pub display: DisplayConfig,
    /// Catalog upgrade configuration.
    pub upgrade: UpgradeConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/coinshelf/collections.db`
    pub database_path: Option<PathBuf>,
}

/// Display-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Default output format: `table`, `plain`, or `json`.
    pub format: String,
    /// Marker shown for collected slots.
    pub collected_marker: String,
    /// Marker shown for missing slots.
    pub missing_marker: String,
}

/// Catalog upgrade configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeConfig {
    /// Run the catalog upgrade automatically on startup.
    pub auto: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            format: "table".to_string(),
            collected_marker: "x".to_string(),
            missing_marker: ".".to_string(),
        }
    }
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self { auto: true }
    }
}

impl Config {
    /// Load configuration, optionally from a custom config path.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `COINSHELF_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("COINSHELF_").split("_"));

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
        if !KNOWN_FORMATS.contains(&self.display.format.as_str()) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "unknown display format '{}', expected one of: {}",
                    self.display.format,
                    KNOWN_FORMATS.join(", ")
                ),
            });
        }

        if self.display.collected_marker.is_empty() {
            return Err(Error::ConfigValidation {
                message: "collected_marker must not be empty".to_string(),
            });
        }

        if self.display.missing_marker.is_empty() {
            return Err(Error::ConfigValidation {
                message: "missing_marker must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}
