//! Configuration management for the workbench.
//!
//! This module provides configuration loading, validation, and access through a singleton pattern.
//! Configuration is read from a settings document under the "rest-workbench" key and merged with
//! defaults.

pub mod schema;

pub use schema::WorkbenchConfig;

use once_cell::sync::Lazy;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

/// Key of the workbench section in a settings document.
pub const SETTINGS_KEY: &str = "rest-workbench";

/// Global configuration instance.
///
/// This is lazily initialized on first access and can be updated when settings change.
static CONFIG: Lazy<RwLock<WorkbenchConfig>> =
    Lazy::new(|| RwLock::new(WorkbenchConfig::default()));

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads configuration from a settings document.
///
/// This function reads the "rest-workbench" settings, merges them with defaults,
/// validates the result, and updates the global configuration.
///
/// # Example
///
/// ```no_run
/// use rest_workbench::config::load_config;
/// use serde_json::json;
///
/// let settings = json!({
///     "rest-workbench": {
///         "timeout": 60000,
///         "validateSsl": false
///     }
/// });
///
/// let config = load_config(Some(settings)).unwrap();
/// assert_eq!(config.timeout, 60000);
/// ```
pub fn load_config(settings_json: Option<Value>) -> Result<WorkbenchConfig, ConfigError> {
    let mut config = WorkbenchConfig::default();

    if let Some(section) = settings_json.as_ref().and_then(|s| s.get(SETTINGS_KEY)) {
        // Every field is defaulted, so a partial section still deserializes
        match serde_json::from_value::<WorkbenchConfig>(section.clone()) {
            Ok(user_config) => config = user_config,
            Err(e) => {
                log::warn!(
                    "Failed to parse {} settings: {}. Using defaults.",
                    SETTINGS_KEY,
                    e
                );
            }
        }
    }

    config.validate().map_err(ConfigError::Invalid)?;

    if let Ok(mut global_config) = CONFIG.write() {
        *global_config = config.clone();
    }

    Ok(config)
}

/// Loads configuration from a JSON settings file on disk.
pub fn load_config_file(path: impl AsRef<Path>) -> Result<WorkbenchConfig, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: Value = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("Loaded settings from {}", path.display());
    load_config(Some(settings))
}

/// Gets the current global configuration.
///
/// Returns the default configuration if none has been loaded yet.
pub fn get_config() -> WorkbenchConfig {
    CONFIG
        .read()
        .map(|c| c.clone())
        .unwrap_or_else(|_| WorkbenchConfig::default())
}

/// Updates the global configuration in place.
///
/// If the result fails validation the configuration reverts to defaults.
///
/// # Example
///
/// ```no_run
/// use rest_workbench::config::update_config;
///
/// update_config(|config| {
///     config.timeout = 60000;
/// });
/// ```
pub fn update_config<F>(updater: F)
where
    F: FnOnce(&mut WorkbenchConfig),
{
    if let Ok(mut config) = CONFIG.write() {
        updater(&mut config);

        if let Err(e) = config.validate() {
            log::warn!("Configuration validation failed after update: {}", e);
            *config = WorkbenchConfig::default();
        }
    }
}

/// Resets the configuration to defaults.
pub fn reset_config() {
    if let Ok(mut config) = CONFIG.write() {
        *config = WorkbenchConfig::default();
    }
}
