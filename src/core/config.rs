// src/core/config.rs

//! User configuration and the memoized config directory.

use crate::{
    constants::{
        CONFIG_DIR_NAME, CONFIG_FILENAME, CONFIG_PATH_ENV, DEVFILE_NAME, STAGING_DIR_NAME,
        WINDOWS_TEMP_FROM_SUBSYSTEM,
    },
    core::dispatcher::DispatcherSettings,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

static CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Failures while locating, reading or interpreting the user configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The platform reports no config directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// The config file exists but could not be read.
    #[error("Could not read config file '{path}': {source}")]
    Read {
        /// Path of the config file.
        path: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid TOML for [`UserConfig`].
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        /// Path of the config file.
        path: String,
        /// The underlying error.
        #[source]
        source: toml::de::Error,
    },
    /// A configured path references an undefined variable.
    #[error("Failed to expand path '{value}': {message}")]
    Expand {
        /// The configured value.
        value: String,
        /// Why expansion failed.
        message: String,
    },
}

/// User configuration, read from `<config dir>/devfile/config.toml`.
/// Every field is optional in the file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct UserConfig {
    /// Subdirectory of the temp root where scripts are staged.
    pub staging_dir: String,
    /// The Windows temp folder as seen from WSL. `~` and environment variables are expanded.
    pub windows_temp: String,
    /// File name looked up when searching for a devfile.
    pub devfile_name: String,
    /// Exit with the script's exit code when it fails, instead of only warning.
    pub propagate_exit_status: bool,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            staging_dir: STAGING_DIR_NAME.to_string(),
            windows_temp: WINDOWS_TEMP_FROM_SUBSYSTEM.to_string(),
            devfile_name: DEVFILE_NAME.to_string(),
            propagate_exit_status: false,
        }
    }
}

impl UserConfig {
    /// The staging settings handed to the dispatcher.
    pub fn dispatcher_settings(&self) -> Result<DispatcherSettings, ConfigError> {
        let windows_temp =
            shellexpand::full(&self.windows_temp).map_err(|e| ConfigError::Expand {
                value: self.windows_temp.clone(),
                message: e.to_string(),
            })?;
        Ok(DispatcherSettings {
            staging_dir: self.staging_dir.clone(),
            windows_temp: PathBuf::from(windows_temp.into_owned()),
        })
    }
}

/// Returns the path to the devfile configuration directory (`~/.config/devfile`).
///
/// This function is memoized: the first call computes and caches the path,
/// subsequent calls return the cached value.
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    CONFIG_DIR
        .get_or_init(|| dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME)))
        .clone()
        .ok_or(ConfigError::ConfigDirNotFound)
}

/// The config file in use: `$DEVFILE_CONFIG` when set, the default location otherwise.
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => get_config_dir().map(|dir| dir.join(CONFIG_FILENAME)),
    }
}

/// Loads the user configuration. A missing file yields the defaults.
pub fn load_config() -> Result<UserConfig, ConfigError> {
    load_config_from(&get_config_path()?)
}

/// Loads the configuration at `path`. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<UserConfig, ConfigError> {
    if !path.exists() {
        log::debug!("No config at '{}', using defaults", path.display());
        return Ok(UserConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}
