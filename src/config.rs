// Configuration loading

use crate::filter::Filter;
use crate::store::DEFAULT_SLOT_KEY;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings for where tasks live and how the list opens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the storage files
    pub store_path: PathBuf,
    /// Storage key of the task blob
    pub slot_key: String,
    /// Filter selected when the list is shown
    pub default_filter: Filter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            slot_key: DEFAULT_SLOT_KEY.to_string(),
            default_filter: Filter::All,
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `path` is `None`
    ///
    /// A missing file yields defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            debug!(path = ?path, "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config =
            serde_yaml::from_str(&content).with_context(|| format!("Failed to parse config {}", path.display()))?;

        debug!(path = ?path, ?config, "Loaded config");
        Ok(config)
    }
}

/// `<config_dir>/todostore/config.yml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("todostore").join("config.yml"))
}

/// `<data_dir>/todostore`, falling back to `.todostore` in the current directory
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("todostore"))
        .unwrap_or_else(|| PathBuf::from(".todostore"))
}
