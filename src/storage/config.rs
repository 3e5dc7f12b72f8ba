//! Configuration handling for the todo CLI
//!
//! Two files live next to the global stores in `<HOME>/.todo/`:
//!
//! - `config.toml` holds user settings
//! - `config.json` is the registry of store files the tool has written,
//!   shown by `todo config list`

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::locator::{LocateError, StoreLocator, GLOBAL_DIR};
use crate::view::ViewFormat;

const SETTINGS_FILE: &str = "config.toml";
const REGISTRY_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("failed to encode config: {0}")]
    Encode(String),

    #[error(transparent)]
    Locate(#[from] LocateError),
}

/// User settings from `config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Format used when `todo` runs without a command; unknown names
    /// fall back to json
    #[serde(deserialize_with = "ViewFormat::deserialize_lenient")]
    pub default_format: ViewFormat,

    /// Always print debug diagnostics
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_format: ViewFormat::Table,
            debug: false,
        }
    }
}

impl Settings {
    /// Returns the settings file path for a home directory
    pub fn path_in(home: &Path) -> PathBuf {
        home.join(GLOBAL_DIR).join(SETTINGS_FILE)
    }

    /// Loads settings, falling back to defaults when there is no home or
    /// no file
    pub fn load(locator: &StoreLocator) -> Result<Self, ConfigError> {
        let Some(home) = locator.home() else {
            return Ok(Self::default());
        };

        let path = Self::path_in(home);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path,
            message: e.to_string(),
        })
    }
}

/// Store registry from `config.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Registry {
    pub paths: Vec<String>,
}

impl Registry {
    /// Returns the registry file path for a home directory
    pub fn path_in(home: &Path) -> PathBuf {
        home.join(GLOBAL_DIR).join(REGISTRY_FILE)
    }

    /// Reads the raw registry file, `None` if it does not exist
    pub fn read_raw(path: &Path) -> Result<Option<String>, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parses registry content
    pub fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Records a store path, returning true if it was new
    ///
    /// The registry is rewritten only when the path is not yet listed.
    pub fn register(locator: &StoreLocator, store_path: &Path) -> Result<bool, ConfigError> {
        let Some(home) = locator.home() else {
            return Ok(false);
        };

        let registry_path = Self::path_in(home);
        let mut registry = match Self::read_raw(&registry_path)? {
            Some(content) => Self::parse(&registry_path, &content)?,
            None => Self::default(),
        };

        let absolute = fs::canonicalize(store_path).unwrap_or_else(|_| store_path.to_path_buf());
        let entry = absolute.display().to_string();
        if registry.paths.contains(&entry) {
            return Ok(false);
        }
        registry.paths.push(entry);

        let dir = locator.global_dir()?;
        let content = serde_json::to_string_pretty(&registry)
            .map_err(|e| ConfigError::Encode(e.to_string()))?;
        let target = dir.join(REGISTRY_FILE);
        fs::write(&target, content + "\n").map_err(|source| ConfigError::Io {
            path: target,
            source,
        })?;

        Ok(true)
    }
}
