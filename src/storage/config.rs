//! Configuration handling
//!
//! Configuration is read from `config.toml` in the user's config directory
//! (e.g. `~/.config/grid-square-checker/config.toml`), or from a file given
//! with `--config`. Every field is optional.
//!
//! ```toml
//! geometry_layer_key = "7248e0d0-ca96-11ea-a292-02e7594ce0a0"
//! color = true
//! default_format = "text"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tile data key of the grid square geometry node in the database export
pub const DEFAULT_GEOMETRY_LAYER_KEY: &str = "7248e0d0-ca96-11ea-a292-02e7594ce0a0";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for reports
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Checker configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Tile data key holding grid square geometry in the export
    pub geometry_layer_key: String,

    /// Colour text output
    pub color: bool,

    /// Output format when `--format` is not given
    pub default_format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geometry_layer_key: DEFAULT_GEOMETRY_LAYER_KEY.to_string(),
            color: true,
            default_format: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Loads configuration from `explicit`, or the global config file if there is one
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::global_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        Self::from_file(&path)
    }

    /// Returns the global config file location
    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "eamena", "grid-square-checker")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to load config: {}", path.display()))
    }

    /// Parses and validates configuration text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Replaces the layer key if an override is given
    pub fn with_layer_key(mut self, layer_key: Option<String>) -> Result<Self, ConfigError> {
        if let Some(key) = layer_key {
            self.geometry_layer_key = key;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.geometry_layer_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "geometry_layer_key must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
