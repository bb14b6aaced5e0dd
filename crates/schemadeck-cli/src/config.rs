//! Configuration management for the CLI
//!
//! This module handles loading and merging configuration from:
//! - Default values
//! - Configuration files (TOML/YAML/JSON)
//! - Environment variables
//! - Command-line arguments

use crate::error::{Error, Result};
use schemadeck_core::ValidationConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Base name of configuration files
pub const CONFIG_FILE_STEM: &str = ".schemadeck";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingSettings,

    /// Defaults for `validate`
    pub validation: ValidationConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (human, json, json-pretty, yaml)
    pub format: String,

    /// Use colored output by default
    pub color: bool,

    /// Show progress bars for payload batches
    pub progress: bool,
}

/// Logging settings read from the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level used when no `-v` flag is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Log format (compact, full, json)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Log file path; file output is always JSON
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Per-module level overrides
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub modules: HashMap<String, String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
            progress: true,
        }
    }
}

/// Serialization format of a config file, picked by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Toml,
    Yaml,
    Json,
}

impl FileFormat {
    fn of(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(Error::InvalidFormat {
                path: path.to_path_buf(),
                expected: "a .toml, .yaml or .json file".to_string(),
            }),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = match FileFormat::of(path)? {
            FileFormat::Toml => toml::from_str(&content)?,
            FileFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| {
                Error::config(format!("{}: {}", path.display(), e))
            })?,
            FileFormat::Json => serde_json::from_str(&content).map_err(|e| {
                Error::config(format!("{}: {}", path.display(), e))
            })?,
        };

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        // Return default config if no config file found
        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Serialize to the format matching `path`'s extension
    pub fn render(&self, path: &Path) -> Result<String> {
        Ok(match FileFormat::of(path)? {
            FileFormat::Toml => toml::to_string_pretty(self)?,
            FileFormat::Yaml => serde_yaml::to_string(self)?,
            FileFormat::Json => serde_json::to_string_pretty(self)?,
        })
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.render(path)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Configuration file paths checked by [`Config::load`], in order
pub fn default_config_paths() -> Vec<PathBuf> {
    let extensions = ["toml", "yaml", "json"];
    let mut paths = Vec::new();

    // Current directory
    for ext in extensions {
        paths.push(PathBuf::from(format!("{}.{}", CONFIG_FILE_STEM, ext)));
    }

    // User config directory
    if let Some(config_dir) = dirs::config_dir() {
        let app_dir = config_dir.join("schemadeck");
        for ext in extensions {
            paths.push(app_dir.join(format!("config.{}", ext)));
        }
    }

    // Home directory
    if let Some(home_dir) = dirs::home_dir() {
        for ext in extensions {
            paths.push(home_dir.join(format!("{}.{}", CONFIG_FILE_STEM, ext)));
        }
    }

    paths
}

/// Location `config init --user` writes to
pub fn user_config_path(extension: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("schemadeck").join(format!("config.{}", extension)))
}
