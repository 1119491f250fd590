//! Tool configuration
//!
//! An optional TOML file overrides the converter location and the export
//! naming fields; everything falls back to built-in defaults when no config
//! file exists.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::naming::NamingScheme;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub converter: ConverterConfig,
    pub naming: NamingScheme,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Name of the converter executable, resolved via `search_dir` and `PATH`
    pub executable: String,
    /// Installation directory searched before `PATH`
    pub search_dir: PathBuf,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        ConverterConfig {
            executable: "Wordconv".to_string(),
            search_dir: default_search_dir(),
        }
    }
}

/// The version-specific Office installation subdirectory that holds the
/// converter on a default desktop install.
fn default_search_dir() -> PathBuf {
    let program_files =
        std::env::var_os("ProgramFiles").unwrap_or_else(|| r"C:\Program Files".into());
    PathBuf::from(program_files)
        .join("Microsoft Office")
        .join("root")
        .join("Office16")
}

impl Config {
    /// Load the configuration from the config directory
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                let content = fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&content)?;
                return Ok(config);
            }
        }

        // Return defaults if no config found
        Ok(Config::default())
    }

    /// Get the path to the config file
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docpix").join("config.toml"))
    }
}
