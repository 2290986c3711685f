//! Configuration file loading
//!
//! Handles loading and writing configuration as TOML.

use crate::config::Config;
use crate::error::ConfigError;

use std::path::{Path, PathBuf};

/// Configuration file handler
pub struct ConfigFile;

impl ConfigFile {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from the first default location that exists
    ///
    /// A file that exists but fails to parse is an error, not a fallback.
    pub fn load_default() -> Result<Option<Config>, ConfigError> {
        for path in Self::default_paths() {
            if path.exists() {
                let config = Self::load(&path)?;
                log::info!("Loaded config from {}", path.display());
                return Ok(Some(config));
            }
        }
        Ok(None)
    }

    /// Write a configuration file, creating parent directories
    pub fn save<P: AsRef<Path>>(config: &Config, path: P, overwrite: bool) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if path.exists() && !overwrite {
            return Err(ConfigError::AlreadyExists(path.display().to_string()));
        }

        let contents = toml::to_string_pretty(config)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| write_failed(parent, e))?;
        }
        std::fs::write(path, contents).map_err(|e| write_failed(path, e))?;

        Ok(())
    }

    /// Get default configuration file paths, in search order
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // System-wide config
        paths.push(PathBuf::from("/etc/volwatch/config.toml"));

        // User config
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("volwatch").join("config.toml"));
        }

        // Current directory
        paths.push(PathBuf::from("volwatch.toml"));

        paths
    }

    /// Path `init` writes to when none is given
    pub fn user_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("volwatch").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("volwatch.toml"))
    }
}

fn write_failed(path: &Path, err: std::io::Error) -> ConfigError {
    ConfigError::WriteFailed {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}
