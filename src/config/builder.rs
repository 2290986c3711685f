//! Configuration builder
//!
//! Merges configuration from files, the environment and CLI arguments.

use crate::config::{Config, ConfigFile};
use crate::error::ConfigError;

/// Environment variable overriding `telegram.bot_token`
pub const ENV_BOT_TOKEN: &str = "VOLWATCH_TELEGRAM_BOT_TOKEN";
/// Environment variable overriding `telegram.chat_id`
pub const ENV_CHAT_ID: &str = "VOLWATCH_TELEGRAM_CHAT_ID";

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Start from an already loaded configuration
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Load configuration from a file, or from the default locations
    pub fn with_file(mut self, path: Option<&str>) -> Result<Self, ConfigError> {
        let file_config = match path {
            Some(path) => Some(ConfigFile::load(path)?),
            None => ConfigFile::load_default()?,
        };

        match file_config {
            Some(cfg) => self.config = cfg,
            None => log::info!("No configuration file found, using defaults"),
        }

        Ok(self)
    }

    /// Override credentials from the process environment
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Override credentials from an arbitrary variable lookup
    pub fn with_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ENV_BOT_TOKEN).filter(|v| !v.is_empty()) {
            self.config.telegram.bot_token = token;
        }
        if let Some(chat_id) = lookup(ENV_CHAT_ID).filter(|v| !v.is_empty()) {
            self.config.telegram.chat_id = chat_id;
        }
        self
    }

    /// Override with CLI dry-run flag
    pub fn with_dry_run(mut self, dry_run: Option<bool>) -> Self {
        if let Some(d) = dry_run {
            self.config.telegram.dry_run = d;
        }
        self
    }

    /// Override with CLI poll interval
    pub fn with_interval(mut self, interval: Option<u64>) -> Self {
        if let Some(i) = interval {
            self.config.schedule.poll_interval_seconds = i;
        }
        self
    }

    /// Validate and build the final configuration
    pub fn build(self) -> Result<Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
