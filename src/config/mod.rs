//! Configuration system
//!
//! Handles TOML config file parsing, environment and CLI overrides, and
//! validation into domain types.

pub mod builder;
pub mod file;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;

use crate::alerts::{AlertRules, BoundaryMode, StateUpdate, Thresholds};
use crate::domain::BriefingHour;
use crate::error::{ConfigError, DomainError};
use crate::net::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Messaging transport settings
    pub telegram: TelegramConfig,
    /// Alert thresholds and state handling
    pub alerts: AlertsConfig,
    /// Briefing hour and poll interval
    pub schedule: ScheduleConfig,
    /// Retry and timeout settings
    pub retry: RetryConfig,
    /// Upstream data providers
    pub source: SourceConfig,
}

impl Config {
    /// Validate the whole configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.to_alert_rules()?;

        if !self.telegram.dry_run {
            if self.telegram.bot_token.trim().is_empty() {
                return Err(ConfigError::MissingField("telegram.bot_token".to_string()));
            }
            if self.telegram.chat_id.trim().is_empty() {
                return Err(ConfigError::MissingField("telegram.chat_id".to_string()));
            }
        }

        if self.schedule.poll_interval_seconds == 0 {
            return Err(invalid(
                "schedule.poll_interval_seconds",
                "must be greater than zero",
            ));
        }
        if self.retry.request_timeout_seconds == 0 {
            return Err(invalid(
                "retry.request_timeout_seconds",
                "must be greater than zero",
            ));
        }

        let urls = [
            ("telegram.api_base", &self.telegram.api_base),
            ("source.volatility_url", &self.source.volatility_url),
            ("source.price_url", &self.source.price_url),
            ("source.chart_url", &self.source.chart_url),
        ];
        for (key, url) in urls {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(invalid(key, "must be an http(s) URL"));
            }
        }

        let names = [
            ("source.currency", &self.source.currency),
            ("source.coin_id", &self.source.coin_id),
            ("source.vs_currency", &self.source.vs_currency),
            ("source.resolution", &self.source.resolution),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField(key.to_string()));
            }
        }

        Ok(())
    }

    /// Convert thresholds and schedule to the alert rules
    pub fn to_alert_rules(&self) -> Result<AlertRules, DomainError> {
        let thresholds = Thresholds::new(
            self.alerts.low_threshold,
            self.alerts.high_threshold,
            self.alerts.boundary,
        )?;
        let briefing_hour = BriefingHour::new(self.schedule.briefing_hour)?;
        Ok(AlertRules::new(thresholds, briefing_hour))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.count,
            Duration::from_secs(self.retry.delay_seconds),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.retry.request_timeout_seconds)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.schedule.poll_interval_seconds)
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

/// Telegram transport configuration
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot API token
    pub bot_token: String,
    /// Destination chat id
    pub chat_id: String,
    /// Bot API base URL
    pub api_base: String,
    /// Print messages instead of sending them
    pub dry_run: bool,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            api_base: "https://api.telegram.org".to_string(),
            dry_run: false,
        }
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.bot_token.is_empty() {
            "<unset>"
        } else {
            "<redacted>"
        };
        f.debug_struct("TelegramConfig")
            .field("bot_token", &token)
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

/// Alert configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    /// DVOL at which the high alert fires
    pub high_threshold: f64,
    /// DVOL at which the low alert fires
    pub low_threshold: f64,
    /// Whether the thresholds themselves belong to the alert bands
    pub boundary: BoundaryMode,
    /// Whether a failed send rolls the state change back
    pub state_update: StateUpdate,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            high_threshold: 80.0,
            low_threshold: 40.0,
            boundary: BoundaryMode::Inclusive,
            state_update: StateUpdate::OnDecision,
        }
    }
}

/// Schedule configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Local hour (0-23) of the daily briefing
    pub briefing_hour: u32,
    /// Seconds between poll cycles
    pub poll_interval_seconds: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            briefing_hour: 8,
            poll_interval_seconds: 1800,
        }
    }
}

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub count: u32,
    /// Seconds between attempts
    pub delay_seconds: u64,
    /// Per-request timeout in seconds
    pub request_timeout_seconds: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            count: 3,
            delay_seconds: 60,
            request_timeout_seconds: 10,
        }
    }
}

/// Upstream provider configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Volatility index currency (Deribit)
    pub currency: String,
    /// Asset id (CoinGecko)
    pub coin_id: String,
    /// Quote currency for the spot price
    pub vs_currency: String,
    /// Volatility index resolution in seconds
    pub resolution: String,
    /// Length of the volatility window requested each cycle
    pub lookback_minutes: u32,
    pub volatility_url: String,
    pub price_url: String,
    /// Reference chart linked from messages
    pub chart_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            currency: "ETH".to_string(),
            coin_id: "ethereum".to_string(),
            vs_currency: "usd".to_string(),
            resolution: "60".to_string(),
            lookback_minutes: 60,
            volatility_url: "https://www.deribit.com/api/v2/public/get_volatility_index_data"
                .to_string(),
            price_url: "https://api.coingecko.com/api/v3/simple/price".to_string(),
            chart_url: "https://www.deribit.com/charts/ETH-DVOL".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        let mut config = Config::default();
        config.telegram.bot_token = "123:abc".to_string();
        config.telegram.chat_id = "42".to_string();
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.alerts.high_threshold, 80.0);
        assert_eq!(config.alerts.low_threshold, 40.0);
        assert_eq!(config.schedule.briefing_hour, 8);
        assert_eq!(config.poll_interval(), Duration::from_secs(1800));
        assert_eq!(config.retry_policy(), RetryPolicy::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_validate_requires_credentials() {
        let config = Config::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField(ref f)) if f == "telegram.bot_token"
        ));

        let mut dry = Config::default();
        dry.telegram.dry_run = true;
        assert!(dry.validate().is_ok());

        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let mut config = valid();
        config.alerts.low_threshold = 90.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "alerts"
        ));
    }

    #[test]
    fn test_validate_rejects_bad_hour_and_interval() {
        let mut config = valid();
        config.schedule.briefing_hour = 24;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.schedule.poll_interval_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let mut config = valid();
        config.source.price_url = "ftp://example.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "source.price_url"
        ));
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_str = r#"
            [telegram]
            bot_token = "123:abc"
            chat_id = "42"

            [alerts]
            high_threshold = 90.0
            boundary = "exclusive"
            state_update = "on_delivery"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.alerts.high_threshold, 90.0);
        assert_eq!(config.alerts.low_threshold, 40.0);
        assert_eq!(config.alerts.boundary, BoundaryMode::Exclusive);
        assert_eq!(config.alerts.state_update, StateUpdate::OnDelivery);
        assert_eq!(config.schedule.poll_interval_seconds, 1800);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_to_alert_rules() {
        let rules = valid().to_alert_rules().unwrap();
        assert_eq!(rules.thresholds.high(), 80.0);
        assert_eq!(rules.briefing_hour.hour(), 8);
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug = format!("{:?}", valid().telegram);
        assert!(!debug.contains("123:abc"));
        assert!(debug.contains("<redacted>"));
    }
}
