//! Shared wiring for command handlers
//!
//! Builds the configuration, HTTP client, metric source and notifier.

use crate::config::{Config, ConfigBuilder};
use crate::error::Result;
use crate::net::{HttpClient, ResilientFetcher};
use crate::notify::{ConsoleNotifier, MessageFormatter, Notifier, TelegramNotifier};
use crate::runtime::Sleeper;
use crate::source::MarketSource;

use std::sync::Arc;

/// Load, override and validate the configuration
pub fn load_config(path: Option<&str>, dry_run: bool, interval: Option<u64>) -> Result<Config> {
    let config = ConfigBuilder::new()
        .with_file(path)?
        .with_env()
        .with_dry_run(dry_run.then_some(true))
        .with_interval(interval)
        .build()?;
    Ok(config)
}

/// Network adapters built from one configuration
pub struct Adapters {
    pub source: MarketSource,
    pub notifier: Box<dyn Notifier>,
}

impl Adapters {
    pub fn new(config: &Config, sleeper: Arc<dyn Sleeper>) -> Result<Self> {
        let fetcher = ResilientFetcher::new(config.retry_policy(), sleeper);
        let http = HttpClient::new(config.request_timeout(), fetcher)?;

        let notifier: Box<dyn Notifier> = if config.telegram.dry_run {
            log::info!("Dry-run mode: messages are printed, not sent");
            Box::new(ConsoleNotifier::new())
        } else {
            Box::new(TelegramNotifier::new(
                http.clone(),
                config.telegram.api_base.clone(),
                config.telegram.bot_token.clone(),
                config.telegram.chat_id.clone(),
            ))
        };

        let source = MarketSource::new(http, config.source.clone());

        Ok(Self { source, notifier })
    }
}

/// Message formatter for the configured asset and rules
pub fn formatter(config: &Config) -> Result<MessageFormatter> {
    let rules = config.to_alert_rules()?;
    Ok(MessageFormatter::new(
        config.source.currency.clone(),
        config.source.vs_currency.clone(),
        config.source.chart_url.clone(),
        rules,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingSleeper;

    #[test]
    fn test_adapters_dry_run_uses_console() {
        let mut config = Config::default();
        config.telegram.dry_run = true;

        let adapters = Adapters::new(&config, Arc::new(RecordingSleeper::default())).unwrap();
        assert_eq!(adapters.notifier.name(), "console");
    }

    #[test]
    fn test_adapters_uses_telegram() {
        let mut config = Config::default();
        config.telegram.bot_token = "1:a".to_string();
        config.telegram.chat_id = "2".to_string();

        let adapters = Adapters::new(&config, Arc::new(RecordingSleeper::default())).unwrap();
        assert_eq!(adapters.notifier.name(), "telegram");
    }

    #[test]
    fn test_load_config_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("volwatch.toml");
        std::fs::write(&path, "[schedule]\npoll_interval_seconds = 900\n").unwrap();

        let config = load_config(path.to_str(), true, None).unwrap();
        assert!(config.telegram.dry_run);
        assert_eq!(config.schedule.poll_interval_seconds, 900);

        let config = load_config(path.to_str(), true, Some(120)).unwrap();
        assert_eq!(config.schedule.poll_interval_seconds, 120);
    }

    #[test]
    fn test_formatter_uses_asset() {
        let f = formatter(&Config::default()).unwrap();
        let msg = f.render(
            &crate::alerts::Notification::Startup,
            None,
            chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        );
        assert!(msg.plain_text().contains("ETH volatility monitor started"));
    }
}
