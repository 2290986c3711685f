//! Run command implementation
//!
//! Starts the monitor: health check, startup notification, then the polling loop.

use crate::alerts::AlertManager;
use crate::cli::args::RunArgs;
use crate::commands::setup::{self, Adapters};
use crate::error::Result;
use crate::runtime::{SystemClock, ThreadSleeper};
use crate::services::{Monitor, MonitorConfig, NotificationService};

use std::sync::Arc;

/// Execute the run command
pub fn run_monitor(args: &RunArgs, config_path: Option<&str>, dry_run: bool) -> Result<()> {
    let config = setup::load_config(config_path, dry_run, args.interval)?;
    let rules = config.to_alert_rules()?;

    let sleeper = Arc::new(ThreadSleeper);
    let adapters = Adapters::new(&config, sleeper.clone())?;
    let notifications = NotificationService::new(adapters.notifier, setup::formatter(&config)?);

    let monitor_config = MonitorConfig {
        interval: config.poll_interval(),
        max_cycles: args.once.then_some(1),
        state_update: config.alerts.state_update,
    };

    log::info!("Starting volatility monitor");
    log::info!("  Asset: {}", config.source.currency);
    log::info!("  Thresholds: {}", rules.thresholds);
    log::info!("  Briefing hour: {}", rules.briefing_hour);
    log::info!("  Interval: {:?}", monitor_config.interval);
    log::info!("  State update: {}", monitor_config.state_update);

    let mut monitor = Monitor::new(
        monitor_config,
        AlertManager::new(rules),
        adapters.source,
        notifications,
        Arc::new(SystemClock),
        sleeper,
    );

    monitor.run()
}
