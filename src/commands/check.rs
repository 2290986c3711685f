//! Check command implementation
//!
//! Runs the startup health check without entering the polling loop.

use crate::cli::args::OutputFormat;
use crate::cli::output::print_output;
use crate::commands::setup::{self, Adapters};
use crate::error::{AppError, Result};
use crate::health::HealthCheck;
use crate::runtime::ThreadSleeper;

use std::sync::Arc;

/// Execute the check command
pub fn run_check(format: OutputFormat, config_path: Option<&str>, dry_run: bool) -> Result<()> {
    let config = setup::load_config(config_path, dry_run, None)?;
    let adapters = Adapters::new(&config, Arc::new(ThreadSleeper))?;

    let report = HealthCheck::run(&adapters.notifier, &adapters.source);
    print_output(&report, format)?;

    if report.is_healthy() {
        Ok(())
    } else {
        let reason = report
            .first_failure()
            .map(|c| c.name.clone())
            .unwrap_or_default();
        Err(AppError::HealthCheckFailed(reason))
    }
}
