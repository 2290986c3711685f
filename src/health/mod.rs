//! Startup health check
//!
//! Verifies, in order and stopping at the first failure:
//! - the notifier's credentials are accepted by the transport
//! - the metric source returns a volatility reading
//! - the metric source returns a spot price
//!
//! The monitor must not start polling unless the report is healthy.

use crate::notify::Notifier;
use crate::source::MetricSource;
use serde::Serialize;
use std::fmt;

/// Outcome of a single check step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

/// One executed step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub detail: String,
}

impl CheckResult {
    fn pass(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Pass,
            detail: detail.into(),
        }
    }

    fn fail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Fail,
            detail: detail.into(),
        }
    }
}

/// Steps executed by a health check run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HealthReport {
    pub checks: Vec<CheckResult>,
}

impl HealthReport {
    /// True when at least one step ran and every step passed
    pub fn is_healthy(&self) -> bool {
        !self.checks.is_empty() && self.checks.iter().all(|c| c.status == CheckStatus::Pass)
    }

    /// First failing step, if any
    pub fn first_failure(&self) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.status == CheckStatus::Fail)
    }

    fn record(&mut self, result: CheckResult) -> bool {
        let passed = result.status == CheckStatus::Pass;
        match result.status {
            CheckStatus::Pass => log::info!("Health check {}: {}", result.name, result.detail),
            CheckStatus::Fail => log::error!("Health check {}: {}", result.name, result.detail),
        }
        self.checks.push(result);
        passed
    }
}

impl fmt::Display for HealthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for check in &self.checks {
            writeln!(f, "[{}] {}: {}", check.status, check.name, check.detail)?;
        }
        if self.is_healthy() {
            write!(f, "Health check passed")
        } else {
            write!(f, "Health check FAILED")
        }
    }
}

/// Runs the startup checks
pub struct HealthCheck;

impl HealthCheck {
    /// Run all steps, stopping at the first failure
    pub fn run<N, S>(notifier: &N, source: &S) -> HealthReport
    where
        N: Notifier + ?Sized,
        S: MetricSource + ?Sized,
    {
        log::info!("Running startup health check");
        let mut report = HealthReport::default();

        let step = format!("notifier ({})", notifier.name());
        let result = match notifier.verify() {
            Ok(()) => CheckResult::pass(step, "credentials accepted"),
            Err(e) => CheckResult::fail(step, e.to_string()),
        };
        if !report.record(result) {
            return report;
        }

        let result = match source.volatility() {
            Ok(sample) => CheckResult::pass("volatility", format!("latest {}", sample)),
            Err(e) => CheckResult::fail("volatility", e.to_string()),
        };
        if !report.record(result) {
            return report;
        }

        let result = match source.spot_price() {
            Ok(price) => CheckResult::pass("spot_price", format!("latest {:.2}", price)),
            Err(e) => CheckResult::fail("spot_price", e.to_string()),
        };
        report.record(result);

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::mock::{MockNotifier, MockSource};

    #[test]
    fn test_all_checks_pass() {
        let notifier = MockNotifier::new();
        let source = MockSource::new().with_volatility(vec![Ok(55.0)]);

        let report = HealthCheck::run(&notifier, &source);
        assert!(report.is_healthy());
        assert_eq!(report.checks.len(), 3);
        assert!(report.first_failure().is_none());
        assert_eq!(notifier.verify_calls(), 1);
    }

    #[test]
    fn test_bad_credentials_short_circuit() {
        let notifier = MockNotifier::new().rejecting_credentials();
        let source = MockSource::new().with_volatility(vec![Ok(55.0)]);

        let report = HealthCheck::run(&notifier, &source);
        assert!(!report.is_healthy());
        assert_eq!(report.checks.len(), 1);
        assert_eq!(source.volatility_calls(), 0);
        assert_eq!(source.price_calls(), 0);
    }

    #[test]
    fn test_source_unreachable() {
        let notifier = MockNotifier::new();
        let source = MockSource::new()
            .with_volatility(vec![Err(FetchError::Transport("connection refused".into()))]);

        let report = HealthCheck::run(&notifier, &source);
        assert!(!report.is_healthy());
        assert_eq!(report.first_failure().unwrap().name, "volatility");
        assert_eq!(source.price_calls(), 0);
    }

    #[test]
    fn test_price_unavailable() {
        let notifier = MockNotifier::new();
        let source = MockSource::new()
            .with_volatility(vec![Ok(55.0)])
            .with_price(None);

        let report = HealthCheck::run(&notifier, &source);
        assert!(!report.is_healthy());
        assert_eq!(report.first_failure().unwrap().name, "spot_price");
    }

    #[test]
    fn test_empty_report_is_unhealthy() {
        assert!(!HealthReport::default().is_healthy());
    }

    #[test]
    fn test_report_display() {
        let notifier = MockNotifier::new();
        let source = MockSource::new().with_volatility(vec![Ok(55.0)]);
        let text = HealthCheck::run(&notifier, &source).to_string();
        assert!(text.contains("[PASS] notifier (mock)"));
        assert!(text.ends_with("Health check passed"));
    }
}
