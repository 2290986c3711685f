//! Polling loop monitor
//!
//! Orchestrates the startup health check and the periodic poll cycles,
//! driving the alert manager and delivering its notifications.

use crate::alerts::{AlertManager, MonitorState, Notification, StateUpdate};
use crate::domain::Sample;
use crate::error::AppError;
use crate::health::{HealthCheck, HealthReport};
use crate::notify::Notifier;
use crate::runtime::{Clock, Sleeper};
use crate::services::notification_service::{Delivery, NotificationService};
use crate::source::MetricSource;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the monitor
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Interval between poll cycles
    pub interval: Duration,
    /// Stop after this many cycles (`None` runs until killed)
    pub max_cycles: Option<u64>,
    /// Whether failed sends roll back the state change
    pub state_update: StateUpdate,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1800),
            max_cycles: None,
            state_update: StateUpdate::OnDecision,
        }
    }
}

/// Lifecycle phase of the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Health check not yet passed
    Starting,
    /// Last volatility fetch succeeded
    Polling,
    /// Last volatility fetch failed
    Offline,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Starting => write!(f, "starting"),
            Self::Polling => write!(f, "polling"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

/// What happened during one poll cycle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    /// Sample fetched this cycle, if the fetch succeeded
    pub sample: Option<Sample>,
    pub sent: Vec<Notification>,
    pub failed: Vec<Notification>,
    pub skipped: Vec<Notification>,
}

/// Polling loop monitor
pub struct Monitor<S, N> {
    config: MonitorConfig,
    manager: AlertManager,
    source: S,
    notifications: NotificationService<N>,
    state: MonitorState,
    started: bool,
    cycles: u64,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn Sleeper>,
}

impl<S: MetricSource, N: Notifier> Monitor<S, N> {
    /// Create a new monitor with the initial state `(Normal, no briefing, online)`
    pub fn new(
        config: MonitorConfig,
        manager: AlertManager,
        source: S,
        notifications: NotificationService<N>,
        clock: Arc<dyn Clock>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            config,
            manager,
            source,
            notifications,
            state: MonitorState::default(),
            started: false,
            cycles: 0,
            clock,
            sleeper,
        }
    }

    /// Run the health check and announce startup
    ///
    /// A failing check is fatal: the monitor stays in [`Phase::Starting`].
    pub fn start(&mut self) -> Result<HealthReport, AppError> {
        let report = HealthCheck::run(self.notifications.notifier(), &self.source);
        if !report.is_healthy() {
            let reason = report
                .first_failure()
                .map(|c| format!("{}: {}", c.name, c.detail))
                .unwrap_or_else(|| "no checks ran".to_string());
            return Err(AppError::HealthCheckFailed(reason));
        }

        let rules = self.manager.rules();
        log::info!(
            "Monitor started: thresholds {}, briefing at {}, interval {:?}",
            rules.thresholds,
            rules.briefing_hour,
            self.config.interval
        );

        let now = self.clock.now();
        if self.notifications.deliver(&Notification::Startup, &self.source, now) != Delivery::Sent {
            log::warn!("Startup notification was not delivered");
        }

        self.started = true;
        Ok(report)
    }

    /// Execute a single poll cycle
    pub fn tick(&mut self) -> CycleReport {
        let now = self.clock.now();

        let sample = match self.source.volatility() {
            Ok(sample) => {
                log::info!("DVOL {}", sample);
                Some(sample)
            }
            Err(e) if !self.state.offline => {
                log::warn!("Volatility fetch failed, entering offline state: {}", e);
                None
            }
            Err(e) => {
                log::debug!("Still offline: {}", e);
                None
            }
        };

        let previous = self.state;
        let evaluation = self.manager.evaluate(&previous, sample.as_ref(), now);
        let mut state = evaluation.state;
        let mut report = CycleReport {
            sample,
            ..Default::default()
        };

        for notification in evaluation.notifications {
            match self.notifications.deliver(&notification, &self.source, now) {
                Delivery::Sent => report.sent.push(notification),
                Delivery::Skipped => {
                    state.rollback(&notification, &previous);
                    report.skipped.push(notification);
                }
                Delivery::Failed => {
                    if self.config.state_update == StateUpdate::OnDelivery {
                        state.rollback(&notification, &previous);
                    }
                    report.failed.push(notification);
                }
            }
        }

        if state.alert_status != previous.alert_status {
            log::info!(
                "Alert status {} -> {}",
                previous.alert_status,
                state.alert_status
            );
        }

        self.state = state;
        self.cycles += 1;
        report
    }

    /// Run the startup check (if not done yet) and the polling loop
    ///
    /// Returns only on a failed health check or after `max_cycles` cycles.
    pub fn run(&mut self) -> Result<(), AppError> {
        if !self.started {
            self.start()?;
        }

        let mut ran = 0;
        loop {
            let report = self.tick();
            ran += 1;
            log::debug!(
                "Cycle {} done: {} sent, {} failed, {} skipped",
                self.cycles,
                report.sent.len(),
                report.failed.len(),
                report.skipped.len()
            );

            if self.config.max_cycles.is_some_and(|max| ran >= max) {
                log::info!("Stopping after {} cycle(s)", ran);
                break;
            }

            log::info!("Next check in {} minutes", self.config.interval.as_secs() / 60);
            self.sleeper.sleep(self.config.interval);
        }

        Ok(())
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> Phase {
        if !self.started {
            Phase::Starting
        } else if self.state.offline {
            Phase::Offline
        } else {
            Phase::Polling
        }
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Number of poll cycles executed
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn notifier(&self) -> &N {
        self.notifications.notifier()
    }
}
