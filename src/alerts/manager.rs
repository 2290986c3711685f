//! Alert manager implementation
//!
//! Pure decision logic: given the current monitor state, the outcome of this
//! cycle's volatility fetch and the local time, decide the next state and the
//! notifications to send. Nothing here touches the network or the clock.

use super::types::{AlertRules, AlertStatus, Notification};
use crate::domain::Sample;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Process-wide monitor state, reset on every restart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MonitorState {
    /// Last notified classification
    pub alert_status: AlertStatus,
    /// Date of the last daily briefing
    pub last_briefing: Option<NaiveDate>,
    /// Most recent volatility fetch failed
    pub offline: bool,
}

impl MonitorState {
    /// Undo the part of the state a notification carried
    ///
    /// Used when a notification could not be delivered and the change should
    /// be retried on a later cycle.
    pub fn rollback(&mut self, notification: &Notification, previous: &MonitorState) {
        match notification {
            Notification::Startup => {}
            Notification::ConnectionRestored => self.offline = previous.offline,
            Notification::Briefing { .. } => self.last_briefing = previous.last_briefing,
            Notification::HighVolatility { .. }
            | Notification::LowVolatility { .. }
            | Notification::Recovered { .. } => self.alert_status = previous.alert_status,
        }
    }
}

/// Result of evaluating one cycle
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// State after the cycle, assuming every notification is delivered
    pub state: MonitorState,
    /// Notifications to send, in order
    pub notifications: Vec<Notification>,
}

/// Alert manager
///
/// Holds the rules and evaluates cycles against them.
#[derive(Debug, Clone, Default)]
pub struct AlertManager {
    rules: AlertRules,
}

impl AlertManager {
    /// Create a new alert manager
    pub fn new(rules: AlertRules) -> Self {
        Self { rules }
    }

    /// Get the rules
    pub fn rules(&self) -> &AlertRules {
        &self.rules
    }

    /// Evaluate one poll cycle
    ///
    /// `sample` is `None` when the volatility fetch failed. Order of checks:
    /// offline tracking, daily briefing, then the alert transition.
    pub fn evaluate(
        &self,
        state: &MonitorState,
        sample: Option<&Sample>,
        now: NaiveDateTime,
    ) -> Evaluation {
        let mut next = *state;
        let mut notifications = Vec::new();

        let Some(sample) = sample else {
            next.offline = true;
            return Evaluation {
                state: next,
                notifications,
            };
        };

        if next.offline {
            next.offline = false;
            notifications.push(Notification::ConnectionRestored);
        }

        let today = now.date();
        if self.rules.briefing_hour.matches(now) && next.last_briefing != Some(today) {
            next.last_briefing = Some(today);
            notifications.push(Notification::Briefing {
                volatility: sample.volatility,
            });
        }

        if let Some(notification) = self.transition(&mut next, sample.volatility) {
            notifications.push(notification);
        }

        Evaluation {
            state: next,
            notifications,
        }
    }

    /// Apply the threshold transition for a value, if any
    fn transition(&self, state: &mut MonitorState, volatility: f64) -> Option<Notification> {
        let band = self.rules.thresholds.classify(volatility);
        if band == state.alert_status {
            return None;
        }

        state.alert_status = band;
        Some(match band {
            AlertStatus::High => Notification::HighVolatility { volatility },
            AlertStatus::Low => Notification::LowVolatility { volatility },
            AlertStatus::Normal => Notification::Recovered { volatility },
        })
    }
}
