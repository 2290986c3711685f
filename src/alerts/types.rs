//! Alert system domain types
//!
//! Defines the alert classification, threshold rules and the notifications the
//! state machine can emit.

use crate::domain::BriefingHour;
use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Last notified volatility classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    /// Between the thresholds
    #[default]
    Normal,
    /// At or above the high threshold
    High,
    /// At or below the low threshold
    Low,
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::High => write!(f, "HIGH"),
            Self::Low => write!(f, "LOW"),
        }
    }
}

/// How a sample sitting exactly on a threshold is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryMode {
    /// `v >= high` is HIGH, `v <= low` is LOW
    #[default]
    Inclusive,
    /// `v > high` is HIGH, `v < low` is LOW; the thresholds belong to NORMAL
    Exclusive,
}

impl fmt::Display for BoundaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inclusive => write!(f, "inclusive"),
            Self::Exclusive => write!(f, "exclusive"),
        }
    }
}

/// When a decided state change becomes permanent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateUpdate {
    /// Commit as soon as the notification is decided, even if sending fails
    #[default]
    OnDecision,
    /// Roll the change back when the notification could not be delivered
    OnDelivery,
}

impl fmt::Display for StateUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnDecision => write!(f, "on_decision"),
            Self::OnDelivery => write!(f, "on_delivery"),
        }
    }
}

/// Validated pair of alert thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    low: f64,
    high: f64,
    boundary: BoundaryMode,
}

impl Thresholds {
    /// Create thresholds; `low` must be strictly below `high` and both finite
    pub fn new(low: f64, high: f64, boundary: BoundaryMode) -> Result<Self, DomainError> {
        if !low.is_finite() || !high.is_finite() || low >= high {
            return Err(DomainError::InvalidThresholds { low, high });
        }
        Ok(Self {
            low,
            high,
            boundary,
        })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn boundary(&self) -> BoundaryMode {
        self.boundary
    }

    /// Classify a volatility value into a band
    pub fn classify(&self, value: f64) -> AlertStatus {
        let (is_high, is_low) = match self.boundary {
            BoundaryMode::Inclusive => (value >= self.high, value <= self.low),
            BoundaryMode::Exclusive => (value > self.high, value < self.low),
        };

        if is_high {
            AlertStatus::High
        } else if is_low {
            AlertStatus::Low
        } else {
            AlertStatus::Normal
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low: 40.0,
            high: 80.0,
            boundary: BoundaryMode::Inclusive,
        }
    }
}

impl fmt::Display for Thresholds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} ({})", self.low, self.high, self.boundary)
    }
}

/// Everything the state machine needs to decide a cycle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AlertRules {
    pub thresholds: Thresholds,
    pub briefing_hour: BriefingHour,
}

impl AlertRules {
    pub fn new(thresholds: Thresholds, briefing_hour: BriefingHour) -> Self {
        Self {
            thresholds,
            briefing_hour,
        }
    }
}

/// A notification the monitor has decided to send
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// Monitor came up after a passing health check
    Startup,
    /// First successful fetch after one or more failures
    ConnectionRestored,
    /// Once-daily summary
    Briefing { volatility: f64 },
    /// Entered the high band
    HighVolatility { volatility: f64 },
    /// Entered the low band
    LowVolatility { volatility: f64 },
    /// Returned to the normal band
    Recovered { volatility: f64 },
}

impl Notification {
    /// Whether the message embeds a spot price looked up at send time
    pub fn needs_price(&self) -> bool {
        matches!(
            self,
            Self::Briefing { .. } | Self::HighVolatility { .. } | Self::LowVolatility { .. }
        )
    }

    /// Whether the message is useless without the spot price
    pub fn requires_price(&self) -> bool {
        matches!(self, Self::Briefing { .. })
    }

    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::ConnectionRestored => "connection_restored",
            Self::Briefing { .. } => "briefing",
            Self::HighVolatility { .. } => "high_volatility",
            Self::LowVolatility { .. } => "low_volatility",
            Self::Recovered { .. } => "recovered",
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Startup | Self::ConnectionRestored => write!(f, "{}", self.kind()),
            Self::Briefing { volatility }
            | Self::HighVolatility { volatility }
            | Self::LowVolatility { volatility }
            | Self::Recovered { volatility } => write!(f, "{} ({:.2})", self.kind(), volatility),
        }
    }
}
