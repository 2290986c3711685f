//! Volatility sample
//!
//! One reading of the volatility index, produced once per poll cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// A single volatility reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Index value (absolute, e.g. 55.3)
    pub volatility: f64,
    /// Timestamp of the upstream data point
    pub timestamp: DateTime<Utc>,
}

impl Sample {
    /// Create a sample, rejecting NaN and infinities
    pub fn new(volatility: f64, timestamp: DateTime<Utc>) -> Result<Self, DomainError> {
        if !volatility.is_finite() {
            return Err(DomainError::InvalidValue(format!(
                "volatility must be finite, got {}",
                volatility
            )));
        }
        Ok(Self {
            volatility,
            timestamp,
        })
    }

    /// Create a sample from an epoch-milliseconds timestamp
    pub fn from_millis(volatility: f64, timestamp_ms: i64) -> Result<Self, DomainError> {
        let timestamp = DateTime::from_timestamp_millis(timestamp_ms).ok_or_else(|| {
            DomainError::InvalidValue(format!("timestamp out of range: {}", timestamp_ms))
        })?;
        Self::new(volatility, timestamp)
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} @ {}",
            self.volatility,
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_from_millis() {
        let sample = Sample::from_millis(55.25, 1_700_000_000_000).unwrap();
        assert_eq!(sample.volatility, 55.25);
        assert_eq!(sample.timestamp.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_sample_rejects_non_finite() {
        assert!(Sample::from_millis(f64::NAN, 0).is_err());
        assert!(Sample::from_millis(f64::INFINITY, 0).is_err());
    }

    #[test]
    fn test_sample_display() {
        let sample = Sample::from_millis(61.0, 0).unwrap();
        assert_eq!(sample.to_string(), "61.00 @ 1970-01-01 00:00:00 UTC");
    }
}
