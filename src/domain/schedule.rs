//! Schedule domain types

use crate::error::DomainError;
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Local hour of day (0-23) at which the daily briefing goes out
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BriefingHour(u32);

impl BriefingHour {
    /// Create a briefing hour with validation
    pub fn new(hour: u32) -> Result<Self, DomainError> {
        if hour > 23 {
            return Err(DomainError::InvalidBriefingHour(hour));
        }
        Ok(Self(hour))
    }

    /// Get the hour value
    #[inline]
    pub const fn hour(&self) -> u32 {
        self.0
    }

    /// Whether the given local time falls inside the briefing hour
    pub fn matches(&self, now: NaiveDateTime) -> bool {
        now.hour() == self.0
    }
}

impl Default for BriefingHour {
    fn default() -> Self {
        Self(8)
    }
}

impl fmt::Display for BriefingHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_briefing_hour_validation() {
        assert!(BriefingHour::new(0).is_ok());
        assert!(BriefingHour::new(23).is_ok());
        assert_eq!(
            BriefingHour::new(24),
            Err(DomainError::InvalidBriefingHour(24))
        );
    }

    #[test]
    fn test_briefing_hour_matches_whole_hour() {
        let hour = BriefingHour::new(8).unwrap();
        assert!(hour.matches(at(8, 0)));
        assert!(hour.matches(at(8, 59)));
        assert!(!hour.matches(at(7, 59)));
        assert!(!hour.matches(at(9, 0)));
    }

    #[test]
    fn test_briefing_hour_display() {
        assert_eq!(BriefingHour::new(7).unwrap().to_string(), "07:00");
    }
}
