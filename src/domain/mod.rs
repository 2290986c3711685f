//! Domain models for volwatch
//!
//! Types are validated on construction (fail-fast pattern).

pub mod sample;
pub mod schedule;

pub use sample::Sample;
pub use schedule::BriefingHour;
