//! Alert state machine
//!
//! Threshold classification, daily briefing scheduling and offline tracking
//! as a pure function of the previous state.

mod manager;
mod types;

pub use manager::{AlertManager, Evaluation, MonitorState};
pub use types::{AlertRules, AlertStatus, BoundaryMode, Notification, StateUpdate, Thresholds};
