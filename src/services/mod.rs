//! Service layer
//!
//! Services encapsulate the monitoring loop and notification delivery.

pub mod monitor;
pub mod notification_service;

pub use monitor::{CycleReport, Monitor, MonitorConfig, Phase};
pub use notification_service::{Delivery, NotificationService};
