//! volwatch - volatility index monitor
//!
//! This library polls a volatility index, decides when threshold alerts,
//! recoveries and daily briefings are due, and delivers them over Telegram.
//!
//! # Modules
//!
//! - [`alerts`]: Alert state machine
//! - [`cli`]: Command-line interface definitions
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`domain`]: Domain models with validation
//! - [`error`]: Error types
//! - [`health`]: Startup health check
//! - [`net`]: HTTP client and retry policy
//! - [`notify`]: Message rendering and notification channels
//! - [`runtime`]: Clock and sleep abstractions
//! - [`services`]: Polling loop and notification delivery
//! - [`source`]: Market data sources

pub mod alerts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod health;
pub mod net;
pub mod notify;
pub mod runtime;
pub mod services;
pub mod source;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{AppError, Result};
