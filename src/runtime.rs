//! Time abstractions
//!
//! The polling loop and the retry logic never call the system clock or
//! `thread::sleep` directly, so tests can drive many cycles instantly.

use chrono::{Local, NaiveDateTime};
use std::time::Duration;

/// Source of the current local wall-clock time
pub trait Clock: Send + Sync {
    /// Current local date and time
    fn now(&self) -> NaiveDateTime;
}

/// Blocking delay
pub trait Sleeper: Send + Sync {
    /// Suspend the current cycle for `duration`
    fn sleep(&self, duration: Duration);
}

/// Local system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Sleeps the calling thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
