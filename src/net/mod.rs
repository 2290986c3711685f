//! Network layer
//!
//! Retry policy and the blocking HTTP client shared by the metric source and
//! the notifier.

pub mod http;
pub mod retry;

pub use http::HttpClient;
pub use retry::{ResilientFetcher, RetryPolicy};
