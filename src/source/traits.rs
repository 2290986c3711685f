//! Trait definitions for market data
//!
//! Abstracts the upstream providers so the monitor and health check can be
//! tested with mocks.

use crate::domain::Sample;
use crate::error::FetchError;

/// Read-only source of the monitored metric and the asset's spot price
pub trait MetricSource: Send + Sync {
    /// Latest volatility index reading
    fn volatility(&self) -> Result<Sample, FetchError>;

    /// Current spot price in the configured quote currency
    fn spot_price(&self) -> Result<f64, FetchError>;
}
