//! Market data sources
//!
//! Provides the volatility index and spot price behind the [`MetricSource`] trait.

pub mod market;
pub mod traits;

pub use market::{parse_spot_price, parse_volatility, MarketSource};
pub use traits::MetricSource;
