//! Market data adapter
//!
//! Volatility comes from Deribit's `get_volatility_index_data`, the spot price
//! from CoinGecko's `simple/price`. Both go through the shared [`HttpClient`].

use super::traits::MetricSource;
use crate::config::SourceConfig;
use crate::domain::Sample;
use crate::error::FetchError;
use crate::net::HttpClient;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde_json::Value;

/// Production metric source
#[derive(Debug, Clone)]
pub struct MarketSource {
    http: HttpClient,
    config: SourceConfig,
}

impl MarketSource {
    pub fn new(http: HttpClient, config: SourceConfig) -> Self {
        Self { http, config }
    }

    /// Query parameters for the volatility window ending now
    fn volatility_query(&self) -> Vec<(&'static str, String)> {
        let end = Utc::now();
        let start = end - ChronoDuration::minutes(i64::from(self.config.lookback_minutes));
        vec![
            ("currency", self.config.currency.clone()),
            ("start_timestamp", start.timestamp_millis().to_string()),
            ("end_timestamp", end.timestamp_millis().to_string()),
            ("resolution", self.config.resolution.clone()),
        ]
    }
}

impl MetricSource for MarketSource {
    fn volatility(&self) -> Result<Sample, FetchError> {
        let query = self.volatility_query();
        let body = self
            .http
            .get_json("volatility", &self.config.volatility_url, &query)?;

        let sample = parse_volatility(&body)?;
        log::debug!("{} volatility: {}", self.config.currency, sample);
        Ok(sample)
    }

    fn spot_price(&self) -> Result<f64, FetchError> {
        let query = [
            ("ids", self.config.coin_id.clone()),
            ("vs_currencies", self.config.vs_currency.clone()),
        ];
        let body = self
            .http
            .get_json("spot_price", &self.config.price_url, &query)?;

        let price = parse_spot_price(&body, &self.config.coin_id, &self.config.vs_currency)?;
        log::debug!(
            "{} spot price: {} {}",
            self.config.coin_id,
            price,
            self.config.vs_currency
        );
        Ok(price)
    }
}

/// Extract the most recent row of `result.data` as a sample
///
/// Rows are `[timestamp_ms, value, ...]`; only the first two columns are used.
/// A row whose timestamp is missing or unreadable is stamped with the current time.
pub fn parse_volatility(body: &Value) -> Result<Sample, FetchError> {
    let rows = body
        .get("result")
        .and_then(|r| r.get("data"))
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::Malformed("missing result.data".to_string()))?;

    let row = rows
        .last()
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::Malformed("no volatility data points".to_string()))?;

    let value = row
        .get(1)
        .and_then(as_number)
        .ok_or_else(|| FetchError::Malformed("data point has no value".to_string()))?;

    let timestamp = row
        .first()
        .and_then(as_number)
        .filter(|ms| ms.is_finite())
        .and_then(|ms| DateTime::from_timestamp_millis(ms as i64))
        .unwrap_or_else(|| {
            log::debug!("Data point has no usable timestamp, using current time");
            Utc::now()
        });

    Sample::new(value, timestamp).map_err(|e| FetchError::Malformed(e.to_string()))
}

/// Extract `body[coin_id][vs_currency]` as a price
pub fn parse_spot_price(body: &Value, coin_id: &str, vs_currency: &str) -> Result<f64, FetchError> {
    let price = body
        .get(coin_id)
        .and_then(|quotes| quotes.get(vs_currency))
        .and_then(as_number)
        .ok_or_else(|| {
            FetchError::Malformed(format!("missing price for {}/{}", coin_id, vs_currency))
        })?;

    if !price.is_finite() || price <= 0.0 {
        return Err(FetchError::Malformed(format!("invalid price: {}", price)));
    }
    Ok(price)
}

/// Accept JSON numbers and numeric strings
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_volatility_uses_last_row() {
        let body = json!({
            "jsonrpc": "2.0",
            "result": {
                "data": [
                    [1_700_000_000_000_i64, 51.2, 52.0, 50.9, 51.5],
                    [1_700_000_060_000_i64, 53.75, 54.0, 53.1, 53.9]
                ],
                "continuation": null
            }
        });

        let sample = parse_volatility(&body).unwrap();
        assert_eq!(sample.volatility, 53.75);
        assert_eq!(sample.timestamp.timestamp_millis(), 1_700_000_060_000);
    }

    #[test]
    fn test_parse_volatility_string_value() {
        let body = json!({"result": {"data": [[1_700_000_000_000_i64, "48.5"]]}});
        assert_eq!(parse_volatility(&body).unwrap().volatility, 48.5);
    }

    #[test]
    fn test_parse_volatility_empty_data() {
        let body = json!({"result": {"data": []}});
        assert!(matches!(
            parse_volatility(&body),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_volatility_missing_result() {
        let body = json!({"error": {"code": 10001, "message": "bad request"}});
        assert!(matches!(
            parse_volatility(&body),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_volatility_short_row() {
        let body = json!({"result": {"data": [[1_700_000_000_000_i64]]}});
        assert!(parse_volatility(&body).is_err());
    }

    #[test]
    fn test_parse_volatility_float_timestamp() {
        let body = json!({"result": {"data": [[1_700_000_060_000.0, 61.0]]}});
        let sample = parse_volatility(&body).unwrap();
        assert_eq!(sample.volatility, 61.0);
        assert_eq!(sample.timestamp.timestamp_millis(), 1_700_000_060_000);
    }

    #[test]
    fn test_parse_volatility_missing_timestamp_uses_now() {
        let before = Utc::now();
        let body = json!({"result": {"data": [[null, 47.25]]}});
        let sample = parse_volatility(&body).unwrap();
        assert_eq!(sample.volatility, 47.25);
        assert!(sample.timestamp >= before);
    }

    #[test]
    fn test_parse_spot_price() {
        let body = json!({"ethereum": {"usd": 3120.55}});
        assert_eq!(parse_spot_price(&body, "ethereum", "usd").unwrap(), 3120.55);
    }

    #[test]
    fn test_parse_spot_price_missing_currency() {
        let body = json!({"ethereum": {"eur": 2900.0}});
        assert!(matches!(
            parse_spot_price(&body, "ethereum", "usd"),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_spot_price_rejects_zero() {
        let body = json!({"ethereum": {"usd": 0}});
        assert!(parse_spot_price(&body, "ethereum", "usd").is_err());
    }
}
