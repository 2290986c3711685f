//! Blocking HTTP client
//!
//! Thin wrapper over `reqwest::blocking` that routes every request through the
//! [`ResilientFetcher`] and decodes the body as JSON after the retry loop, so a
//! malformed payload is never retried.

use super::retry::ResilientFetcher;
use crate::error::FetchError;

use reqwest::blocking::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

const USER_AGENT: &str = concat!("volwatch/", env!("CARGO_PKG_VERSION"));

/// Longest error body kept in a [`FetchError::Status`]
const MAX_ERROR_BODY: usize = 200;

/// JSON-over-HTTP client with retry
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    fetcher: ResilientFetcher,
}

impl HttpClient {
    /// Build a client with a fixed per-request timeout
    pub fn new(timeout: Duration, fetcher: ResilientFetcher) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(transport_error)?;

        Ok(Self { client, fetcher })
    }

    /// GET `url` with query parameters and decode the JSON body
    pub fn get_json(
        &self,
        label: &str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Value, FetchError> {
        self.execute(label, || self.client.get(url).query(query))
    }

    /// POST a form-encoded body to `url` and decode the JSON response
    pub fn post_form(
        &self,
        label: &str,
        url: &str,
        form: &[(&str, String)],
    ) -> Result<Value, FetchError> {
        self.execute(label, || self.client.post(url).form(form))
    }

    fn execute<F>(&self, label: &str, build: F) -> Result<Value, FetchError>
    where
        F: Fn() -> RequestBuilder,
    {
        let body = self.fetcher.fetch(label, || {
            let response = build().send().map_err(transport_error)?;
            let status = response.status();
            let text = response.text().map_err(transport_error)?;

            if !status.is_success() {
                return Err(FetchError::Status {
                    status: status.as_u16(),
                    body: truncate(&text),
                });
            }
            Ok(text)
        })?;

        parse_json(&body)
    }
}

/// Decode a response body, mapping failures to [`FetchError::Malformed`]
pub fn parse_json(body: &str) -> Result<Value, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Malformed(format!("invalid JSON: {}", e)))
}

/// Strip the URL from reqwest errors; Telegram URLs embed the bot token.
fn transport_error(err: reqwest::Error) -> FetchError {
    FetchError::Transport(err.without_url().to_string())
}

fn truncate(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY).collect()
}
