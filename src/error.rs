//! Unified error types for volwatch
//!
//! This module defines all error types used throughout the application.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from an outbound HTTP fetch
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Error from the notification transport
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// Error from configuration parsing/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from domain type validation
    #[error("Domain validation error: {0}")]
    Domain(#[from] DomainError),

    /// Startup health check did not pass
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from outbound HTTP requests
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Connection, timeout or body read failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Server answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response did not have the expected shape
    #[error("malformed response: {0}")]
    Malformed(String),

    /// All attempts failed with transient errors
    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<FetchError>,
    },
}

impl FetchError {
    /// Whether another attempt could reasonably succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Malformed(_) | Self::RetriesExhausted { .. } => false,
        }
    }
}

/// Errors from the notification transport
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotifyError {
    /// The HTTP call itself failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The transport answered but reported failure
    #[error("rejected by transport: {0}")]
    Rejected(String),
}

/// Errors from domain type validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Low threshold must sit strictly below the high threshold
    #[error("Invalid thresholds: low {low} must be below high {high}")]
    InvalidThresholds { low: f64, high: f64 },

    /// Briefing hour outside 0-23
    #[error("Invalid briefing hour: {0} (must be 0-23)")]
    InvalidBriefingHour(u32),

    /// Invalid value provided
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Config file already exists and overwrite was not requested
    #[error("Configuration file already exists: {0}")]
    AlreadyExists(String),

    /// Failed to write config file
    #[error("Failed to write configuration to {path}: {message}")]
    WriteFailed { path: String, message: String },

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Missing required config field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),
}

impl From<DomainError> for ConfigError {
    fn from(err: DomainError) -> Self {
        let key = match &err {
            DomainError::InvalidThresholds { .. } => "alerts",
            DomainError::InvalidBriefingHour(_) => "schedule.briefing_hour",
            DomainError::InvalidValue(_) => "value",
        };
        ConfigError::InvalidValue {
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_display() {
        let err = DomainError::InvalidBriefingHour(24);
        assert_eq!(err.to_string(), "Invalid briefing hour: 24 (must be 0-23)");
    }

    #[test]
    fn test_transient_classification() {
        assert!(FetchError::Transport("timed out".into()).is_transient());
        assert!(FetchError::Status {
            status: 503,
            body: String::new()
        }
        .is_transient());
        assert!(FetchError::Status {
            status: 429,
            body: String::new()
        }
        .is_transient());
        assert!(!FetchError::Status {
            status: 401,
            body: "Unauthorized".into()
        }
        .is_transient());
        assert!(!FetchError::Malformed("no data".into()).is_transient());
    }

    #[test]
    fn test_retries_exhausted_display() {
        let err = FetchError::RetriesExhausted {
            attempts: 4,
            last: Box::new(FetchError::Transport("connection refused".into())),
        };
        let text = err.to_string();
        assert!(text.contains("4 attempts"));
        assert!(text.contains("connection refused"));
    }

    #[test]
    fn test_error_conversion() {
        let fetch_err = FetchError::Malformed("empty".into());
        let app_err: AppError = fetch_err.into();
        assert!(matches!(app_err, AppError::Fetch(_)));

        let domain_err = DomainError::InvalidThresholds {
            low: 90.0,
            high: 80.0,
        };
        let config_err: ConfigError = domain_err.into();
        assert!(matches!(config_err, ConfigError::InvalidValue { ref key, .. } if key == "alerts"));
    }
}
