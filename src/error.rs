//! Error types for the usage-analytics engine

use thiserror::Error;

/// Errors that can occur while reading, ingesting or configuring analytics
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Failed to parse event payload: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Date parse error: {0}")]
    DateParseError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Event read failed: {0}")]
    Read(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}
