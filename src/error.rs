//! Error types for Synheart Coach

use thiserror::Error;

/// Errors that can occur while ingesting activity logs or configuring analysis
#[derive(Debug, Error)]
pub enum CoachError {
    #[error("Failed to parse activity log: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid activity record: {0}")]
    InvalidRecord(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Activity store lock poisoned")]
    StorePoisoned,
}
