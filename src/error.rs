//! Error types for ran-liveboard.

use thiserror::Error;

/// Main error type for loading, ingesting, and replaying telemetry.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error while reading a store, log file, or config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A document could not be (de)serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Timestamp text did not match `HH:MM:SS:mmm`.
    #[error("invalid timestamp {input:?}: {reason}")]
    Timestamp { input: String, reason: String },

    /// Log line did not match `date time,millis LEVEL message`.
    #[error("invalid log line {line:?}: {reason}")]
    LogLine { line: String, reason: String },

    /// Scheduling policy code with no known name.
    #[error("unknown scheduling policy code {0}")]
    UnknownPolicy(i64),

    /// Record value could not be used for a metric.
    #[error("invalid value for {metric}: {reason}")]
    InvalidValue { metric: String, reason: String },

    /// Document store failure.
    #[error("store error: {message}")]
    Store { message: String },
}

impl Error {
    pub(crate) fn timestamp(input: &str, reason: impl Into<String>) -> Self {
        Self::Timestamp {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
