//! Error types for the Civic Fix assistant.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while triaging or storing a report.
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A report-bearing event arrived without usable report data
    #[error("{0}")]
    InvalidReport(String),

    /// Field-level validation failure on the submitted report
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
