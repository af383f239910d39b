//! Error types for data operations.

use contrail_metrics::MetricsError;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Observation model error
    #[error(transparent)]
    Metrics(#[from] MetricsError),

    /// Required column absent from the source table
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Cell that cannot be interpreted
    #[error("Invalid value in row {row}, column {column}: {reason}")]
    InvalidValue {
        /// Zero-based data row
        row: usize,
        /// Column name
        column: String,
        /// What was wrong
        reason: String,
    },

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// SEC EDGAR API error
    #[error("EDGAR API error: {0}")]
    EdgarApi(String),

    /// A request kept failing after every retry
    #[error("Max attempts reached after {attempts} tries: {last_error}")]
    RetriesExhausted {
        /// Attempts made
        attempts: u32,
        /// Error from the final attempt
        last_error: String,
    },

    /// Carrier without a registered SEC CIK
    #[error("Unknown carrier: {0}")]
    UnknownCarrier(String),

    /// No filings matched
    #[error("Filing not found: {0}")]
    FilingNotFound(String),
}
