//! Error types for the observation model.

use thiserror::Error;

/// Result type for metric operations.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Errors raised while building or parsing observations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    /// The same (entity, year, quarter) key appears twice
    #[error("Duplicate observation for {entity} {period}")]
    DuplicateObservation {
        /// Entity code
        entity: String,
        /// Period label
        period: String,
    },

    /// Metric name not present in the registry
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// Quarter indicator outside `FY` / `1..4`
    #[error("Invalid quarter: {0}")]
    InvalidQuarter(String),

    /// Period label that is neither `YYYY` nor `YYYYQn`
    #[error("Invalid period label: {0}")]
    InvalidPeriod(String),

    /// Empty entity code
    #[error("Observation has an empty entity code")]
    EmptyEntity,

    /// A primitive value was supplied for a derived metric
    #[error("{0} is derived and cannot be supplied as a reported value")]
    DerivedInput(String),
}
