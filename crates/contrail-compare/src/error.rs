//! Comparison errors

use contrail_metrics::{Partition, Quarter};
use thiserror::Error;

/// Result type for comparison operations.
pub type Result<T> = std::result::Result<T, CompareError>;

/// Invalid comparison queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompareError {
    /// A required selection set is empty
    #[error("No {0} selected")]
    EmptySelection(&'static str),

    /// Base entity is not among the selected entities
    #[error("Base entity {0} is not among the selected entities")]
    BaseNotSelected(String),

    /// Entity never observed in the partition
    #[error("Entity {entity} has no {partition} observations")]
    UnknownEntity {
        /// Entity code
        entity: String,
        /// Partition searched
        partition: Partition,
    },

    /// Year never observed in the partition
    #[error("Year {year} has no {partition} observations")]
    UnknownYear {
        /// Fiscal year
        year: i32,
        /// Partition searched
        partition: Partition,
    },

    /// Quarter from the other partition
    #[error("Quarter {quarter} does not belong to the {partition} partition")]
    QuarterOutsidePartition {
        /// Offending quarter
        quarter: Quarter,
        /// Partition being compared
        partition: Partition,
    },

    /// Partition has no observations to compare
    #[error("The {0} partition is empty")]
    EmptyPartition(Partition),
}
