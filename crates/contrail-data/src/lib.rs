#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/contrail/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod dataset;
pub mod edgar;
pub mod error;
pub mod insights;

pub use dataset::{dataset_from_frame, load_csv, parse_csv};
pub use error::{DataError, Result};
pub use insights::{
    FilingDigest, InsightProvider, InsightRequest, insight_or_warning, render_digest,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
