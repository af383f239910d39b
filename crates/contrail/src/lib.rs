#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/contrail/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod fleet;

// Re-export main types from sub-crates
pub use contrail_compare as compare;
pub use contrail_data as data;
pub use contrail_metrics as metrics;
pub use contrail_output as output;

// Re-export common fleet types
pub use fleet::{Carrier, Fleet, UsCarriers};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
