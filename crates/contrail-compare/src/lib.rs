#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/contrail/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod aligner;
pub mod error;
pub mod pct_diff;
pub mod selection;
pub mod table;

pub use aligner::align;
pub use error::{CompareError, Result};
pub use pct_diff::pct_diff;
pub use selection::{Selection, SelectionBuilder};
pub use table::{ComparisonRow, ComparisonTable};
