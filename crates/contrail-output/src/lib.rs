#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/contrail/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod format;
pub mod report;

pub use export::{ExportError, ExportFormat, Exporter, RowRecord, records, to_dataframe};
pub use format::{
    NOT_YET_REPORTED, format_currency, format_number, format_percent_difference, format_value,
};
pub use report::ComparisonReport;
