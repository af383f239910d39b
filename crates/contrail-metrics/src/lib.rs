#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/contrail/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod deriver;
pub mod error;
pub mod observation;
pub mod period;
pub mod registry;

pub use deriver::MetricDeriver;
pub use error::{MetricsError, Result};
pub use observation::{Dataset, DerivedDataset, Observation, PartitionData};
pub use period::{Partition, Period, Quarter};

// Re-export registry types for convenience
pub use registry::{
    DisplayScale, Formula, Metric, MetricGroup, MetricInfo, UnitClass, available_metrics,
    derived_metrics, get_metric_info, metric_map, metrics_by_unit, primitive_metrics, round2,
};
