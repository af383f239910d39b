//! Observations and datasets.
//!
//! An [`Observation`] is one reporting period for one entity. A [`Dataset`]
//! holds the reported (primitive) values as loaded; the deriver turns it into a
//! [`DerivedDataset`], which is the only thing that can be split into
//! [`PartitionData`] for comparison.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::error::{MetricsError, Result};
use crate::period::{Partition, Period, Quarter};
use crate::registry::Metric;

/// One reporting period for one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Entity code (upper-case ticker)
    pub entity: String,
    /// Reporting period
    pub period: Period,
    /// Metric values; an absent key means the value is missing
    values: BTreeMap<Metric, f64>,
}

impl Observation {
    /// Create an observation with no values. The entity code is trimmed and
    /// upper-cased.
    pub fn new(entity: impl AsRef<str>, year: i32, quarter: Quarter) -> Self {
        Self {
            entity: entity.as_ref().trim().to_uppercase(),
            period: Period::new(year, quarter),
            values: BTreeMap::new(),
        }
    }

    /// Builder-style setter. `None` leaves the metric missing.
    pub fn with(mut self, metric: Metric, value: impl Into<Option<f64>>) -> Self {
        self.set(metric, value.into());
        self
    }

    /// Set or clear a metric value.
    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        match value {
            Some(v) => {
                self.values.insert(metric, v);
            }
            None => {
                self.values.remove(&metric);
            }
        }
    }

    /// Value of a metric, `None` when missing. Derived values may be
    /// non-finite after a division by zero.
    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied()
    }

    /// Fiscal year.
    pub const fn year(&self) -> i32 {
        self.period.year
    }

    /// Quarter indicator.
    pub const fn quarter(&self) -> Quarter {
        self.period.quarter
    }

    /// Canonical period label.
    pub fn period_label(&self) -> String {
        self.period.label()
    }

    /// Metrics with a value present.
    pub fn metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        self.values.keys().copied()
    }
}

fn check_unique<'a>(observations: impl IntoIterator<Item = &'a Observation>) -> Result<()> {
    let mut seen = HashSet::new();
    for obs in observations {
        if obs.entity.is_empty() {
            return Err(MetricsError::EmptyEntity);
        }
        if !seen.insert((obs.entity.as_str(), obs.period)) {
            return Err(MetricsError::DuplicateObservation {
                entity: obs.entity.clone(),
                period: obs.period.label(),
            });
        }
    }
    Ok(())
}

/// Reported observations as loaded from the source. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    observations: Vec<Observation>,
}

impl Dataset {
    /// Build a dataset of reported values.
    ///
    /// # Errors
    ///
    /// Fails on a duplicate (entity, year, quarter) key, an empty entity code,
    /// or a value supplied for a derived metric.
    pub fn new(observations: Vec<Observation>) -> Result<Self> {
        check_unique(&observations)?;
        if let Some(metric) = observations
            .iter()
            .flat_map(Observation::metrics)
            .find(Metric::is_derived)
        {
            return Err(MetricsError::DerivedInput(metric.to_string()));
        }
        Ok(Self { observations })
    }

    /// Observations in load order.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Number of observations.
    pub const fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the dataset is empty.
    pub const fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Observations augmented with derived metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivedDataset {
    observations: Vec<Observation>,
}

impl DerivedDataset {
    pub(crate) const fn from_derived(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    /// Observations in load order.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Number of observations.
    pub const fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the dataset is empty.
    pub const fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Copy out one partition.
    pub fn partition(&self, partition: Partition) -> PartitionData {
        PartitionData {
            partition,
            observations: self
                .observations
                .iter()
                .filter(|obs| partition.contains(obs.quarter()))
                .cloned()
                .collect(),
        }
    }

    /// Split into (full-year, quarterly) partitions.
    pub fn split(&self) -> (PartitionData, PartitionData) {
        (
            self.partition(Partition::FullYear),
            self.partition(Partition::Quarterly),
        )
    }
}

/// One partition of a derived dataset. Comparisons run on exactly one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionData {
    partition: Partition,
    observations: Vec<Observation>,
}

impl PartitionData {
    /// Which partition this is.
    pub const fn partition(&self) -> Partition {
        self.partition
    }

    /// Observations in load order.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Number of observations.
    pub const fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the partition is empty.
    pub const fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Distinct entities in first-seen order.
    pub fn entities(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.observations
            .iter()
            .filter(|obs| seen.insert(obs.entity.as_str()))
            .map(|obs| obs.entity.clone())
            .collect()
    }

    /// Whether the entity has at least one observation.
    pub fn contains_entity(&self, entity: &str) -> bool {
        self.observations.iter().any(|obs| obs.entity == entity)
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.observations
            .iter()
            .map(Observation::year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct quarters, in chronological rank.
    pub fn quarters(&self) -> Vec<Quarter> {
        self.observations
            .iter()
            .map(Observation::quarter)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct periods, chronological.
    pub fn periods(&self) -> Vec<Period> {
        self.observations
            .iter()
            .map(|obs| obs.period)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Most recent period in the partition.
    pub fn latest_period(&self) -> Option<Period> {
        self.observations.iter().map(|obs| obs.period).max()
    }

    /// Metrics with at least one value, in registry order.
    pub fn available_metrics(&self) -> Vec<Metric> {
        Metric::ALL
            .into_iter()
            .filter(|metric| {
                self.observations
                    .iter()
                    .any(|obs| obs.value(*metric).is_some())
            })
            .collect()
    }

    /// Observation for an entity and period.
    pub fn get(&self, entity: &str, period: Period) -> Option<&Observation> {
        self.observations
            .iter()
            .find(|obs| obs.entity == entity && obs.period == period)
    }
}
