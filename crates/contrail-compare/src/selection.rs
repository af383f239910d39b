//! Comparison queries.
//!
//! A [`Selection`] is an immutable description of one comparison: which
//! entities, which base entity, which years, quarters and metrics, and whether
//! values are rescaled for display. The hosting application owns any memory of
//! previous selections; the engine only ever sees a complete, validated one.

use contrail_metrics::{Metric, MetricGroup, PartitionData, Quarter};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

use crate::error::{CompareError, Result};

/// Validated comparison query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Selection {
    entities: Vec<String>,
    base: String,
    years: BTreeSet<i32>,
    quarters: BTreeSet<Quarter>,
    metrics: Vec<Metric>,
    rescale: bool,
}

impl Selection {
    /// Start building a selection.
    pub fn builder() -> SelectionBuilder {
        SelectionBuilder::default()
    }

    /// "Latest results" query: every entity in the partition, only the most
    /// recent period, every metric with data.
    ///
    /// # Errors
    ///
    /// Fails on an empty partition or when `base` has no observations.
    pub fn latest(data: &PartitionData, base: &str) -> Result<Self> {
        let latest = data
            .latest_period()
            .ok_or(CompareError::EmptyPartition(data.partition()))?;

        Self::builder()
            .entities(data.entities())
            .base(base)
            .year(latest.year)
            .quarter(latest.quarter)
            .metrics(data.available_metrics())
            .build()
    }

    /// Selected entities in display order.
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Base entity.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Selected years.
    pub const fn years(&self) -> &BTreeSet<i32> {
        &self.years
    }

    /// Selected quarters.
    pub const fn quarters(&self) -> &BTreeSet<Quarter> {
        &self.quarters
    }

    /// Selected metrics in output order.
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Whether values are rescaled for display.
    pub const fn rescale(&self) -> bool {
        self.rescale
    }

    /// Copy of this selection with a different rescale flag.
    pub const fn with_rescale(mut self, rescale: bool) -> Self {
        self.rescale = rescale;
        self
    }

    /// Check the selection against the partition it will run on.
    ///
    /// # Errors
    ///
    /// Rejects quarters from the other partition, and entities or years the
    /// partition never observed.
    pub fn validate_against(&self, data: &PartitionData) -> Result<()> {
        let partition = data.partition();

        if let Some(&quarter) = self.quarters.iter().find(|q| !partition.contains(**q)) {
            return Err(CompareError::QuarterOutsidePartition { quarter, partition });
        }

        let years: HashSet<i32> = data.years().into_iter().collect();
        if let Some(&year) = self.years.iter().find(|y| !years.contains(*y)) {
            return Err(CompareError::UnknownYear { year, partition });
        }

        if let Some(entity) = self.entities.iter().find(|e| !data.contains_entity(e)) {
            return Err(CompareError::UnknownEntity {
                entity: entity.clone(),
                partition,
            });
        }

        Ok(())
    }
}

/// Builder for [`Selection`].
#[derive(Debug, Clone)]
pub struct SelectionBuilder {
    entities: Vec<String>,
    base: Option<String>,
    years: BTreeSet<i32>,
    quarters: BTreeSet<Quarter>,
    metrics: Vec<Metric>,
    rescale: bool,
}

impl Default for SelectionBuilder {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            base: None,
            years: BTreeSet::new(),
            quarters: BTreeSet::new(),
            metrics: Vec::new(),
            rescale: true,
        }
    }
}

fn normalize_entity(entity: &str) -> String {
    entity.trim().to_uppercase()
}

impl SelectionBuilder {
    /// Add one entity.
    pub fn entity(mut self, entity: impl AsRef<str>) -> Self {
        let entity = normalize_entity(entity.as_ref());
        if !entity.is_empty() && !self.entities.contains(&entity) {
            self.entities.push(entity);
        }
        self
    }

    /// Add entities, keeping first occurrence order.
    pub fn entities<I, S>(self, entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        entities.into_iter().fold(self, Self::entity)
    }

    /// Set the base entity.
    pub fn base(mut self, base: impl AsRef<str>) -> Self {
        self.base = Some(normalize_entity(base.as_ref()));
        self
    }

    /// Add one year.
    pub fn year(mut self, year: i32) -> Self {
        self.years.insert(year);
        self
    }

    /// Add years.
    pub fn years(mut self, years: impl IntoIterator<Item = i32>) -> Self {
        self.years.extend(years);
        self
    }

    /// Add one quarter.
    pub fn quarter(mut self, quarter: Quarter) -> Self {
        self.quarters.insert(quarter);
        self
    }

    /// Add quarters.
    pub fn quarters(mut self, quarters: impl IntoIterator<Item = Quarter>) -> Self {
        self.quarters.extend(quarters);
        self
    }

    /// Add one metric.
    pub fn metric(mut self, metric: Metric) -> Self {
        if !self.metrics.contains(&metric) {
            self.metrics.push(metric);
        }
        self
    }

    /// Add metrics, keeping first occurrence order.
    pub fn metrics(self, metrics: impl IntoIterator<Item = Metric>) -> Self {
        metrics.into_iter().fold(self, Self::metric)
    }

    /// Add the members of a metric group. `All` expands to the metrics with
    /// data in `data`.
    pub fn metric_group(self, group: MetricGroup, data: &PartitionData) -> Self {
        match group.members() {
            Some(members) => self.metrics(members.iter().copied()),
            None => self.metrics(data.available_metrics()),
        }
    }

    /// Rescale values for display (default `true`).
    pub const fn rescale(mut self, rescale: bool) -> Self {
        self.rescale = rescale;
        self
    }

    /// Validate and build the selection.
    ///
    /// # Errors
    ///
    /// Fails when any set is empty or the base is not a selected entity.
    pub fn build(self) -> Result<Selection> {
        if self.entities.is_empty() {
            return Err(CompareError::EmptySelection("entities"));
        }
        if self.years.is_empty() {
            return Err(CompareError::EmptySelection("years"));
        }
        if self.quarters.is_empty() {
            return Err(CompareError::EmptySelection("quarters"));
        }
        if self.metrics.is_empty() {
            return Err(CompareError::EmptySelection("metrics"));
        }

        let base = self
            .base
            .filter(|b| !b.is_empty())
            .ok_or(CompareError::EmptySelection("base entity"))?;
        if !self.entities.contains(&base) {
            return Err(CompareError::BaseNotSelected(base));
        }

        Ok(Selection {
            entities: self.entities,
            base,
            years: self.years,
            quarters: self.quarters,
            metrics: self.metrics,
            rescale: self.rescale,
        })
    }
}
