//! Comparison output.

use contrail_metrics::{DisplayScale, Metric, Period};
use serde::Serialize;

/// One (period, entity, metric) cell of a comparison.
///
/// Values are numeric or null, never pre-formatted. A non-finite `value`
/// comes from a degenerate derivation and is distinct from a missing one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    /// Reporting period
    pub period: Period,
    /// Entity code
    pub entity: String,
    /// Metric compared
    pub metric: Metric,
    /// Metric label under the applied scale, e.g. `"Total Revenue (millions)"`
    pub label: String,
    /// Scale applied to `value`
    pub scale: DisplayScale,
    /// Entity's value, `None` when it has no observation or no value
    pub value: Option<f64>,
    /// Percent difference against the base entity for the same period
    pub percent_difference: Option<f64>,
}

/// Long-form comparison produced by [`align`](crate::align).
///
/// Rows are ordered by metric (selection order), then entity (selection
/// order), then period (chronological), and cover every combination exactly
/// once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonTable {
    base: String,
    entities: Vec<String>,
    periods: Vec<Period>,
    metrics: Vec<Metric>,
    rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub(crate) const fn new(
        base: String,
        entities: Vec<String>,
        periods: Vec<Period>,
        metrics: Vec<Metric>,
        rows: Vec<ComparisonRow>,
    ) -> Self {
        Self {
            base,
            entities,
            periods,
            metrics,
            rows,
        }
    }

    /// Base entity.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Entities in display order.
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Periods in chronological order.
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Metrics in display order.
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// All rows.
    pub fn rows(&self) -> &[ComparisonRow] {
        &self.rows
    }

    /// Number of rows.
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows (no periods matched the selection).
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows for one metric.
    pub fn for_metric(&self, metric: Metric) -> impl Iterator<Item = &ComparisonRow> + '_ {
        self.rows.iter().filter(move |row| row.metric == metric)
    }

    /// Row for a (period, entity, metric) cell.
    pub fn get(&self, period: Period, entity: &str, metric: Metric) -> Option<&ComparisonRow> {
        self.rows
            .iter()
            .find(|row| row.period == period && row.metric == metric && row.entity == entity)
    }

    /// Most recent period in the table.
    pub fn latest_period(&self) -> Option<Period> {
        self.periods.last().copied()
    }

    /// Rows of a single period, in metric then entity order.
    pub fn snapshot(&self, period: Period) -> Vec<&ComparisonRow> {
        self.rows.iter().filter(|row| row.period == period).collect()
    }

    /// Whether only one entity is compared. The percent-difference column is
    /// trivially zero in that case and should not be displayed.
    pub const fn is_self_comparison(&self) -> bool {
        self.entities.len() == 1
    }
}
