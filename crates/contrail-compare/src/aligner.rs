//! Period/entity alignment.
//!
//! Every selected entity's series is reindexed onto the union of periods the
//! filtered data observes, so an entity missing a period still gets a row with
//! a null value. Percent differences are taken pointwise against the base
//! entity's reindexed series.

use contrail_metrics::{DisplayScale, Metric, Observation, PartitionData, Period};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::error::Result;
use crate::pct_diff::pct_diff;
use crate::selection::Selection;
use crate::table::{ComparisonRow, ComparisonTable};

type Index<'a> = HashMap<(&'a str, Period), &'a Observation>;

/// Align a partition under a selection.
///
/// The output covers (selected metrics) x (selected entities) x (periods
/// present after filtering), each exactly once. Calling it twice with the same
/// inputs gives the same table.
///
/// # Errors
///
/// Fails when the selection is out of the partition's domain.
pub fn align(data: &PartitionData, selection: &Selection) -> Result<ComparisonTable> {
    selection.validate_against(data)?;

    let index: Index<'_> = data
        .observations()
        .iter()
        .filter(|obs| {
            selection.entities().contains(&obs.entity)
                && selection.years().contains(&obs.year())
                && selection.quarters().contains(&obs.quarter())
        })
        .map(|obs| ((obs.entity.as_str(), obs.period), obs))
        .collect();

    let periods: Vec<Period> = index
        .keys()
        .map(|(_, period)| *period)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut rows =
        Vec::with_capacity(selection.metrics().len() * selection.entities().len() * periods.len());

    for &metric in selection.metrics() {
        let scale = if selection.rescale() {
            metric.unit().scale()
        } else {
            DisplayScale::Identity
        };
        let label = scale.label(metric.name());
        let base_series = series(&index, selection.base(), metric, scale, &periods);

        for entity in selection.entities() {
            let entity_series = series(&index, entity, metric, scale, &periods);
            for ((period, value), base) in periods.iter().zip(entity_series).zip(&base_series) {
                rows.push(ComparisonRow {
                    period: *period,
                    entity: entity.clone(),
                    metric,
                    label: label.clone(),
                    scale,
                    value,
                    percent_difference: pct_diff(*base, value),
                });
            }
        }
    }

    debug!(
        base = selection.base(),
        entities = selection.entities().len(),
        periods = periods.len(),
        metrics = selection.metrics().len(),
        rows = rows.len(),
        "Aligned comparison"
    );

    Ok(ComparisonTable::new(
        selection.base().to_string(),
        selection.entities().to_vec(),
        periods,
        selection.metrics().to_vec(),
        rows,
    ))
}

/// One entity's scaled values for `metric`, reindexed onto `periods`.
fn series(
    index: &Index<'_>,
    entity: &str,
    metric: Metric,
    scale: DisplayScale,
    periods: &[Period],
) -> Vec<Option<f64>> {
    periods
        .iter()
        .map(|period| {
            index
                .get(&(entity, *period))
                .and_then(|obs| obs.value(metric))
                .map(|v| scale.apply(v))
        })
        .collect()
}
