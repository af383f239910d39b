//! Metric derivation.
//!
//! Adds every derived metric from the registry to each observation. Formulas
//! only read values of the same observation, and are evaluated in registry
//! order so a derived metric may feed a later one.

use tracing::{debug, trace};

use crate::observation::{Dataset, DerivedDataset, Observation};
use crate::registry::{Formula, Metric, derived_metrics};

/// Computes derived metrics for a dataset.
///
/// Derivation is pure: the input dataset is never modified and the output
/// has exactly the same observations with the derived values added.
#[derive(Debug, Clone)]
pub struct MetricDeriver {
    formulas: Vec<(Metric, Formula)>,
}

impl Default for MetricDeriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricDeriver {
    /// Deriver for every derived metric in the registry.
    pub fn new() -> Self {
        let formulas = derived_metrics()
            .into_iter()
            .filter_map(|metric| metric.info().formula.map(|formula| (metric, formula)))
            .collect();
        Self { formulas }
    }

    /// Metrics this deriver produces, in evaluation order.
    pub fn outputs(&self) -> impl Iterator<Item = Metric> + '_ {
        self.formulas.iter().map(|(metric, _)| *metric)
    }

    /// Derive metrics for one observation.
    ///
    /// A formula with a missing input leaves its output missing. Division by
    /// zero yields a non-finite value which is kept as-is.
    pub fn derive_observation(&self, raw: &Observation) -> Observation {
        let mut derived = raw.clone();
        for (metric, formula) in &self.formulas {
            let [lhs, rhs] = formula.inputs();
            let value = formula.evaluate(derived.value(lhs), derived.value(rhs));
            if let Some(v) = value
                && !v.is_finite()
            {
                trace!(
                    entity = %derived.entity,
                    period = %derived.period,
                    metric = %metric,
                    "derived value is not finite"
                );
            }
            derived.set(*metric, value);
        }
        derived
    }

    /// Derive metrics for every observation in the dataset.
    pub fn derive(&self, dataset: &Dataset) -> DerivedDataset {
        let observations: Vec<Observation> = dataset
            .observations()
            .iter()
            .map(|obs| self.derive_observation(obs))
            .collect();

        debug!(
            observations = observations.len(),
            metrics = self.formulas.len(),
            "Derived metrics"
        );

        DerivedDataset::from_derived(observations)
    }
}
