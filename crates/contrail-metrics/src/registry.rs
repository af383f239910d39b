//! Metric Registry
//!
//! Central lookup table for every metric the engine knows about. Each entry
//! carries the metric's unit class, its display scale and, for derived metrics,
//! the formula used to compute it. The deriver and the aligner both consult
//! this table instead of matching on metric names.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::MetricsError;

/// Every metric known to the registry, in canonical display order.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Metric {
    /// Total operating revenue
    #[display("Total Revenue")]
    #[serde(rename = "Total Revenue")]
    TotalRevenue,
    /// Passenger revenue
    #[display("Passenger Revenue")]
    #[serde(rename = "Passenger Revenue")]
    PassengerRevenue,
    /// Total operating expenses
    #[display("Total Expenses")]
    #[serde(rename = "Total Expenses")]
    TotalExpenses,
    /// Operating income
    #[display("Operating Income")]
    #[serde(rename = "Operating Income")]
    OperatingIncome,
    /// Net income
    #[display("Net Income")]
    #[serde(rename = "Net Income")]
    NetIncome,
    /// Revenue passenger miles
    #[display("RPM")]
    #[serde(rename = "RPM")]
    Rpm,
    /// Available seat miles
    #[display("ASM")]
    #[serde(rename = "ASM")]
    Asm,
    /// Long-term debt net of current maturities
    #[display("Long-Term Debt")]
    #[serde(rename = "Long-Term Debt")]
    LongTermDebt,
    /// Employee profit sharing
    #[display("Profit Sharing")]
    #[serde(rename = "Profit Sharing")]
    ProfitSharing,
    /// Operating margin (%)
    #[display("Operating Margin")]
    #[serde(rename = "Operating Margin")]
    OperatingMargin,
    /// Net margin (%)
    #[display("Net Margin")]
    #[serde(rename = "Net Margin")]
    NetMargin,
    /// Load factor (%)
    #[display("Load Factor")]
    #[serde(rename = "Load Factor")]
    LoadFactor,
    /// Passenger yield
    #[display("Yield")]
    #[serde(rename = "Yield")]
    Yield,
    /// Total revenue per available seat mile
    #[display("TRASM")]
    #[serde(rename = "TRASM")]
    Trasm,
    /// Passenger revenue per available seat mile
    #[display("PRASM")]
    #[serde(rename = "PRASM")]
    Prasm,
    /// Cost per available seat mile
    #[display("CASM")]
    #[serde(rename = "CASM")]
    Casm,
}

impl Metric {
    /// All metrics in registry order.
    pub const ALL: [Self; 16] = [
        Self::TotalRevenue,
        Self::PassengerRevenue,
        Self::TotalExpenses,
        Self::OperatingIncome,
        Self::NetIncome,
        Self::Rpm,
        Self::Asm,
        Self::LongTermDebt,
        Self::ProfitSharing,
        Self::OperatingMargin,
        Self::NetMargin,
        Self::LoadFactor,
        Self::Yield,
        Self::Trasm,
        Self::Prasm,
        Self::Casm,
    ];

    /// Canonical name.
    pub fn name(&self) -> &'static str {
        self.info().name
    }

    /// Registry entry for this metric.
    pub fn info(&self) -> &'static MetricInfo {
        &REGISTRY[*self as usize]
    }

    /// Unit class of this metric.
    pub fn unit(&self) -> UnitClass {
        self.info().unit
    }

    /// Whether the metric is computed rather than reported.
    pub fn is_derived(&self) -> bool {
        self.info().formula.is_some()
    }

    /// Display label after applying the unit class's display scale.
    pub fn display_label(&self) -> String {
        self.unit().scale().label(self.name())
    }
}

impl FromStr for Metric {
    type Err = MetricsError;

    /// Matches canonical names and column aliases, ignoring case and a
    /// trailing `" (millions)"` display suffix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let base = trimmed
            .strip_suffix(DisplayScale::MILLIONS_SUFFIX)
            .unwrap_or(trimmed);

        REGISTRY
            .iter()
            .find(|info| {
                info.name.eq_ignore_ascii_case(base)
                    || info.aliases.iter().any(|a| a.eq_ignore_ascii_case(base))
            })
            .map(|info| info.metric)
            .ok_or_else(|| MetricsError::UnknownMetric(s.to_string()))
    }
}

/// Unit class of a metric, used to pick display scaling and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitClass {
    /// Absolute currency amount in dollars
    Currency,
    /// Traffic volume (passenger or seat miles)
    Traffic,
    /// Currency per unit (dollars per mile)
    UnitCurrency,
    /// Percentage in 0-100 terms
    Percentage,
}

impl UnitClass {
    /// Display scale applied when a comparison is rescaled.
    pub const fn scale(&self) -> DisplayScale {
        match self {
            Self::Currency | Self::Traffic => DisplayScale::Millions,
            Self::UnitCurrency => DisplayScale::Cents,
            Self::Percentage => DisplayScale::Identity,
        }
    }
}

/// Display rescaling of a metric's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayScale {
    /// Value shown as reported
    Identity,
    /// Value divided by one million and relabelled `"<metric> (millions)"`
    Millions,
    /// Dollars converted to cents; label unchanged
    Cents,
}

impl DisplayScale {
    /// Label suffix for values shown in millions.
    pub const MILLIONS_SUFFIX: &'static str = " (millions)";

    /// Apply the scale to a value.
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Self::Identity => value,
            Self::Millions => value / 1_000_000.0,
            Self::Cents => value * 100.0,
        }
    }

    /// Label a metric name under this scale.
    pub fn label(&self, name: &str) -> String {
        match self {
            Self::Millions => format!("{name}{}", Self::MILLIONS_SUFFIX),
            Self::Identity | Self::Cents => name.to_string(),
        }
    }
}

/// Fixed arithmetic function of other metrics in the same observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formula {
    /// `minuend - subtrahend`
    Difference {
        /// Left operand
        minuend: Metric,
        /// Right operand
        subtrahend: Metric,
    },
    /// `numerator / denominator`, optionally as a percentage rounded to 2 dp
    Ratio {
        /// Dividend
        numerator: Metric,
        /// Divisor
        denominator: Metric,
        /// Multiply by 100 and round to two decimals
        percent: bool,
    },
}

impl Formula {
    /// Metrics this formula reads.
    pub const fn inputs(&self) -> [Metric; 2] {
        match *self {
            Self::Difference {
                minuend,
                subtrahend,
            } => [minuend, subtrahend],
            Self::Ratio {
                numerator,
                denominator,
                ..
            } => [numerator, denominator],
        }
    }

    /// Evaluate the formula. Missing inputs give `None`; a zero denominator
    /// gives a non-finite value rather than an error.
    pub fn evaluate(&self, lhs: Option<f64>, rhs: Option<f64>) -> Option<f64> {
        let (lhs, rhs) = (lhs?, rhs?);
        let value = match self {
            Self::Difference { .. } => lhs - rhs,
            Self::Ratio { percent: false, .. } => lhs / rhs,
            Self::Ratio { percent: true, .. } => round2(lhs / rhs * 100.0),
        };
        Some(value)
    }
}

/// Round to two decimals, ties to even. Non-finite values pass through.
pub fn round2(value: f64) -> f64 {
    if value.is_finite() {
        (value * 100.0).round_ties_even() / 100.0
    } else {
        value
    }
}

/// Preset groups of metrics.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricGroup {
    /// Every metric with data in the partition
    All,
    /// Revenue, income and margins
    Earnings,
    /// Yield and per-seat-mile metrics
    #[display("Unit Performance")]
    UnitPerformance,
}

impl MetricGroup {
    /// Fixed members of the group. `All` has no fixed list; it expands to the
    /// metrics available in a partition.
    pub fn members(&self) -> Option<&'static [Metric]> {
        match self {
            Self::All => None,
            Self::Earnings => Some(&[
                Metric::TotalRevenue,
                Metric::OperatingIncome,
                Metric::NetIncome,
                Metric::OperatingMargin,
                Metric::NetMargin,
            ]),
            Self::UnitPerformance => {
                Some(&[Metric::Yield, Metric::Trasm, Metric::Prasm, Metric::Casm])
            }
        }
    }
}

impl FromStr for MetricGroup {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "all" => Ok(Self::All),
            "earnings" => Ok(Self::Earnings),
            "unitperformance" | "unit" => Ok(Self::UnitPerformance),
            _ => Err(MetricsError::UnknownMetric(s.to_string())),
        }
    }
}

/// Metric metadata
#[derive(Debug, Clone)]
pub struct MetricInfo {
    /// Metric identifier
    pub metric: Metric,
    /// Canonical name (also the dataset column header)
    pub name: &'static str,
    /// Alternative column headers accepted on ingestion
    pub aliases: &'static [&'static str],
    /// Unit class
    pub unit: UnitClass,
    /// Formula for derived metrics; `None` for reported primitives
    pub formula: Option<Formula>,
    /// Brief definition
    pub description: &'static str,
}

const fn ratio(numerator: Metric, denominator: Metric, percent: bool) -> Option<Formula> {
    Some(Formula::Ratio {
        numerator,
        denominator,
        percent,
    })
}

/// Registry entries, indexed by `Metric as usize`. Derived entries appear
/// after every metric their formula reads.
static REGISTRY: [MetricInfo; 16] = [
    MetricInfo {
        metric: Metric::TotalRevenue,
        name: "Total Revenue",
        aliases: &["total_revenue", "Revenue"],
        unit: UnitClass::Currency,
        formula: None,
        description: "Total amount earned from operations.",
    },
    MetricInfo {
        metric: Metric::PassengerRevenue,
        name: "Passenger Revenue",
        aliases: &["passenger_revenue"],
        unit: UnitClass::Currency,
        formula: None,
        description: "Revenue from passenger ticket sales, loyalty travel awards and \
                      travel-related services performed in conjunction with a flight.",
    },
    MetricInfo {
        metric: Metric::TotalExpenses,
        name: "Total Expenses",
        aliases: &["total_expenses", "Expenses"],
        unit: UnitClass::Currency,
        formula: None,
        description: "Total amount of costs incurred from operations.",
    },
    MetricInfo {
        metric: Metric::OperatingIncome,
        name: "Operating Income",
        aliases: &["operating_income"],
        unit: UnitClass::Currency,
        formula: Some(Formula::Difference {
            minuend: Metric::TotalRevenue,
            subtrahend: Metric::TotalExpenses,
        }),
        description: "Income from operations. Total Revenue minus Total Expenses.",
    },
    MetricInfo {
        metric: Metric::NetIncome,
        name: "Net Income",
        aliases: &["net_income"],
        unit: UnitClass::Currency,
        formula: None,
        description: "Profit.",
    },
    MetricInfo {
        metric: Metric::Rpm,
        name: "RPM",
        aliases: &["Revenue Passenger Miles", "Revenue Passenger Mile (RPM)", "rpm"],
        unit: UnitClass::Traffic,
        formula: None,
        description: "Sales volume. One RPM is one passenger flown one mile.",
    },
    MetricInfo {
        metric: Metric::Asm,
        name: "ASM",
        aliases: &[
            "Available Seat Miles",
            "Available Seat Mile (ASM)",
            "Available Seat Miles (ASM)",
            "asm",
        ],
        unit: UnitClass::Traffic,
        formula: None,
        description: "Production. One ASM is one seat flown one mile.",
    },
    MetricInfo {
        metric: Metric::LongTermDebt,
        name: "Long-Term Debt",
        aliases: &["Long Term Debt", "long_term_debt"],
        unit: UnitClass::Currency,
        formula: None,
        description: "Total long-term debt net of current maturities. Reported annually.",
    },
    MetricInfo {
        metric: Metric::ProfitSharing,
        name: "Profit Sharing",
        aliases: &["profit_sharing"],
        unit: UnitClass::Currency,
        formula: None,
        description: "Income set aside to fund employee profit sharing programs.",
    },
    MetricInfo {
        metric: Metric::OperatingMargin,
        name: "Operating Margin",
        aliases: &["operating_margin"],
        unit: UnitClass::Percentage,
        formula: ratio(Metric::OperatingIncome, Metric::TotalRevenue, true),
        description: "Operating Income divided by Total Revenue.",
    },
    MetricInfo {
        metric: Metric::NetMargin,
        name: "Net Margin",
        aliases: &["net_margin"],
        unit: UnitClass::Percentage,
        formula: ratio(Metric::NetIncome, Metric::TotalRevenue, true),
        description: "Profit earned for each dollar of revenue. Net Income divided by Total Revenue.",
    },
    MetricInfo {
        metric: Metric::LoadFactor,
        name: "Load Factor",
        aliases: &["load_factor"],
        unit: UnitClass::Percentage,
        formula: ratio(Metric::Rpm, Metric::Asm, true),
        description: "Share of available seats filled with revenue passengers. RPMs divided by ASMs.",
    },
    MetricInfo {
        metric: Metric::Yield,
        name: "Yield",
        aliases: &["yield"],
        unit: UnitClass::UnitCurrency,
        formula: ratio(Metric::PassengerRevenue, Metric::Rpm, false),
        description: "Passenger Revenue divided by RPMs.",
    },
    MetricInfo {
        metric: Metric::Trasm,
        name: "TRASM",
        aliases: &["Total Revenue per Available Seat Mile (TRASM)", "trasm"],
        unit: UnitClass::UnitCurrency,
        formula: ratio(Metric::TotalRevenue, Metric::Asm, false),
        description: "Total Revenue divided by ASMs.",
    },
    MetricInfo {
        metric: Metric::Prasm,
        name: "PRASM",
        aliases: &["Passenger Revenue per Available Seat Mile (PRASM)", "prasm"],
        unit: UnitClass::UnitCurrency,
        formula: ratio(Metric::PassengerRevenue, Metric::Asm, false),
        description: "Passenger Revenue divided by ASMs.",
    },
    MetricInfo {
        metric: Metric::Casm,
        name: "CASM",
        aliases: &["Cost per Available Seat Mile (CASM)", "casm"],
        unit: UnitClass::UnitCurrency,
        formula: ratio(Metric::TotalExpenses, Metric::Asm, false),
        description: "Total Expenses divided by ASMs.",
    },
];

/// All registry entries in canonical order.
pub fn available_metrics() -> &'static [MetricInfo] {
    &REGISTRY
}

/// Reported (primitive) metrics.
pub fn primitive_metrics() -> Vec<Metric> {
    REGISTRY
        .iter()
        .filter(|info| info.formula.is_none())
        .map(|info| info.metric)
        .collect()
}

/// Derived metrics in evaluation order.
pub fn derived_metrics() -> Vec<Metric> {
    REGISTRY
        .iter()
        .filter(|info| info.formula.is_some())
        .map(|info| info.metric)
        .collect()
}

/// Look up a registry entry by canonical name or alias.
pub fn get_metric_info(name: &str) -> Option<&'static MetricInfo> {
    name.parse::<Metric>().ok().map(|metric| metric.info())
}

/// Map of canonical name to registry entry.
pub fn metric_map() -> HashMap<&'static str, &'static MetricInfo> {
    REGISTRY.iter().map(|info| (info.name, info)).collect()
}

/// Metrics sharing a unit class.
pub fn metrics_by_unit(unit: UnitClass) -> Vec<Metric> {
    REGISTRY
        .iter()
        .filter(|info| info.unit == unit)
        .map(|info| info.metric)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_registry_indexed_by_discriminant() {
        for (idx, info) in REGISTRY.iter().enumerate() {
            assert_eq!(info.metric as usize, idx, "{} is out of place", info.name);
            assert_eq!(Metric::ALL[idx], info.metric);
            assert_eq!(info.metric.to_string(), info.name);
        }
    }

    #[test]
    fn test_formulas_read_only_earlier_metrics() {
        for info in available_metrics() {
            if let Some(formula) = info.formula {
                for input in formula.inputs() {
                    assert!(
                        (input as usize) < (info.metric as usize),
                        "{} reads {} before it is available",
                        info.name,
                        input
                    );
                }
            }
        }
    }

    #[test]
    fn test_primitive_and_derived_split() {
        assert_eq!(primitive_metrics().len(), 8);
        assert_eq!(derived_metrics().len(), 8);
        assert_eq!(derived_metrics()[0], Metric::OperatingIncome);
    }

    #[rstest]
    #[case("Total Revenue", Metric::TotalRevenue)]
    #[case("total revenue", Metric::TotalRevenue)]
    #[case("Total Revenue (millions)", Metric::TotalRevenue)]
    #[case("Available Seat Miles (ASM)", Metric::Asm)]
    #[case("Long Term Debt", Metric::LongTermDebt)]
    #[case("casm", Metric::Casm)]
    fn test_parse_metric(#[case] name: &str, #[case] expected: Metric) {
        assert_eq!(name.parse::<Metric>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_metric() {
        assert_eq!(
            "EBITDA".parse::<Metric>(),
            Err(MetricsError::UnknownMetric("EBITDA".to_string()))
        );
        assert!(get_metric_info("EBITDA").is_none());
    }

    #[test]
    fn test_display_labels_follow_scale() {
        assert_eq!(Metric::TotalRevenue.display_label(), "Total Revenue (millions)");
        assert_eq!(Metric::Asm.display_label(), "ASM (millions)");
        assert_eq!(Metric::Casm.display_label(), "CASM");
        assert_eq!(Metric::NetMargin.display_label(), "Net Margin");
    }

    #[test]
    fn test_display_scale_apply() {
        assert_relative_eq!(
            DisplayScale::Millions.apply(52_788_000_000.0),
            52_788.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(DisplayScale::Cents.apply(0.1934), 19.34, epsilon = 1e-9);
        assert_relative_eq!(DisplayScale::Identity.apply(8.5), 8.5);
    }

    #[test]
    fn test_formula_evaluation() {
        let margin = Metric::NetMargin.info().formula.unwrap();
        assert_eq!(margin.evaluate(Some(18.0), Some(120.0)), Some(15.0));
        assert_eq!(margin.evaluate(None, Some(120.0)), None);
        assert_eq!(margin.evaluate(Some(1.0), Some(3.0)), Some(33.33));

        let income = Metric::OperatingIncome.info().formula.unwrap();
        assert_eq!(income.evaluate(Some(100.0), Some(120.0)), Some(-20.0));
    }

    #[test]
    fn test_division_by_zero_is_non_finite() {
        let casm = Metric::Casm.info().formula.unwrap();
        assert_eq!(casm.evaluate(Some(5.0), Some(0.0)), Some(f64::INFINITY));
        assert!(casm.evaluate(Some(0.0), Some(0.0)).unwrap().is_nan());

        let load_factor = Metric::LoadFactor.info().formula.unwrap();
        assert_eq!(
            load_factor.evaluate(Some(-1.0), Some(0.0)),
            Some(f64::NEG_INFINITY)
        );
    }

    #[test]
    fn test_metric_groups() {
        assert!(MetricGroup::All.members().is_none());
        assert_eq!(MetricGroup::Earnings.members().unwrap().len(), 5);
        assert_eq!(
            MetricGroup::UnitPerformance.members().unwrap(),
            &[Metric::Yield, Metric::Trasm, Metric::Prasm, Metric::Casm]
        );
        assert_eq!(
            "unit-performance".parse::<MetricGroup>().unwrap(),
            MetricGroup::UnitPerformance
        );
    }

    #[test]
    fn test_metrics_by_unit() {
        assert_eq!(metrics_by_unit(UnitClass::Traffic), [Metric::Rpm, Metric::Asm]);
        assert_eq!(metrics_by_unit(UnitClass::Percentage).len(), 3);
        assert_eq!(metric_map().len(), 16);
    }

    #[test]
    fn test_round2() {
        assert_relative_eq!(round2(233.333_333), 233.33, epsilon = 1e-9);
        assert_relative_eq!(round2(-12.345_6), -12.35, epsilon = 1e-9);
        assert!(round2(f64::NAN).is_nan());
        assert_eq!(round2(f64::INFINITY), f64::INFINITY);
    }

    #[rstest]
    #[case(0.125, 0.12)]
    #[case(0.375, 0.38)]
    #[case(-0.125, -0.12)]
    #[case(2.5, 2.5)]
    fn test_round2_ties_to_even(#[case] value: f64, #[case] expected: f64) {
        assert_eq!(round2(value), expected);
    }

    #[test]
    fn test_percent_formula_rounds_ties_to_even() {
        let formula = Metric::NetMargin.info().formula.unwrap();
        // Net income 1 on revenue 800 is exactly 0.125%
        assert_eq!(formula.evaluate(Some(1.0), Some(800.0)), Some(0.12));
    }
}
