//! Display formatting for comparison values.
//!
//! Values are formatted according to their metric's unit class and the scale
//! applied by the aligner. Missing values render as a caller-chosen
//! placeholder. NaN and infinities come from degenerate derivations and
//! render as `n/a`, `∞` and `-∞` so they are never mistaken for absence.

use contrail_compare::ComparisonRow;
use contrail_metrics::{DisplayScale, UnitClass};

/// Placeholder for missing values in regular tables.
pub const EMPTY: &str = "";

/// Placeholder for values not yet reported in the latest-results view.
pub const NOT_YET_REPORTED: &str = "TBA";

/// Group the integer digits of `value` in thousands, with `decimals`
/// fractional digits.
///
/// # Example
/// ```
/// use contrail_output::format::format_number;
///
/// assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
/// assert_eq!(format_number(-1234.0, 0), "-1,234");
/// ```
pub fn format_number(value: f64, decimals: usize) -> String {
    let digits = format!("{:.decimals$}", value.abs());
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + int_part.len() / 3 + 1);
    if value < 0.0 && digits.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Dollar amount. Integral amounts drop the cents.
///
/// # Example
/// ```
/// use contrail_output::format::format_currency;
///
/// assert_eq!(format_currency(1234.0), "$1,234");
/// assert_eq!(format_currency(1234.5), "$1,234.50");
/// assert_eq!(format_currency(-822.0), "-$822");
/// ```
pub fn format_currency(value: f64) -> String {
    let decimals = if value.fract() == 0.0 { 0 } else { 2 };
    let digits = format_number(value, decimals);
    digits
        .strip_prefix('-')
        .map_or_else(|| format!("${digits}"), |abs| format!("-${abs}"))
}

fn non_finite(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("n/a")
    } else if value == f64::INFINITY {
        Some("∞")
    } else if value == f64::NEG_INFINITY {
        Some("-∞")
    } else {
        None
    }
}

/// Format a metric value of the given unit class and display scale.
pub fn format_value(
    unit: UnitClass,
    scale: DisplayScale,
    value: Option<f64>,
    placeholder: &str,
) -> String {
    let Some(value) = value else {
        return placeholder.to_string();
    };
    if let Some(marker) = non_finite(value) {
        return marker.to_string();
    }

    match (unit, scale) {
        (UnitClass::Currency, _) => format_currency(value),
        (UnitClass::UnitCurrency, DisplayScale::Cents) => format!("{}¢", format_number(value, 2)),
        // Unscaled unit revenue and cost stay in dollars per mile
        (UnitClass::UnitCurrency, _) => {
            let sign = if value < 0.0 { "-" } else { "" };
            format!("{sign}${}", format_number(value.abs(), 4))
        }
        (UnitClass::Percentage, _) => format!("{}%", format_number(value, 2)),
        (UnitClass::Traffic, _) => format_number(value, 0),
    }
}

/// Format a row's value using its metric and scale.
pub fn format_row_value(row: &ComparisonRow, placeholder: &str) -> String {
    format_value(row.metric.unit(), row.scale, row.value, placeholder)
}

/// Format a percent difference with an explicit sign.
///
/// # Example
/// ```
/// use contrail_output::format::format_percent_difference;
///
/// assert_eq!(format_percent_difference(Some(50.0), ""), "+50.00%");
/// assert_eq!(format_percent_difference(Some(0.0), ""), "0.00%");
/// assert_eq!(format_percent_difference(Some(f64::INFINITY), ""), "∞");
/// assert_eq!(format_percent_difference(None, "TBA"), "TBA");
/// ```
pub fn format_percent_difference(value: Option<f64>, placeholder: &str) -> String {
    let Some(value) = value else {
        return placeholder.to_string();
    };
    if let Some(marker) = non_finite(value) {
        return marker.to_string();
    }

    let formatted = format_number(value, 2);
    if value > 0.0 && formatted != "0.00" {
        format!("+{formatted}%")
    } else {
        format!("{formatted}%")
    }
}
