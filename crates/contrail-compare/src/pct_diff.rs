//! Percent-difference policy.
//!
//! Expresses a comparison value relative to a base value:
//!
//! - either side missing or non-finite: `None`
//! - base of zero: `+inf` for any nonzero comparison, `0` when both are zero
//! - otherwise `round2(|(comparison - base) / base| * 100)`, signed by the
//!   direction of change
//!
//! The sign is assigned after rounding the magnitude rather than inherited
//! from the raw ratio, which would flip it whenever the base is negative.

use contrail_metrics::round2;

/// Signed percent difference of `comparison` against `base`.
///
/// # Examples
///
/// ```
/// use contrail_compare::pct_diff;
///
/// assert_eq!(pct_diff(Some(100.0), Some(150.0)), Some(50.0));
/// assert_eq!(pct_diff(Some(-100.0), Some(50.0)), Some(150.0));
/// assert_eq!(pct_diff(Some(0.0), Some(5.0)), Some(f64::INFINITY));
/// assert_eq!(pct_diff(None, Some(5.0)), None);
/// ```
pub fn pct_diff(base: Option<f64>, comparison: Option<f64>) -> Option<f64> {
    let base = base.filter(|v| v.is_finite())?;
    let comparison = comparison.filter(|v| v.is_finite())?;

    if base == 0.0 {
        return Some(if comparison == 0.0 { 0.0 } else { f64::INFINITY });
    }

    let magnitude = round2(((comparison - base) / base).abs() * 100.0);
    Some(direction(base, comparison) * magnitude)
}

/// `+1.0` for an increase (or no change), `-1.0` for a decrease. A move
/// across zero takes the direction of the crossing.
fn direction(base: f64, comparison: f64) -> f64 {
    if base < 0.0 && comparison > 0.0 {
        1.0
    } else if base > 0.0 && comparison < 0.0 || base > comparison {
        -1.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(100.0, 150.0, 50.0)]
    #[case(100.0, 50.0, -50.0)]
    #[case(-100.0, 50.0, 150.0)]
    #[case(50.0, -100.0, -300.0)]
    #[case(3.0, 10.0, 233.33)]
    #[case(10.0, 15.0, 50.0)]
    #[case(-100.0, -50.0, 50.0)]
    #[case(-50.0, -100.0, -100.0)]
    #[case(42.0, 42.0, 0.0)]
    #[case(400.0, 400.5, 0.12)]
    #[case(400.0, 399.5, -0.12)]
    fn test_pct_diff(#[case] base: f64, #[case] comparison: f64, #[case] expected: f64) {
        let actual = pct_diff(Some(base), Some(comparison)).unwrap();
        assert_relative_eq!(actual, expected, epsilon = 1e-9);
    }

    #[rstest]
    #[case(None, Some(1.0))]
    #[case(Some(1.0), None)]
    #[case(None, None)]
    #[case(Some(f64::NAN), Some(1.0))]
    #[case(Some(1.0), Some(f64::NAN))]
    #[case(Some(f64::INFINITY), Some(1.0))]
    fn test_missing_propagates(#[case] base: Option<f64>, #[case] comparison: Option<f64>) {
        assert_eq!(pct_diff(base, comparison), None);
    }

    #[test]
    fn test_zero_base() {
        assert_eq!(pct_diff(Some(0.0), Some(0.0)), Some(0.0));
        assert_eq!(pct_diff(Some(0.0), Some(7.5)), Some(f64::INFINITY));
        assert_eq!(pct_diff(Some(0.0), Some(-7.5)), Some(f64::INFINITY));
        assert_eq!(pct_diff(Some(-0.0), Some(0.0)), Some(0.0));
    }

    #[test]
    fn test_sign_follows_direction() {
        for (base, comparison) in [(1.0, 2.0), (-3.0, 4.0), (-4.0, -3.0), (2.0, 9.5)] {
            assert!(pct_diff(Some(base), Some(comparison)).unwrap() > 0.0);
        }
        for (base, comparison) in [(2.0, 1.0), (4.0, -3.0), (-3.0, -4.0)] {
            assert!(pct_diff(Some(base), Some(comparison)).unwrap() < 0.0);
        }
    }
}
