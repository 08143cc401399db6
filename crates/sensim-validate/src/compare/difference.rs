//! Relative differences between computed and reference values.

/// `|calculated - reference| / reference`.
///
/// Plain IEEE division: a negative reference gives a negative result, a
/// nonzero value against a zero reference is infinite, and 0/0 or NaN in
/// either input is NaN.
pub fn relative_difference(calculated: f64, reference: f64) -> f64 {
    (calculated - reference).abs() / reference
}

/// Largest finite magnitude, or `None` if there is none.
pub fn max_abs_finite(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .map(f64::abs)
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
}
