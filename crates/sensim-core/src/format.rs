//! Scientific-notation formatting shared by reports and SDF rendering.

use crate::quantity::Quantity;

/// Format a value in scientific notation with a signed two-digit exponent.
///
/// `format_sci(1234.5, 3)` gives `1.234E+03`. Non-finite values render as
/// `NAN`, `INF` or `-INF`.
pub fn format_sci(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "NAN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "INF" } else { "-INF" }.to_string();
    }

    let raw = format!("{:.*E}", precision, value);
    // Rust writes the exponent as `E3` / `E-3`
    match raw.split_once('E') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exponent),
            };
            format!("{mantissa}E{sign}{digits:0>2}")
        }
        None => raw,
    }
}

/// Format an uncertain value as `nominal+/-uncertainty`.
pub fn format_quantity(value: &Quantity, precision: usize, uncertainty_precision: usize) -> String {
    format!(
        "{}+/-{}",
        format_sci(value.nominal(), precision),
        format_sci(value.uncertainty(), uncertainty_precision)
    )
}

/// Format a value in fixed notation for SDF output, e.g. ` 1.234567E-02`.
///
/// Positive numbers get a leading space so columns line up with negatives.
pub fn format_sdf_real(value: f64) -> String {
    let s = format_sci(value, 6);
    if s.starts_with('-') {
        s
    } else {
        format!(" {s}")
    }
}
