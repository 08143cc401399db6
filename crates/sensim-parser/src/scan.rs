//! Token classification shared by the SDF and reference-output parsers.
//!
//! Both formats are whitespace separated, so parsing works on
//! `split_whitespace` tokens and these predicates decide what each token is.

use std::path::Path;

use crate::error::{Error, Result};

/// Label used in errors for text that did not come from a file.
pub const IN_MEMORY: &str = "<memory>";

/// Parse a real number written with a decimal point or an exponent.
///
/// Accepts `1.5`, `.5`, `-2.`, `1.0E-03`, `3e5`; rejects bare integers such
/// as `92235` so that integer columns are never mistaken for data.
pub fn parse_sci_real(token: &str) -> Option<f64> {
    let bytes = token.as_bytes();
    let mut pos = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos += 1;
    }

    let int_digits = count_digits(&bytes[pos..]);
    pos += int_digits;

    let mut frac_digits = 0;
    let has_point = bytes.get(pos) == Some(&b'.');
    if has_point {
        pos += 1;
        frac_digits = count_digits(&bytes[pos..]);
        pos += frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    let mut has_exponent = false;
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp_pos = pos + 1;
        if matches!(bytes.get(exp_pos), Some(b'+' | b'-')) {
            exp_pos += 1;
        }
        let exp_digits = count_digits(&bytes[exp_pos.min(bytes.len())..]);
        if exp_digits == 0 {
            return None;
        }
        pos = exp_pos + exp_digits;
        has_exponent = true;
    }

    if pos != bytes.len() || !(has_point || has_exponent) {
        return None;
    }
    token.parse().ok()
}

/// Parse an optionally signed integer.
pub fn parse_signed_int(token: &str) -> Option<i64> {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Parse an unsigned integer of at most `max_digits` digits.
pub fn parse_bounded_uint(token: &str, max_digits: usize) -> Option<u32> {
    if token.is_empty() || token.len() > max_digits || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Nuclide names: lowercase element symbol, a dash, the mass number and an
/// optional isomer letter (`h-1`, `u-235`, `am-242m`).
pub fn is_isotope_name(token: &str) -> bool {
    let Some((element, mass)) = token.split_once('-') else {
        return false;
    };
    if element.is_empty() || !element.bytes().all(|b| b.is_ascii_lowercase()) {
        return false;
    }
    let mass = mass.strip_suffix(|c: char| c.is_ascii_lowercase()).unwrap_or(mass);
    !mass.is_empty() && mass.bytes().all(|b| b.is_ascii_digit())
}

/// Reaction names: alphanumerics plus `,` and `'` (`fission`, `n,gamma`, `n,n'`).
pub fn is_reaction_name(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ',' || c == '\'')
}

/// A line made only of dash runs, e.g. `-----  ----  -----`.
pub fn is_dash_line(line: &str) -> bool {
    let mut runs = line.split_whitespace().peekable();
    runs.peek().is_some() && runs.all(|run| run.bytes().all(|b| b == b'-'))
}

/// Parse every token of a line as a real, or `None` if any token is not one.
pub fn parse_real_line(line: &str) -> Option<Vec<f64>> {
    line.split_whitespace().map(parse_sci_real).collect()
}

/// Read a whole file, attaching the path to any I/O error.
pub(crate) fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Label for error messages.
pub(crate) fn file_label(path: &Path) -> String {
    path.display().to_string()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
