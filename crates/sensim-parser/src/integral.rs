//! Reader for the integral-index tables of the reference tool's output.
//!
//! The output holds one table per application:
//!
//! ```text
//!  Integral Values for Application #   1
//!  --------------------------------------
//!  Experiment  Type  Value  s.d.  c(k)  s.d.  E  s.d.  E(fis)  s.d.  E(cap)  s.d.  E(sct)  s.d.
//!  ----------  ----  -----  ----  ----  ----  -  ----  ------  ----  ------  ----  ------  ----
//!     0  app-1  k  1.0000E+00 0.0000E+00 ...
//!     1  exp-1  k  ...
//! ```
//!
//! Each row is an experiment index, a filename, a type token and six
//! (value, s.d.) pairs. Row 0 repeats the application itself and is skipped,
//! so row 1 becomes experiment 0.

use std::path::Path;

use sensim_core::{IntegralIndexMatrix, Matrix, Quantity};

use crate::error::{Error, Result};
use crate::scan::{
    IN_MEMORY, file_label, is_dash_line, parse_real_line, parse_signed_int, read_text,
};

/// Marker that opens each application table.
pub const APPLICATION_MARKER: &str = "Integral Values for Application";

/// Column headings of every application table.
pub const TABLE_COLUMNS: [&str; 14] = [
    "Experiment",
    "Type",
    "Value",
    "s.d.",
    "c(k)",
    "s.d.",
    "E",
    "s.d.",
    "E(fis)",
    "s.d.",
    "E(cap)",
    "s.d.",
    "E(sct)",
    "s.d.",
];

const ROW_TOKENS: usize = 15;
const ROW_REALS: usize = 12;

/// c(k), E, E(fis), E(cap), E(sct) of one row. The leading `Value` pair is
/// not kept.
type IndexRow = [Quantity; 5];

struct ApplicationBlock {
    application: u32,
    rows: Vec<IndexRow>,
}

/// Parse reference output held in memory.
pub fn parse_integral_output(text: &str) -> Result<IntegralIndexMatrix> {
    parse_integral_output_named(text, IN_MEMORY)
}

/// Parse reference output, naming `file` in any error.
pub fn parse_integral_output_named(text: &str, file: &str) -> Result<IntegralIndexMatrix> {
    let lines: Vec<&str> = text.lines().collect();

    let mut blocks = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let Some(pos) = lines[i].find(APPLICATION_MARKER) else {
            i += 1;
            continue;
        };
        let application = parse_application_number(&lines[i][pos + APPLICATION_MARKER.len()..])
            .ok_or_else(|| {
                Error::format(
                    file,
                    format!("line {}: expected '# <n>' after '{}'", i + 1, APPLICATION_MARKER),
                )
            })?;
        let (rows, next) = parse_block(&lines, i + 1, application, file)?;
        blocks.push(ApplicationBlock { application, rows });
        i = next;
    }

    if blocks.is_empty() {
        return Err(Error::format(
            file,
            format!("no '{}' block found", APPLICATION_MARKER),
        ));
    }

    blocks.sort_by_key(|b| b.application);
    if let Some(pair) = blocks.windows(2).find(|w| w[0].application == w[1].application) {
        return Err(Error::format(
            file,
            format!("application #{} appears more than once", pair[0].application),
        ));
    }

    let num_experiments = blocks[0].rows.len();
    if let Some(block) = blocks.iter().find(|b| b.rows.len() != num_experiments) {
        return Err(Error::ShapeMismatch {
            file: file.to_string(),
            application: block.application,
            expected: num_experiments,
            actual: block.rows.len(),
        });
    }

    log::debug!(
        "{}: {} applications x {} experiments",
        file,
        blocks.len(),
        num_experiments
    );

    let column = |k: usize| -> Result<Matrix<Quantity>> {
        let columns: Vec<Vec<Quantity>> = blocks
            .iter()
            .map(|b| b.rows.iter().map(|row| row[k].clone()).collect())
            .collect();
        Ok(Matrix::from_columns(columns)?)
    };
    Ok(IntegralIndexMatrix::new(
        column(0)?,
        column(1)?,
        column(2)?,
        column(3)?,
        column(4)?,
    )?)
}

/// Read and parse a reference output file.
pub fn read_integral_output(path: impl AsRef<Path>) -> Result<IntegralIndexMatrix> {
    let path = path.as_ref();
    let text = read_text(path)?;
    parse_integral_output_named(&text, &file_label(path))
}

fn parse_application_number(rest: &str) -> Option<u32> {
    rest.trim_start()
        .strip_prefix('#')?
        .split_whitespace()
        .next()?
        .parse()
        .ok()
}

fn next_non_blank(lines: &[&str], mut i: usize) -> usize {
    while i < lines.len() && lines[i].trim().is_empty() {
        i += 1;
    }
    i
}

/// Parse the table following an application header. Returns the rows with
/// row 0 removed and the index of the first line after the table.
fn parse_block(
    lines: &[&str],
    start: usize,
    application: u32,
    file: &str,
) -> Result<(Vec<IndexRow>, usize)> {
    let missing = |what: &str| {
        Error::format(
            file,
            format!("application #{}: {} not found", application, what),
        )
    };

    let mut i = next_non_blank(lines, start);
    if !lines.get(i).is_some_and(|l| is_dash_line(l)) {
        return Err(missing("dashed line under the block header"));
    }

    i = next_non_blank(lines, i + 1);
    let header_ok = lines
        .get(i)
        .is_some_and(|l| l.split_whitespace().eq(TABLE_COLUMNS.iter().copied()));
    if !header_ok {
        return Err(missing("table header"));
    }

    i = next_non_blank(lines, i + 1);
    if !lines.get(i).is_some_and(|l| is_dash_line(l)) {
        return Err(missing("dashed line under the table header"));
    }

    let mut rows = Vec::new();
    while i < lines.len() {
        let line = lines[i];
        if line.trim().is_empty() || is_dash_line(line) {
            i += 1;
            continue;
        }
        match parse_row(line, i, file)? {
            Some(row) => rows.push(row),
            None => break,
        }
        i += 1;
    }

    if rows.is_empty() {
        return Err(missing("data rows"));
    }
    rows.remove(0);
    Ok((rows, i))
}

/// `Ok(None)` for a line that ends the table.
fn parse_row(line: &str, index: usize, file: &str) -> Result<Option<IndexRow>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < ROW_TOKENS || tokens.first().and_then(|t| parse_signed_int(t)).is_none() {
        return Ok(None);
    }

    let reals = parse_real_line(&tokens[tokens.len() - ROW_REALS..].join(" "));
    let Some(reals) = reals else {
        return Ok(None);
    };

    if tokens.len() > ROW_TOKENS {
        return Err(Error::format(
            file,
            format!(
                "line {}: filename contains whitespace; sanitise SDF titles before running the reference tool",
                index + 1
            ),
        ));
    }
    if !tokens[2].chars().all(|c| c.is_ascii_alphabetic()) {
        return Ok(None);
    }

    let pair = |k: usize| Quantity::new(reals[2 * k], reals[2 * k + 1]);
    Ok(Some([pair(1), pair(2), pair(3), pair(4), pair(5)]))
}
