//! Annotated-name clean-up.
//!
//! The reference tool prints each SDF title as a single filename token in its
//! output tables, so titles with embedded whitespace make those rows
//! unparseable. Sanitising the title before the reference run avoids that.

use std::path::Path;

use crate::error::{Error, Result};
use crate::scan::read_text;

/// Replace every whitespace run in the first line with `-`. Other lines are
/// returned unchanged.
pub fn sanitize_title(text: &str) -> String {
    let (first, rest) = match text.find('\n') {
        Some(pos) => text.split_at(pos),
        None => (text, ""),
    };
    let (first, cr) = match first.strip_suffix('\r') {
        Some(line) => (line, "\r"),
        None => (first, ""),
    };
    let title = first.split_whitespace().collect::<Vec<_>>().join("-");
    format!("{title}{cr}{rest}")
}

/// Write a copy of an SDF file with a sanitised title.
pub fn sanitize_sdf_file(source: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<()> {
    let text = read_text(source.as_ref())?;
    let dest = dest.as_ref();
    std::fs::write(dest, sanitize_title(&text)).map_err(|source| Error::Io {
        path: dest.to_path_buf(),
        source,
    })?;
    log::debug!("wrote sanitised SDF to {}", dest.display());
    Ok(())
}
