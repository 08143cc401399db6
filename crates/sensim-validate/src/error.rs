//! Error types for the validation crate.

use std::path::PathBuf;

use sensim_core::EType;
use thiserror::Error;

/// Result type for validation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during validation.
#[derive(Debug, Error)]
pub enum Error {
    /// An SDF file or the reference output could not be parsed.
    #[error(transparent)]
    Parse(#[from] sensim_parser::Error),

    /// Computing E failed.
    #[error(transparent)]
    Similarity(#[from] sensim_similarity::Error),

    /// Computed and reference matrices disagree in shape.
    #[error(
        "E ({e_type}): computed matrix is {computed_rows}x{computed_cols}, reference is {reference_rows}x{reference_cols}"
    )]
    ShapeMismatch {
        e_type: EType,
        computed_rows: usize,
        computed_cols: usize,
        reference_rows: usize,
        reference_cols: usize,
    },

    #[error(transparent)]
    Core(#[from] sensim_core::Error),

    /// A configuration file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file not found.
    #[error("config file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// Configuration parsed but is unusable.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
