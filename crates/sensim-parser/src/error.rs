//! Error types for sensim-parser.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A required marker, header or table could not be located or parsed.
    #[error("{file}: {message}")]
    Format { file: String, message: String },

    /// Application blocks of a reference output disagree on the number of
    /// experiment rows.
    #[error(
        "{file}: application #{application} has {actual} experiment rows, expected {expected}"
    )]
    ShapeMismatch {
        file: String,
        application: u32,
        expected: usize,
        actual: usize,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Core(#[from] sensim_core::Error),
}

impl Error {
    pub(crate) fn format(file: &str, message: impl Into<String>) -> Self {
        Error::Format {
            file: file.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
