//! Error types for sensim-similarity.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "sensitivity vector length mismatch: {application} has {application_len} components, {experiment} has {experiment_len}"
    )]
    LengthMismatch {
        application: String,
        experiment: String,
        application_len: usize,
        experiment_len: usize,
    },

    #[error(transparent)]
    Parse(#[from] sensim_parser::Error),

    #[error(transparent)]
    Core(#[from] sensim_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
