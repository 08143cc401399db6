//! Error types for sensim-core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("duplicate region-integrated profile for {isotope} {reaction_type}")]
    DuplicateKey {
        isotope: String,
        reaction_type: String,
    },

    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: String,
        expected: String,
        actual: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
