//! Validation of computed similarity indices against the output of the
//! reference tool.
//!
//! This crate provides infrastructure for:
//! - Reading the reference integral-index tables
//! - Computing the same indices from the SDF files
//! - Relative differences of values and uncertainties
//! - Generating comparison reports as text or JSON

pub mod compare;
pub mod config;
pub mod error;

pub use compare::{
    Attribute, ComparisonCell, ComparisonReport, ComparisonSummary, ComparisonTable, compare,
    compare_e_type, compare_systems, relative_difference,
};
pub use config::{ComparisonConfig, load_config};
pub use error::{Error as ValidationError, Result as ValidationResult};
