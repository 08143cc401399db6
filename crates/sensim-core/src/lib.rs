//! Core data types for sensitivity-based similarity assessment.
//!
//! This crate provides uncertain quantities with correlated error
//! propagation, sensitivity profiles read from SDF files, the
//! region-integrated lookup, and the matrices that hold integral
//! similarity indices.

pub mod contribution;
pub mod error;
pub mod format;
pub mod index;
pub mod integral;
pub mod matrix;
pub mod quantity;
pub mod record;

pub use contribution::{ContributionRecord, total_contribution};
pub use error::{Error, Result};
pub use index::{DuplicatePolicy, KeyScheme, RedundantReactions, RegionIntegratedIndex};
pub use integral::{EType, IntegralIndexMatrix};
pub use matrix::Matrix;
pub use quantity::{Measurement, Quantity};
pub use record::{ReactionFilter, SdfDocument, SensitivityRecord};
