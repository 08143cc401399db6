//! Comparison of computed E against reference values.
//!
//! No acceptance threshold is applied; tables carry the relative differences
//! and callers decide what is acceptable.

pub mod difference;
pub mod driver;
pub mod report;

pub use difference::{max_abs_finite, relative_difference};
pub use driver::{compare, compare_e_type, compare_systems};
pub use report::{Attribute, ComparisonCell, ComparisonReport, ComparisonSummary, ComparisonTable};
