//! Similarity indices between application and experiment systems.
//!
//! This crate provides:
//! - Sensitivity vectors built from region-integrated SDF profiles
//! - The similarity index E with correlated (automatic) or closed-form
//!   (manual) uncertainty propagation
//! - E matrices over every experiment/application pair
//! - Nuclide-wise and nuclide-reaction-wise decomposition of E
//!
//! ```
//! use sensim_core::Quantity;
//! use sensim_similarity::{UncertaintyMode, compute_e};
//!
//! let a = vec![Quantity::new(1.0, 0.0), Quantity::new(0.0, 0.0)];
//! let b = vec![Quantity::new(0.0, 0.0), Quantity::new(1.0, 0.0)];
//! let e = compute_e(&a, &b, UncertaintyMode::Manual, false).unwrap();
//! assert_eq!(e.nominal(), 0.0);
//! ```

pub mod calculate;
pub mod config;
pub mod contributions;
pub mod error;
pub mod parallel;
pub mod propagation;
pub mod similarity;
pub mod system;
pub mod vector;

pub use calculate::{calculate_e, calculate_e_from_files};
pub use config::{ParallelConfig, RedundantReactions, SimilarityConfig};
pub use contributions::{
    ContributionMatrices, PairContributions, calculate_e_contributions,
    nuclide_and_reaction_contributions,
};
pub use error::{Error, Result};
pub use parallel::{fill_matrix, map_items};
pub use propagation::{dot_product_uncertainty, unit_vector_uncertainties};
pub use similarity::{UncertaintyMode, VectorNorms, compute_e, compute_e_with_norms};
pub use system::{SdfSystem, load_systems};
pub use vector::{build_sensitivity_vector, select_records};
