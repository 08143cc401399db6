//! # Sensim
//!
//! Sensitivity-based similarity indices for nuclear criticality safety
//! validation.
//!
//! Sensim provides:
//! - SDF sensitivity-file parsing and writing
//! - Parsing of the integral-index tables printed by the reference tool
//! - The similarity index E with correlated or closed-form uncertainty
//! - Nuclide-wise and nuclide-reaction-wise contributions to E
//! - Comparison of computed E against reference values
//!
//! ## Quick Start
//!
//! ```rust
//! use sensim::prelude::*;
//!
//! let a = vec![Quantity::new(1.0, 0.01), Quantity::new(1.0, 0.01)];
//! let b = vec![Quantity::new(1.0, 0.02), Quantity::new(1.0, 0.02)];
//! let e = compute_e(&a, &b, UncertaintyMode::Automatic, false).unwrap();
//! assert!((e.nominal() - 1.0).abs() < 1e-12);
//! ```
//!
//! ## Comparing Against Reference Output
//!
//! ```rust,ignore
//! use sensim::prelude::*;
//!
//! let config = load_config("compare.json".as_ref())?;
//! let report = sensim::compare("tsunami-ip.out", &applications, &experiments, &config)?;
//! println!("{}", report.to_text());
//! ```

// Re-export member crates
pub use sensim_core as core;
pub use sensim_parser as parser;
pub use sensim_similarity as similarity;
pub use sensim_validate as validate;

// ============================================================================
// Convenient re-exports from sensim_core
// ============================================================================

pub use sensim_core::{
    ContributionRecord,
    // Integral indices
    EType,
    // Errors
    Error as CoreError,
    IntegralIndexMatrix,
    Matrix,
    Measurement,
    // Uncertain values
    Quantity,
    ReactionFilter,
    RedundantReactions,
    // Records
    RegionIntegratedIndex,
    SdfDocument,
    SensitivityRecord,
};

// ============================================================================
// Convenient re-exports from sensim_parser
// ============================================================================

pub use sensim_parser::{
    // Errors
    Error as ParseError,
    parse_integral_output,
    // SDF
    parse_sdf,
    read_integral_output,
    read_region_integrated,
    read_sdf,
    render_sdf,
    // Annotated names
    sanitize_sdf_file,
    sanitize_title,
};

// ============================================================================
// Convenient re-exports from sensim_similarity
// ============================================================================

pub use sensim_similarity::{
    ContributionMatrices,
    // Errors
    Error as SimilarityError,
    PairContributions,
    ParallelConfig,
    // Systems
    SdfSystem,
    SimilarityConfig,
    UncertaintyMode,
    VectorNorms,
    // E matrices
    calculate_e,
    // Contributions
    calculate_e_contributions,
    calculate_e_from_files,
    // Single pair
    compute_e,
    compute_e_with_norms,
    load_systems,
    nuclide_and_reaction_contributions,
};

// ============================================================================
// Convenient re-exports from sensim_validate
// ============================================================================

pub use sensim_validate::{
    ComparisonConfig, ComparisonReport, ComparisonTable, ValidationError, compare, load_config,
};

// ============================================================================
// Prelude module for convenient imports
// ============================================================================

/// Prelude module containing commonly used types and functions.
///
/// ```rust
/// use sensim::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::{EType, Quantity, ReactionFilter, SdfDocument, SensitivityRecord};

    // Parser
    pub use crate::{read_integral_output, read_sdf};

    // Similarity
    pub use crate::{
        SdfSystem, SimilarityConfig, UncertaintyMode, calculate_e, calculate_e_contributions,
        compute_e, load_systems,
    };

    // Comparison
    pub use crate::{ComparisonConfig, compare, load_config};
}
