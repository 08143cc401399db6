//! Per-nuclide and per-reaction shares of an E index.

use serde::{Deserialize, Serialize};

use crate::quantity::Quantity;

/// Contribution of one nuclide, or one reaction of a nuclide, to E.
///
/// ```
/// use sensim_core::{ContributionRecord, Quantity, total_contribution};
///
/// let records = vec![
///     ContributionRecord::reaction("u-235", "fission", Quantity::exact(0.5)),
///     ContributionRecord::reaction("u-235", "n,gamma", Quantity::exact(0.25)),
/// ];
/// assert_eq!(records[0].isotope, "u-235");
/// assert_eq!(records[1].reaction_type.as_deref(), Some("n,gamma"));
/// assert_eq!(total_contribution(&records), 0.75);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionRecord {
    /// Nuclide name as written in the SDF file, e.g. `u-235`.
    pub isotope: String,
    /// `None` for a whole-nuclide contribution.
    pub reaction_type: Option<String>,
    /// Share of E, with the manual-mode uncertainty.
    pub contribution: Quantity,
}

impl ContributionRecord {
    /// Contribution of every reaction of one nuclide.
    pub fn nuclide(isotope: impl Into<String>, contribution: Quantity) -> Self {
        Self {
            isotope: isotope.into(),
            reaction_type: None,
            contribution,
        }
    }

    /// Contribution of one reaction of one nuclide.
    pub fn reaction(
        isotope: impl Into<String>,
        reaction_type: impl Into<String>,
        contribution: Quantity,
    ) -> Self {
        Self {
            isotope: isotope.into(),
            reaction_type: Some(reaction_type.into()),
            contribution,
        }
    }

    /// `u-235` or `u-235 fission`.
    pub fn label(&self) -> String {
        match &self.reaction_type {
            Some(r) => format!("{} {}", self.isotope, r),
            None => self.isotope.clone(),
        }
    }
}

/// Sum the nominal contributions of a set of records.
pub fn total_contribution(records: &[ContributionRecord]) -> f64 {
    records.iter().map(|r| r.contribution.nominal()).sum()
}
