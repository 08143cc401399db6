//! Sensitivity profiles and the documents they are read from.

use serde::{Deserialize, Serialize};

use crate::quantity::Quantity;

/// One sensitivity profile for a (nuclide, reaction) pair in a single file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityRecord {
    /// Nuclide name, e.g. `u-235`.
    pub isotope: String,
    /// Reaction name, e.g. `fission`, `n,gamma`.
    pub reaction_type: String,
    /// ZAID of the nuclide.
    pub zaid: u32,
    /// ENDF MT number of the reaction.
    pub reaction_mt: u32,
    /// Zone (mixture/region) number, 0 for region-integrated profiles.
    pub zone_number: i64,
    /// Zone volume, 0 for region-integrated profiles.
    pub zone_volume: f64,
    /// Energy-integrated sensitivity coefficient.
    pub energy_integrated_sensitivity: Quantity,
    /// Sum of the absolute values of the group-wise sensitivities.
    pub abs_sum_groupwise_sensitivities: Quantity,
    /// Sum of the group-wise sensitivities whose sign is opposite to the
    /// energy-integrated coefficient.
    pub sum_opposite_sign_groupwise_sensitivities: Quantity,
    /// Group-wise sensitivities, one per energy group.
    pub sensitivities: Vec<Quantity>,
}

impl SensitivityRecord {
    /// True for profiles summed over all zones (zone number and volume zero).
    pub fn is_region_integrated(&self) -> bool {
        self.zone_number == 0 && self.zone_volume == 0.0
    }

    /// Number of energy groups in the profile.
    pub fn num_groups(&self) -> usize {
        self.sensitivities.len()
    }

    /// Display label, e.g. `u-235 fission`.
    pub fn label(&self) -> String {
        format!("{} {}", self.isotope, self.reaction_type)
    }
}

/// All sensitivity profiles parsed from one SDF file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdfDocument {
    /// Annotated name from the first line of the file.
    pub title: String,
    /// Energy-group boundaries, `num_groups + 1` values.
    pub energy_boundaries: Vec<f64>,
    /// Every profile in file order.
    pub records: Vec<SensitivityRecord>,
}

impl SdfDocument {
    /// Number of energy groups declared by the boundaries.
    pub fn num_groups(&self) -> usize {
        self.energy_boundaries.len().saturating_sub(1)
    }

    /// Iterate over the region-integrated profiles only.
    pub fn region_integrated(&self) -> impl Iterator<Item = &SensitivityRecord> {
        self.records.iter().filter(|r| r.is_region_integrated())
    }

    /// Number of region-integrated profiles.
    pub fn num_region_integrated(&self) -> usize {
        self.region_integrated().count()
    }
}

/// Which reactions contribute to a sensitivity vector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionFilter {
    /// Every profile.
    #[default]
    All,
    /// Only profiles with this reaction name.
    Only(String),
}

impl ReactionFilter {
    /// Filter on a single reaction name.
    pub fn only(reaction_type: impl Into<String>) -> Self {
        Self::Only(reaction_type.into())
    }

    /// Whether a record passes the filter.
    pub fn matches(&self, record: &SensitivityRecord) -> bool {
        match self {
            Self::All => true,
            Self::Only(reaction_type) => record.reaction_type == *reaction_type,
        }
    }
}
