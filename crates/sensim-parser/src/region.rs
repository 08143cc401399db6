//! Region-integrated subset of an SDF and its nested-map form.

use std::path::Path;

use sensim_core::{
    DuplicatePolicy, KeyScheme, RegionIntegratedIndex, SdfDocument, SensitivityRecord,
};

use crate::error::Result;
use crate::sdf::read_sdf;

/// Profiles summed over all zones (zone number and volume both zero).
pub fn region_integrated(doc: &SdfDocument) -> Vec<SensitivityRecord> {
    doc.region_integrated().cloned().collect()
}

/// The same document restricted to its region-integrated profiles.
pub fn region_integrated_document(doc: SdfDocument) -> SdfDocument {
    let SdfDocument {
        title,
        energy_boundaries,
        records,
    } = doc;
    SdfDocument {
        title,
        energy_boundaries,
        records: records
            .into_iter()
            .filter(SensitivityRecord::is_region_integrated)
            .collect(),
    }
}

/// Key profiles by isotope and reaction name, failing on a repeated pair.
pub fn to_nested_map(
    records: impl IntoIterator<Item = SensitivityRecord>,
) -> Result<RegionIntegratedIndex> {
    Ok(RegionIntegratedIndex::from_records(records)?)
}

/// Key profiles with an explicit key scheme and duplicate policy.
pub fn to_nested_map_by(
    records: impl IntoIterator<Item = SensitivityRecord>,
    scheme: KeyScheme,
    policy: DuplicatePolicy,
) -> Result<RegionIntegratedIndex> {
    Ok(RegionIntegratedIndex::from_records_with(
        records, scheme, policy,
    )?)
}

/// Read an SDF file and keep only its region-integrated profiles.
pub fn read_region_integrated(path: impl AsRef<Path>) -> Result<SdfDocument> {
    read_sdf(path).map(region_integrated_document)
}
