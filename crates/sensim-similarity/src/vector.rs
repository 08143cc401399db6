//! Sensitivity vectors built from region-integrated profiles.

use sensim_core::{Quantity, ReactionFilter, SensitivityRecord};

/// Concatenate the group-wise sensitivities of `records`, in order, into
/// one flat vector.
///
/// Nominal values and standard deviations are concatenated separately and
/// re-paired, so every component is a fresh independent variable with no
/// tracked relationship to the profiles it came from.
pub fn build_sensitivity_vector<'a>(
    records: impl IntoIterator<Item = &'a SensitivityRecord>,
) -> Vec<Quantity> {
    let mut nominals = Vec::new();
    let mut std_devs = Vec::new();
    for record in records {
        nominals.extend(record.sensitivities.iter().map(Quantity::nominal));
        std_devs.extend(record.sensitivities.iter().map(Quantity::uncertainty));
    }
    nominals
        .into_iter()
        .zip(std_devs)
        .map(|(n, s)| Quantity::new(n, s))
        .collect()
}

/// Profiles passing `filter`, in their original order.
pub fn select_records<'a>(
    records: &'a [SensitivityRecord],
    filter: &'a ReactionFilter,
) -> impl Iterator<Item = &'a SensitivityRecord> {
    records.iter().filter(move |r| filter.matches(r))
}
