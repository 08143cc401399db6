//! Runs the similarity engine and lines its results up against the
//! reference output.

use std::path::Path;

use sensim_core::{EType, IntegralIndexMatrix, Matrix};
use sensim_parser::read_integral_output;
use sensim_similarity::{SdfSystem, UncertaintyMode, calculate_e, load_systems};

use super::report::{ComparisonCell, ComparisonReport, ComparisonTable};
use crate::config::ComparisonConfig;
use crate::error::{Error, Result};

/// Compare E computed from SDF files with a reference output file.
///
/// Every input is read and parsed before any E is computed, so a malformed
/// file fails fast.
pub fn compare<P: AsRef<Path>>(
    reference_path: impl AsRef<Path>,
    applications: &[P],
    experiments: &[P],
    config: &ComparisonConfig,
) -> Result<ComparisonReport> {
    let reference_path = reference_path.as_ref();
    let reference = read_integral_output(reference_path)?;
    let applications = load_systems(applications)?;
    let experiments = load_systems(experiments)?;

    let mut report = compare_systems(&reference, &applications, &experiments, config)?;
    report.reference_path = Some(reference_path.to_path_buf());
    Ok(report)
}

/// Compare already loaded systems with a parsed reference output.
pub fn compare_systems(
    reference: &IntegralIndexMatrix,
    applications: &[SdfSystem],
    experiments: &[SdfSystem],
    config: &ComparisonConfig,
) -> Result<ComparisonReport> {
    log::info!(
        "comparing {} E types for {} experiments x {} applications",
        config.e_types.len(),
        experiments.len(),
        applications.len()
    );

    let mut report = ComparisonReport::new();
    for &e_type in &config.e_types {
        report.add_table(compare_e_type(e_type, reference, applications, experiments, config)?);
    }

    log::info!("comparison finished");
    Ok(report)
}

/// Build the table for a single E type.
pub fn compare_e_type(
    e_type: EType,
    reference: &IntegralIndexMatrix,
    applications: &[SdfSystem],
    experiments: &[SdfSystem],
    config: &ComparisonConfig,
) -> Result<ComparisonTable> {
    let expected = reference.e(e_type);
    check_shape(e_type, (experiments.len(), applications.len()), expected.shape())?;

    let filter = e_type.reaction_filter();
    let parallel = &config.similarity.parallel;
    let automatic = calculate_e(applications, experiments, &filter, UncertaintyMode::Automatic, parallel)?;
    let manual = calculate_e(applications, experiments, &filter, UncertaintyMode::Manual, parallel)?;
    check_shape(e_type, automatic.shape(), expected.shape())?;

    check_shape(e_type, manual.shape(), expected.shape())?;

    let cells = Matrix::from_fn(expected.rows(), expected.cols(), |i, j| {
        ComparisonCell::new(&automatic[(i, j)], &manual[(i, j)], &expected[(i, j)])
    });

    let table = ComparisonTable::new(
        e_type,
        experiments.iter().map(|s| s.name().to_string()).collect(),
        applications.iter().map(|s| s.name().to_string()).collect(),
        cells,
    );
    log::debug!(
        "E ({}): max relative difference {:?}",
        e_type,
        table.summary.max_relative_difference_mean
    );
    Ok(table)
}

fn check_shape(e_type: EType, computed: (usize, usize), reference: (usize, usize)) -> Result<()> {
    if computed != reference {
        return Err(Error::ShapeMismatch {
            e_type,
            computed_rows: computed.0,
            computed_cols: computed.1,
            reference_rows: reference.0,
            reference_cols: reference.1,
        });
    }
    Ok(())
}
