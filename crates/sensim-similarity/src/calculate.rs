//! E matrices over every (experiment, application) pair.

use std::path::Path;

use sensim_core::{Matrix, Quantity, ReactionFilter};

use crate::config::ParallelConfig;
use crate::error::{Error, Result};
use crate::parallel::{fill_matrix, map_items};
use crate::similarity::{
    ManualUnitVector, UncertaintyMode, correlated_unit_vector, detach_all, undefined_e,
};
use crate::system::{SdfSystem, load_systems};

/// A system's unit vector, prepared once and reused for every pair it takes
/// part in. `unit` is `None` for a zero vector.
struct Prepared<U> {
    len: usize,
    unit: Option<U>,
}

/// Automatic-mode unit vector in both of its forms.
struct AutomaticUnit {
    /// Still tied to the system's own components; used for same-file pairs.
    correlated: Vec<Quantity>,
    detached: Vec<Quantity>,
}

fn prepare<U>(
    system: &SdfSystem,
    filter: &ReactionFilter,
    normalise: impl Fn(&[Quantity], &Quantity) -> U,
) -> Prepared<U> {
    let vector = system.sensitivity_vector(filter);
    let norm = Quantity::norm(&vector);
    if norm.nominal() == 0.0 {
        log::warn!(
            "{}: zero sensitivity vector for {:?}, E is undefined",
            system.name(),
            filter
        );
        return Prepared {
            len: vector.len(),
            unit: None,
        };
    }
    Prepared {
        len: vector.len(),
        unit: Some(normalise(&vector, &norm)),
    }
}

/// Prepare every system, then evaluate `pair_e` for each cell.
fn fill_pairs<U, N, F>(
    applications: &[SdfSystem],
    experiments: &[SdfSystem],
    filter: &ReactionFilter,
    parallel: &ParallelConfig,
    normalise: N,
    pair_e: F,
) -> Result<Matrix<Quantity>>
where
    U: Send + Sync,
    N: Fn(&[Quantity], &Quantity) -> U + Sync,
    F: Fn(&SdfSystem, &SdfSystem, &U, &U) -> Result<Quantity> + Sync,
{
    let prepare_one =
        |system: &SdfSystem| -> Result<Prepared<U>> { Ok(prepare(system, filter, &normalise)) };
    let app_vectors = map_items(applications, parallel, prepare_one)?;
    let exp_vectors = map_items(experiments, parallel, prepare_one)?;

    fill_matrix(experiments.len(), applications.len(), parallel, |i, j| {
        let (app, exp) = (&applications[j], &experiments[i]);
        let (app_vec, exp_vec) = (&app_vectors[j], &exp_vectors[i]);
        if app_vec.len != exp_vec.len {
            return Err(Error::LengthMismatch {
                application: app.name().to_string(),
                experiment: exp.name().to_string(),
                application_len: app_vec.len,
                experiment_len: exp_vec.len,
            });
        }
        match (&app_vec.unit, &exp_vec.unit) {
            (Some(a), Some(b)) => pair_e(app, exp, a, b),
            _ => Ok(undefined_e()),
        }
    })
}

/// E for every experiment (rows) against every application (columns).
///
/// Profiles are selected with `filter`. A pair read from the same file keeps
/// the correlation between its two sides in automatic mode.
pub fn calculate_e(
    applications: &[SdfSystem],
    experiments: &[SdfSystem],
    filter: &ReactionFilter,
    mode: UncertaintyMode,
    parallel: &ParallelConfig,
) -> Result<Matrix<Quantity>> {
    log::info!(
        "computing E ({:?}, {:?}) for {} experiments x {} applications",
        filter,
        mode,
        experiments.len(),
        applications.len()
    );

    match mode {
        UncertaintyMode::Automatic => fill_pairs(
            applications,
            experiments,
            filter,
            parallel,
            |vector, norm| {
                let correlated = correlated_unit_vector(vector, norm);
                let detached = detach_all(&correlated);
                AutomaticUnit {
                    correlated,
                    detached,
                }
            },
            |app, exp, a: &AutomaticUnit, b: &AutomaticUnit| {
                if app.same_source(exp) {
                    // one file, one sample: the same components on both sides
                    Ok(Quantity::dot(&a.correlated, &a.correlated)?)
                } else {
                    Ok(Quantity::dot(&a.detached, &b.detached)?)
                }
            },
        ),
        UncertaintyMode::Manual => fill_pairs(
            applications,
            experiments,
            filter,
            parallel,
            |vector, norm| ManualUnitVector::new(vector, norm.nominal()),
            |_, _, a: &ManualUnitVector, b: &ManualUnitVector| Ok(a.dot(b)),
        ),
    }
}

/// Load the files and compute the E matrix.
pub fn calculate_e_from_files<P: AsRef<Path>>(
    applications: &[P],
    experiments: &[P],
    filter: &ReactionFilter,
    mode: UncertaintyMode,
    parallel: &ParallelConfig,
) -> Result<Matrix<Quantity>> {
    let applications = load_systems(applications)?;
    let experiments = load_systems(experiments)?;
    calculate_e(&applications, &experiments, filter, mode, parallel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::compute_e;
    use crate::system::tests::document;
    use crate::vector::tests::profile;

    fn system(name: &str, fission: &[f64], capture: &[f64]) -> SdfSystem {
        let doc = document(
            name,
            vec![
                profile("u-235", "fission", 18, fission),
                profile("u-235", "capture", 101, capture),
            ],
        );
        SdfSystem::from_document(name, doc).unwrap()
    }

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * (1.0 + b.abs())
    }

    #[test]
    fn test_matrix_shape_and_values() {
        let apps = vec![system("a1", &[0.3, 0.1], &[-0.1, -0.05])];
        let exps = vec![
            system("e1", &[0.2, 0.2], &[-0.05, -0.05]),
            system("e2", &[0.0, 0.4], &[-0.2, 0.0]),
        ];
        for mode in [UncertaintyMode::Automatic, UncertaintyMode::Manual] {
            for parallel in [ParallelConfig::sequential(), ParallelConfig::default().with_min_cells(1)] {
                let m = calculate_e(&apps, &exps, &ReactionFilter::All, mode, &parallel).unwrap();
                assert_eq!(m.shape(), (2, 1));
                for i in 0..2 {
                    let direct = compute_e(
                        &apps[0].sensitivity_vector(&ReactionFilter::All),
                        &exps[i].sensitivity_vector(&ReactionFilter::All),
                        mode,
                        false,
                    )
                    .unwrap();
                    let cell = m.get(i, 0).unwrap();
                    assert!(approx_eq(cell.nominal(), direct.nominal(), 1e-14));
                    assert!(approx_eq(cell.uncertainty(), direct.uncertainty(), 1e-12));
                }
            }
        }
    }

    #[test]
    fn test_reaction_filter() {
        let apps = vec![system("a1", &[1.0, 0.0], &[0.3, 0.4])];
        let exps = vec![system("e1", &[0.0, 1.0], &[0.3, 0.4])];
        let seq = ParallelConfig::sequential();
        let fission =
            calculate_e(&apps, &exps, &ReactionFilter::only("fission"), UncertaintyMode::Manual, &seq).unwrap();
        assert_eq!(fission.get(0, 0).unwrap().nominal(), 0.0);
        let capture =
            calculate_e(&apps, &exps, &ReactionFilter::only("capture"), UncertaintyMode::Manual, &seq).unwrap();
        assert!(approx_eq(capture.get(0, 0).unwrap().nominal(), 1.0, 1e-14));
    }

    #[test]
    fn test_same_source_self_comparison() {
        let a = system("a1", &[0.3, 0.1], &[-0.1, -0.05]);
        let copy = SdfSystem::from_document("elsewhere", a.document().clone()).unwrap();
        let apps = vec![a.clone()];
        let exps = vec![a, copy];
        let m = calculate_e(
            &apps,
            &exps,
            &ReactionFilter::All,
            UncertaintyMode::Automatic,
            &ParallelConfig::sequential(),
        )
        .unwrap();
        let same = m.get(0, 0).unwrap();
        let other = m.get(1, 0).unwrap();
        assert!(approx_eq(same.nominal(), 1.0, 1e-12));
        assert!(approx_eq(other.nominal(), 1.0, 1e-12));
        assert!(same.uncertainty() < other.uncertainty());
    }

    #[test]
    fn test_length_mismatch_names_systems() {
        let apps = vec![system("a1", &[0.3, 0.1], &[-0.1, -0.05])];
        let doc = document("short", vec![profile("u-235", "fission", 18, &[0.3, 0.1])]);
        let exps = vec![SdfSystem::from_document("short", doc).unwrap()];
        let err = calculate_e(
            &apps,
            &exps,
            &ReactionFilter::All,
            UncertaintyMode::Manual,
            &ParallelConfig::sequential(),
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("a1") && msg.contains("short"), "{msg}");
    }

    #[test]
    fn test_missing_reaction_is_undefined() {
        let apps = vec![system("a1", &[0.3, 0.1], &[-0.1, -0.05])];
        let exps = vec![system("e1", &[0.2, 0.2], &[-0.05, -0.05])];
        let m = calculate_e(
            &apps,
            &exps,
            &ReactionFilter::only("elastic"),
            UncertaintyMode::Manual,
            &ParallelConfig::sequential(),
        )
        .unwrap();
        assert!(m.get(0, 0).unwrap().nominal().is_nan());
    }
}
