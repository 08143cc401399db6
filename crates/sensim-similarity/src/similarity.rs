//! The similarity index E, the cosine of the angle between two sensitivity
//! vectors.
//!
//! Two strategies estimate the uncertainty of E:
//!
//! - [`UncertaintyMode::Automatic`] carries every step through correlated
//!   [`Quantity`] arithmetic. Normalising each vector by its own derived norm
//!   ties the unit vectors to their inputs; unless both vectors come from the
//!   same file, the unit vectors are detached before the dot product so the
//!   two systems are treated as independent samples.
//! - [`UncertaintyMode::Manual`] computes the nominal value with plain floats
//!   and propagates uncertainty with the closed forms in
//!   [`crate::propagation`].

use serde::{Deserialize, Serialize};

use sensim_core::Quantity;

use crate::error::{Error, Result};
use crate::propagation::{dot_product_uncertainty, unit_vector_uncertainties};

/// How the uncertainty of E is estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UncertaintyMode {
    /// Correlated propagation through tracked arithmetic.
    #[default]
    Automatic,
    /// Closed-form propagation, treating unit-vector components as
    /// uncorrelated.
    Manual,
}

/// Norms used as denominators of E.
///
/// Usually the norms of the two vectors themselves. For contributions they
/// are the norms of the full vectors a sub-vector was cut from.
#[derive(Debug, Clone)]
pub struct VectorNorms {
    pub application: Quantity,
    pub experiment: Quantity,
}

impl VectorNorms {
    /// Norms of the two given vectors.
    pub fn of(application: &[Quantity], experiment: &[Quantity]) -> Self {
        Self {
            application: Quantity::norm(application),
            experiment: Quantity::norm(experiment),
        }
    }

    fn is_degenerate(&self) -> bool {
        self.application.nominal() == 0.0 || self.experiment.nominal() == 0.0
    }
}

/// E between an application and an experiment vector.
///
/// `same_source` says whether both vectors come from the same file; only
/// then is the correlation between their unit vectors kept.
pub fn compute_e(
    application: &[Quantity],
    experiment: &[Quantity],
    mode: UncertaintyMode,
    same_source: bool,
) -> Result<Quantity> {
    let norms = VectorNorms::of(application, experiment);
    compute_e_with_norms(application, experiment, &norms, mode, same_source)
}

/// E with caller-supplied norms.
pub fn compute_e_with_norms(
    application: &[Quantity],
    experiment: &[Quantity],
    norms: &VectorNorms,
    mode: UncertaintyMode,
    same_source: bool,
) -> Result<Quantity> {
    check_lengths(application.len(), experiment.len())?;
    if norms.is_degenerate() {
        log::warn!("zero-norm sensitivity vector, E is undefined");
        return Ok(undefined_e());
    }

    match mode {
        UncertaintyMode::Automatic => {
            let app_unit = correlated_unit_vector(application, &norms.application);
            let exp_unit = correlated_unit_vector(experiment, &norms.experiment);
            if same_source {
                Ok(Quantity::dot(&app_unit, &exp_unit)?)
            } else {
                Ok(Quantity::dot(&detach_all(&app_unit), &detach_all(&exp_unit))?)
            }
        }
        UncertaintyMode::Manual => {
            let app_unit = ManualUnitVector::new(application, norms.application.nominal());
            let exp_unit = ManualUnitVector::new(experiment, norms.experiment.nominal());
            Ok(app_unit.dot(&exp_unit))
        }
    }
}

pub(crate) fn check_lengths(application_len: usize, experiment_len: usize) -> Result<()> {
    if application_len != experiment_len {
        return Err(Error::LengthMismatch {
            application: "application".to_string(),
            experiment: "experiment".to_string(),
            application_len,
            experiment_len,
        });
    }
    Ok(())
}

/// NaN with NaN uncertainty, the value of E for a zero vector.
pub(crate) fn undefined_e() -> Quantity {
    Quantity::new(f64::NAN, f64::NAN)
}

/// `v / norm` with the dependency on `v` and `norm` tracked.
pub(crate) fn correlated_unit_vector(vector: &[Quantity], norm: &Quantity) -> Vec<Quantity> {
    vector.iter().map(|x| x / norm).collect()
}

/// Fresh independent copies of every component.
pub(crate) fn detach_all(vector: &[Quantity]) -> Vec<Quantity> {
    vector.iter().map(Quantity::detach).collect()
}

/// Nominal unit vector with closed-form component uncertainties.
#[derive(Debug, Clone)]
pub(crate) struct ManualUnitVector {
    pub(crate) nominals: Vec<f64>,
    pub(crate) std_devs: Vec<f64>,
}

impl ManualUnitVector {
    pub(crate) fn new(vector: &[Quantity], norm: f64) -> Self {
        let raw = Quantity::nominal_values(vector);
        let raw_std = Quantity::std_devs(vector);
        let std_devs = unit_vector_uncertainties(&raw, &raw_std, norm);
        let nominals = raw.iter().map(|v| v / norm).collect();
        Self { nominals, std_devs }
    }

    pub(crate) fn dot(&self, other: &ManualUnitVector) -> Quantity {
        let nominal = self
            .nominals
            .iter()
            .zip(&other.nominals)
            .map(|(a, b)| a * b)
            .sum();
        let std_dev = dot_product_uncertainty(
            &self.nominals,
            &self.std_devs,
            &other.nominals,
            &other.std_devs,
        );
        Quantity::new(nominal, std_dev)
    }
}
