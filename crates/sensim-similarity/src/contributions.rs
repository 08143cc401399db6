//! Decomposition of E into nuclide-wise and nuclide-reaction-wise
//! contributions.
//!
//! Every contribution divides by the norms of the *full* application and
//! experiment vectors, so the nuclide contributions of a pair add up to its
//! E and the reaction contributions of a nuclide add up to the nuclide's.

use indexmap::IndexSet;
use serde::Serialize;

use sensim_core::{ContributionRecord, Matrix, Quantity, RegionIntegratedIndex, SensitivityRecord};

use crate::config::{RedundantReactions, SimilarityConfig};
use crate::error::{Error, Result};
use crate::parallel::fill_matrix;
use crate::similarity::{UncertaintyMode, VectorNorms, compute_e_with_norms};
use crate::system::SdfSystem;
use crate::vector::build_sensitivity_vector;

/// Contributions of one (application, experiment) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PairContributions {
    /// One record per nuclide in either system.
    pub nuclide_wise: Vec<ContributionRecord>,
    /// One record per (nuclide, reaction) in either system.
    pub nuclide_reaction_wise: Vec<ContributionRecord>,
}

impl PairContributions {
    /// Reaction records of one nuclide.
    pub fn reactions_of<'a>(
        &'a self,
        isotope: &'a str,
    ) -> impl Iterator<Item = &'a ContributionRecord> + 'a {
        self.nuclide_reaction_wise
            .iter()
            .filter(move |r| r.isotope == isotope)
    }
}

/// Contribution lists for every (experiment, application) cell.
#[derive(Debug, Clone, Serialize)]
pub struct ContributionMatrices {
    /// Nuclide records per cell.
    pub nuclide_wise: Matrix<Vec<ContributionRecord>>,
    /// (nuclide, reaction) records per cell.
    pub nuclide_reaction_wise: Matrix<Vec<ContributionRecord>>,
}

/// Decompose E between two systems into nuclide and reaction contributions.
///
/// Reactions named in `redundant` are removed from both sides first, both
/// from the contributions and from the norms. Nuclides are visited in
/// application order followed by experiment-only nuclides; a nuclide or
/// reaction present on one side only contributes exactly zero.
pub fn nuclide_and_reaction_contributions(
    application: &RegionIntegratedIndex,
    experiment: &RegionIntegratedIndex,
    redundant: &RedundantReactions,
) -> Result<PairContributions> {
    let application = application.without_redundant(redundant);
    let experiment = experiment.without_redundant(redundant);

    let norms = VectorNorms::of(
        &build_sensitivity_vector(application.records()),
        &build_sensitivity_vector(experiment.records()),
    );

    let isotopes: IndexSet<&str> = application.isotopes().chain(experiment.isotopes()).collect();

    let mut out = PairContributions::default();
    for isotope in isotopes {
        let (app_reactions, exp_reactions) =
            match (application.reactions(isotope), experiment.reactions(isotope)) {
                (Some(a), Some(e)) => (a, e),
                (a, e) => {
                    out.nuclide_wise
                        .push(ContributionRecord::nuclide(isotope, Quantity::zero()));
                    for reaction in a.or(e).into_iter().flat_map(|r| r.keys()) {
                        out.nuclide_reaction_wise.push(ContributionRecord::reaction(
                            isotope,
                            reaction.as_str(),
                            Quantity::zero(),
                        ));
                    }
                    continue;
                }
            };

        let reactions: IndexSet<&str> = app_reactions
            .keys()
            .chain(exp_reactions.keys())
            .map(String::as_str)
            .collect();

        let mut common: Vec<(&SensitivityRecord, &SensitivityRecord)> = Vec::new();
        let mut reaction_records = Vec::with_capacity(reactions.len());
        for reaction in reactions {
            let contribution = match (app_reactions.get(reaction), exp_reactions.get(reaction)) {
                (Some(a), Some(e)) => {
                    common.push((a, e));
                    manual_e(
                        &build_sensitivity_vector([a]),
                        &build_sensitivity_vector([e]),
                        &norms,
                        isotope,
                    )?
                }
                _ => Quantity::zero(),
            };
            reaction_records.push(ContributionRecord::reaction(isotope, reaction, contribution));
        }

        let nuclide = manual_e(
            &build_sensitivity_vector(common.iter().map(|(a, _)| *a)),
            &build_sensitivity_vector(common.iter().map(|(_, e)| *e)),
            &norms,
            isotope,
        )?;
        out.nuclide_wise
            .push(ContributionRecord::nuclide(isotope, nuclide));
        out.nuclide_reaction_wise.extend(reaction_records);
    }
    Ok(out)
}

fn manual_e(
    application: &[Quantity],
    experiment: &[Quantity],
    norms: &VectorNorms,
    isotope: &str,
) -> Result<Quantity> {
    compute_e_with_norms(application, experiment, norms, UncertaintyMode::Manual, false).map_err(
        |err| match err {
            Error::LengthMismatch {
                application_len,
                experiment_len,
                ..
            } => Error::LengthMismatch {
                application: format!("application {}", isotope),
                experiment: format!("experiment {}", isotope),
                application_len,
                experiment_len,
            },
            other => other,
        },
    )
}

/// Contributions for every (experiment, application) pair.
pub fn calculate_e_contributions(
    applications: &[SdfSystem],
    experiments: &[SdfSystem],
    config: &SimilarityConfig,
) -> Result<ContributionMatrices> {
    log::info!(
        "decomposing E for {} experiments x {} applications",
        experiments.len(),
        applications.len()
    );

    let pairs = fill_matrix(
        experiments.len(),
        applications.len(),
        &config.parallel,
        |i, j| {
            let (app, exp) = (&applications[j], &experiments[i]);
            if app.num_groups() != exp.num_groups() {
                return Err(Error::LengthMismatch {
                    application: app.name().to_string(),
                    experiment: exp.name().to_string(),
                    application_len: app.num_groups(),
                    experiment_len: exp.num_groups(),
                });
            }
            nuclide_and_reaction_contributions(
                app.index(),
                exp.index(),
                &config.redundant_reactions,
            )
        },
    )?;

    Ok(ContributionMatrices {
        nuclide_wise: pairs.map(|p| p.nuclide_wise.clone()),
        nuclide_reaction_wise: pairs.map(|p| p.nuclide_reaction_wise.clone()),
    })
}
