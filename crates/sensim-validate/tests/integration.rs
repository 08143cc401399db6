//! Integration tests for sensim-validate: SDF files and a reference output
//! written to disk, compared end to end.

use std::path::{Path, PathBuf};

use sensim_core::{EType, Quantity, SdfDocument, SensitivityRecord};
use sensim_parser::render_sdf;
use sensim_validate::{
    Attribute, ComparisonConfig, ValidationError, compare, load_config,
};
use tempfile::TempDir;

fn profile(reaction: &str, mt: u32, values: [f64; 2]) -> SensitivityRecord {
    SensitivityRecord {
        isotope: "u-235".to_string(),
        reaction_type: reaction.to_string(),
        zaid: 92235,
        reaction_mt: mt,
        zone_number: 0,
        zone_volume: 0.0,
        energy_integrated_sensitivity: Quantity::new(values[0] + values[1], 0.0),
        abs_sum_groupwise_sensitivities: Quantity::exact(values[0].abs() + values[1].abs()),
        sum_opposite_sign_groupwise_sensitivities: Quantity::zero(),
        sensitivities: values.iter().map(|&v| Quantity::new(v, 0.01 * v.abs())).collect(),
    }
}

fn write_sdf(dir: &Path, title: &str, fission: [f64; 2]) -> PathBuf {
    let doc = SdfDocument {
        title: title.to_string(),
        energy_boundaries: vec![2.0e7, 1.0e3, 1.0e-5],
        records: vec![profile("fission", 18, fission)],
    };
    let path = dir.join(format!("{title}.sdf"));
    std::fs::write(&path, render_sdf(&doc)).unwrap();
    path
}

/// Reference output with one block per application. `e[k][j]` is E of
/// experiment `k` against application `j`; fission equals total.
fn write_reference(dir: &Path, applications: &[&str], experiments: &[&str], e: &[&[f64]]) -> PathBuf {
    let mut out = String::from("  program verification information\n\n");
    for (j, app) in applications.iter().enumerate() {
        out.push_str(&format!(
            " Integral Values for Application #{:>4}\n -----------------------------------\n",
            j + 1
        ));
        out.push_str("  Experiment  Type  Value  s.d.  c(k)  s.d.  E  s.d.  E(fis)  s.d.  E(cap)  s.d.  E(sct)  s.d.\n");
        out.push_str("  ----------  ----  -----  ----  ----  ----  -  ----  ------  ----  ------  ----  ------  ----\n");
        out.push_str(&format!(
            "     0  {app}  k  1.0000E+00 0.0000E+00 1.0000E+00 0.0000E+00 1.0000E+00 0.0000E+00 1.0000E+00 0.0000E+00 0.0000E+00 0.0000E+00 0.0000E+00 0.0000E+00\n"
        ));
        for (k, exp) in experiments.iter().enumerate() {
            let v = e[k][j];
            out.push_str(&format!(
                "{:>6}  {exp}  k  1.0000E+00 0.0000E+00 {v:.4E} 1.0000E-02 {v:.4E} 1.0000E-02 {v:.4E} 1.0000E-02 0.0000E+00 0.0000E+00 0.0000E+00 0.0000E+00\n",
                k + 1
            ));
        }
        out.push('\n');
    }
    let path = dir.join("reference.out");
    std::fs::write(&path, out).unwrap();
    path
}

#[test]
fn test_compare_end_to_end() {
    let dir = TempDir::new().unwrap();
    let app = write_sdf(dir.path(), "app-1", [1.0, 0.0]);
    let exps = [
        write_sdf(dir.path(), "exp-1", [1.0, 0.0]),
        write_sdf(dir.path(), "exp-2", [0.0, 1.0]),
    ];
    let reference = write_reference(dir.path(), &["app-1"], &["exp-1", "exp-2"], &[&[1.0], &[0.0]]);

    let config = ComparisonConfig::default().with_e_types(vec![EType::Total, EType::Fission]);
    let report = compare(&reference, &[app], &exps, &config).unwrap();

    assert_eq!(report.tables.len(), 2);
    assert_eq!(report.reference_path.as_deref(), Some(reference.as_path()));

    for e_type in [EType::Total, EType::Fission] {
        let table = report.table(e_type).unwrap();
        assert_eq!(table.cells.shape(), (2, 1));
        assert_eq!(table.experiments, vec!["exp-1", "exp-2"]);
        assert_eq!(table.applications, vec!["app-1"]);

        let similar = table.cell(0, 0).unwrap();
        assert!(similar.relative_difference_mean < 1e-12);
        assert!(similar.relative_difference_uncertainty.is_finite());

        let orthogonal = table.cell(1, 0).unwrap();
        assert_eq!(orthogonal.calculated.value, 0.0);
        // zero against a zero reference has no defined relative difference
        assert!(orthogonal.relative_difference_mean.is_nan());
        assert_eq!(table.summary.non_finite_cells, 1);
    }

    let text = report.to_text();
    assert!(text.contains("E (total)"));
    assert!(text.contains(Attribute::ManualUncertainty.label()));
    assert!(report.to_json().unwrap().contains("\"fission\""));
}

#[test]
fn test_missing_reaction_gives_nan_cells() {
    let dir = TempDir::new().unwrap();
    let app = write_sdf(dir.path(), "app-1", [1.0, 0.0]);
    let exp = write_sdf(dir.path(), "exp-1", [1.0, 0.0]);
    let reference = write_reference(dir.path(), &["app-1"], &["exp-1"], &[&[1.0]]);

    let config = ComparisonConfig::default().with_e_types(vec![EType::Scatter]);
    let report = compare(&reference, &[app], &[exp], &config).unwrap();
    let table = report.table(EType::Scatter).unwrap();
    assert!(table.cell(0, 0).unwrap().calculated.value.is_nan());
    assert_eq!(table.summary.non_finite_cells, 1);
    assert_eq!(table.summary.max_relative_difference_mean, None);
}

#[test]
fn test_shape_mismatch() {
    let dir = TempDir::new().unwrap();
    let app = write_sdf(dir.path(), "app-1", [1.0, 0.0]);
    let exp = write_sdf(dir.path(), "exp-1", [1.0, 0.0]);
    let reference = write_reference(dir.path(), &["app-1"], &["exp-1", "exp-2"], &[&[1.0], &[0.5]]);

    let err = compare(&reference, &[app], &[exp], &ComparisonConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        ValidationError::ShapeMismatch {
            computed_rows: 1,
            reference_rows: 2,
            ..
        }
    ));
}

#[test]
fn test_malformed_inputs_fail_before_computation() {
    let dir = TempDir::new().unwrap();
    let app = write_sdf(dir.path(), "app-1", [1.0, 0.0]);
    let bad = dir.path().join("bad.sdf");
    std::fs::write(&bad, "not an sdf\n").unwrap();
    let reference = write_reference(dir.path(), &["app-1"], &["bad"], &[&[1.0]]);

    let err = compare(&reference, &[app.clone()], &[bad], &ComparisonConfig::default()).unwrap_err();
    assert!(matches!(err, ValidationError::Similarity(_)));
    assert!(err.to_string().contains("bad.sdf"), "{err}");

    let missing = dir.path().join("missing.out");
    let err = compare(&missing, &[app.clone()], &[app], &ComparisonConfig::default()).unwrap_err();
    assert!(matches!(err, ValidationError::Parse(_)));
}

#[test]
fn test_config_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("compare.json");
    std::fs::write(
        &path,
        r#"{"e_types": ["fission"], "similarity": {"parallel": {"min_cells_for_parallel": 16}}}"#,
    )
    .unwrap();
    let config = load_config(&path).unwrap();
    assert_eq!(config.e_types, vec![EType::Fission]);
    assert_eq!(config.similarity.parallel.min_cells_for_parallel, 16);
}
