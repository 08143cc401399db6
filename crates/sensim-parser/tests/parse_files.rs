//! End-to-end tests: build SDF and reference-output text, read it from disk,
//! verify the parsed structures.

use sensim_core::{EType, Quantity, SdfDocument, SensitivityRecord};
use sensim_parser::{
    Error, parse_integral_output, parse_sdf, read_integral_output, read_region_integrated,
    read_sdf, region_integrated, render_sdf, sanitize_sdf_file, to_nested_map,
};

fn profile(isotope: &str, reaction: &str, zaid: u32, mt: u32, values: &[(f64, f64)]) -> SensitivityRecord {
    let nominals: Vec<f64> = values.iter().map(|v| v.0).collect();
    let std_devs: Vec<f64> = values.iter().map(|v| v.1).collect();
    SensitivityRecord {
        isotope: isotope.to_string(),
        reaction_type: reaction.to_string(),
        zaid,
        reaction_mt: mt,
        zone_number: 0,
        zone_volume: 0.0,
        // first-group values keep the summary fields exactly representable
        energy_integrated_sensitivity: Quantity::new(nominals[0], 0.005),
        abs_sum_groupwise_sensitivities: Quantity::exact(nominals[0].abs()),
        sum_opposite_sign_groupwise_sensitivities: Quantity::zero(),
        sensitivities: Quantity::from_parts(&nominals, &std_devs).unwrap(),
    }
}

fn document() -> SdfDocument {
    SdfDocument {
        title: "heu-met-fast-001".to_string(),
        energy_boundaries: vec![2.0e7, 1.0e3, 1.0e-5],
        records: vec![
            profile("u-235", "fission", 92235, 18, &[(0.1, 0.01), (0.2, 0.02)]),
            profile("u-235", "n,gamma", 92235, 102, &[(-0.05, 0.001), (-0.01, 0.0005)]),
            profile("h-1", "elastic", 1001, 2, &[(0.02, 0.002), (0.0, 0.0)]),
        ],
    }
}

#[test]
fn test_single_profile_round_trip() {
    let doc = SdfDocument {
        title: "single".to_string(),
        energy_boundaries: vec![2.0e7, 1.0, 1.0e-5],
        records: vec![profile("u-235", "fission", 92235, 18, &[(0.1, 0.01), (0.2, 0.02)])],
    };
    let parsed = parse_sdf(&render_sdf(&doc)).expect("rendered SDF should parse");
    assert_eq!(parsed, doc);

    let r = &parsed.records[0];
    assert_eq!((r.isotope.as_str(), r.reaction_type.as_str()), ("u-235", "fission"));
    assert_eq!((r.zaid, r.reaction_mt), (92235, 18));
    assert_eq!(Quantity::nominal_values(&r.sensitivities), vec![0.1, 0.2]);
    assert_eq!(Quantity::std_devs(&r.sensitivities), vec![0.01, 0.02]);

    // idempotent
    assert_eq!(parse_sdf(&render_sdf(&parsed)).unwrap(), parsed);
}

#[test]
fn test_read_sdf_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("system.sdf");
    std::fs::write(&path, render_sdf(&document())).unwrap();

    let doc = read_sdf(&path).expect("file should parse");
    assert_eq!(doc, document());

    let ri = read_region_integrated(&path).unwrap();
    assert_eq!(ri.records.len(), 3);
    let index = to_nested_map(region_integrated(&ri)).unwrap();
    assert_eq!(index.num_isotopes(), 2);
    assert_eq!(index.get("u-235", "n,gamma").unwrap().reaction_mt, 102);
}

#[test]
fn test_errors_name_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.sdf");
    let text = render_sdf(&document()).replace("energy boundaries:", "bounds");
    std::fs::write(&path, text).unwrap();

    let err = read_sdf(&path).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("broken.sdf"), "{msg}");
    assert!(msg.contains("energy boundaries"), "{msg}");

    let missing = read_sdf(dir.path().join("absent.sdf")).unwrap_err();
    assert!(matches!(missing, Error::Io { .. }));
}

#[test]
fn test_sanitized_title_survives_parse() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("spaced.sdf");
    let dest = dir.path().join("clean.sdf");
    let mut doc = document();
    doc.title = "HEU MET FAST 001".to_string();
    std::fs::write(&src, render_sdf(&doc)).unwrap();

    sanitize_sdf_file(&src, &dest).unwrap();
    let clean = read_sdf(&dest).unwrap();
    assert_eq!(clean.title, "HEU-MET-FAST-001");
    assert_eq!(clean.records, doc.records);
}

fn reference_block(application: u32, e_values: &[f64]) -> String {
    let mut out = format!(
        "\n     Integral Values for Application #{}\n     -----------------------------------\n",
        application
    );
    out.push_str("     Experiment   Type   Value   s.d.   c(k)   s.d.   E   s.d.   E(fis)   s.d.   E(cap)   s.d.   E(sct)   s.d.\n");
    out.push_str("     ----------   ----   -----   ----   ----   ----   -   ----   ------   ----   ------   ----   ------   ----\n");
    for (row, e) in e_values.iter().enumerate() {
        out.push_str(&format!(
            "        {}   sys-{}.sdf   k   1.00000E+00 0.00000E+00 {:.5E} 2.00000E-03 {:.5E} 3.00000E-03 {:.5E} 4.00000E-03 {:.5E} 5.00000E-03 {:.5E} 6.00000E-03\n",
            row, row, e, e, e, e, e
        ));
    }
    out
}

#[test]
fn test_reference_output_four_rows() {
    let text = format!(
        "TSUNAMI-IP summary\n{}{}",
        reference_block(1, &[1.0, 0.95, 0.5, 0.25]),
        reference_block(2, &[1.0, 0.4, 0.3, 0.2])
    );
    let m = parse_integral_output(&text).expect("reference output should parse");
    assert_eq!(m.num_experiments(), 3);
    assert_eq!(m.num_applications(), 2);

    // row 1 of the table is experiment 0
    let e = m.e(EType::Total).get(0, 0).unwrap();
    assert!((e.nominal() - 0.95).abs() < 1e-12);
    assert!((e.uncertainty() - 3.0e-3).abs() < 1e-12);
    assert!((m.c_k.get(2, 1).unwrap().nominal() - 0.2).abs() < 1e-12);
    assert!((m.e(EType::Scatter).get(1, 1).unwrap().uncertainty() - 6.0e-3).abs() < 1e-12);
}

#[test]
fn test_read_reference_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tsunami_ip.out");
    std::fs::write(&path, reference_block(1, &[1.0, 0.7])).unwrap();
    let m = read_integral_output(&path).unwrap();
    assert_eq!(m.num_experiments(), 1);

    std::fs::write(&path, "no tables here").unwrap();
    let err = read_integral_output(&path).unwrap_err();
    assert!(err.to_string().contains("tsunami_ip.out"));
}
