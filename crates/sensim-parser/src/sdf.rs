//! Sensitivity data file (SDF) reader and writer.
//!
//! An SDF starts with a free-form title line, declares the number of energy
//! groups, lists the group boundaries, and then holds one block per profile:
//!
//! ```text
//! u-235        fission            92235    18      <- isotope reaction zaid mt
//!          0         0                             <- zone number, zone volume
//!  0.000000E+00 0.000000E+00         0         0   <- ignored
//!  3.000000E-01 3.000000E-03 3.000000E-01 0.000000E+00 0.000000E+00
//!  1.000000E-01 2.000000E-01 1.000000E-02 2.000000E-02
//! ```
//!
//! The fourth line carries the energy-integrated sensitivity (value, s.d.),
//! the absolute sum of the group-wise values, and the opposite-sign sum
//! (value, s.d.). It is followed by `2G` reals: the `G` group-wise
//! sensitivities, then their `G` standard deviations.

use std::path::Path;

use sensim_core::format::format_sdf_real;
use sensim_core::{Quantity, SdfDocument, SensitivityRecord};

use crate::error::{Error, Result};
use crate::scan::{
    IN_MEMORY, file_label, is_isotope_name, is_reaction_name, parse_bounded_uint, parse_real_line,
    parse_sci_real, parse_signed_int, read_text,
};

/// Marker preceded by the declared group count.
pub const NUM_GROUPS_MARKER: &str = "number of neutron groups";
/// Marker followed by the energy-group boundaries.
pub const ENERGY_BOUNDARIES_MARKER: &str = "energy boundaries:";

const REALS_PER_LINE: usize = 5;

/// Parse SDF text held in memory.
pub fn parse_sdf(text: &str) -> Result<SdfDocument> {
    parse_sdf_named(text, IN_MEMORY)
}

/// Parse SDF text, naming `file` in any error.
pub fn parse_sdf_named(text: &str, file: &str) -> Result<SdfDocument> {
    let lines: Vec<&str> = text.lines().collect();
    let title = lines.first().map(|l| l.trim().to_string()).unwrap_or_default();

    let num_groups = find_num_groups(&lines, file)?;
    let (energy_boundaries, mut cursor) = find_energy_boundaries(&lines, file)?;
    if energy_boundaries.len() != num_groups + 1 {
        return Err(Error::format(
            file,
            format!(
                "expected {} energy boundaries for {} groups, found {}",
                num_groups + 1,
                num_groups,
                energy_boundaries.len()
            ),
        ));
    }

    let mut records = Vec::new();
    while cursor < lines.len() {
        match header_tokens(lines[cursor]) {
            Some(header) => {
                let (record, next) = parse_profile(&lines, cursor, header, num_groups, file)?;
                records.push(record);
                cursor = next;
            }
            None => cursor += 1,
        }
    }

    if records.is_empty() {
        return Err(Error::format(file, "no sensitivity profiles found"));
    }

    log::debug!(
        "{}: {} groups, {} profiles ({} region integrated)",
        file,
        num_groups,
        records.len(),
        records.iter().filter(|r| r.is_region_integrated()).count()
    );

    Ok(SdfDocument {
        title,
        energy_boundaries,
        records,
    })
}

/// Read and parse an SDF file.
pub fn read_sdf(path: impl AsRef<Path>) -> Result<SdfDocument> {
    let path = path.as_ref();
    let text = read_text(path)?;
    parse_sdf_named(&text, &file_label(path))
}

/// Render a document back to SDF text.
///
/// Reals are written with seven significant digits, so documents whose
/// values are representable at that precision parse back unchanged.
pub fn render_sdf(doc: &SdfDocument) -> String {
    let mut out = String::new();
    out.push_str(&doc.title);
    out.push('\n');
    out.push_str(&format!("{:>10}    {}\n", doc.num_groups(), NUM_GROUPS_MARKER));
    out.push_str(&format!(
        "{:>10}    number of sensitivity profiles   {:>10} are region integrated\n",
        doc.records.len(),
        doc.num_region_integrated()
    ));
    out.push_str(&format!("  {}\n", ENERGY_BOUNDARIES_MARKER));
    push_reals(&mut out, doc.energy_boundaries.iter().copied());

    for record in &doc.records {
        out.push_str(&format!(
            "{:<13}{:<17}{:>10}{:>6}\n",
            record.isotope, record.reaction_type, record.zaid, record.reaction_mt
        ));
        out.push_str(&format!(
            "{:>10}{:>14}\n",
            record.zone_number,
            render_volume(record.zone_volume)
        ));
        out.push_str(" 0.000000E+00 0.000000E+00         0         0\n");

        let eis = &record.energy_integrated_sensitivity;
        let opposite = &record.sum_opposite_sign_groupwise_sensitivities;
        push_reals(
            &mut out,
            [
                eis.nominal(),
                eis.uncertainty(),
                record.abs_sum_groupwise_sensitivities.nominal(),
                opposite.nominal(),
                opposite.uncertainty(),
            ],
        );

        let nominals = record.sensitivities.iter().map(Quantity::nominal);
        let std_devs = record.sensitivities.iter().map(Quantity::uncertainty);
        push_reals(&mut out, nominals.chain(std_devs));
    }
    out
}

fn find_num_groups(lines: &[&str], file: &str) -> Result<usize> {
    let (line, pos) = lines
        .iter()
        .find_map(|line| line.find(NUM_GROUPS_MARKER).map(|pos| (*line, pos)))
        .ok_or_else(|| {
            Error::format(file, format!("could not locate '{}'", NUM_GROUPS_MARKER))
        })?;

    let count = line[..pos]
        .split_whitespace()
        .last()
        .and_then(|t| t.parse::<usize>().ok())
        .ok_or_else(|| {
            Error::format(
                file,
                format!("expected an integer before '{}'", NUM_GROUPS_MARKER),
            )
        })?;

    if count == 0 {
        return Err(Error::format(file, "declared zero neutron groups"));
    }
    Ok(count)
}

/// Returns the boundaries and the index of the first line after them.
fn find_energy_boundaries(lines: &[&str], file: &str) -> Result<(Vec<f64>, usize)> {
    let (start, pos) = lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| line.find(ENERGY_BOUNDARIES_MARKER).map(|pos| (i, pos)))
        .ok_or_else(|| {
            Error::format(
                file,
                format!("could not locate '{}' block", ENERGY_BOUNDARIES_MARKER),
            )
        })?;

    let rest = &lines[start][pos + ENERGY_BOUNDARIES_MARKER.len()..];
    let mut values = parse_real_line(rest).ok_or_else(|| {
        Error::format(
            file,
            format!("non-numeric text after '{}'", ENERGY_BOUNDARIES_MARKER),
        )
    })?;

    let (more, next) = collect_reals(lines, start + 1);
    values.extend(more);
    if values.is_empty() {
        return Err(Error::format(
            file,
            format!("empty '{}' block", ENERGY_BOUNDARIES_MARKER),
        ));
    }
    Ok((values, next))
}

/// Consume lines made only of reals, skipping blank lines. Returns the values
/// and the index of the first line that is not part of the block.
fn collect_reals(lines: &[&str], start: usize) -> (Vec<f64>, usize) {
    let mut values = Vec::new();
    let mut i = start;
    while i < lines.len() {
        if lines[i].trim().is_empty() {
            i += 1;
            continue;
        }
        match parse_real_line(lines[i]) {
            Some(reals) => values.extend(reals),
            None => break,
        }
        i += 1;
    }
    (values, i)
}

struct Header<'a> {
    isotope: &'a str,
    reaction_type: &'a str,
    zaid: u32,
    reaction_mt: u32,
}

fn header_tokens(line: &str) -> Option<Header<'_>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let &[isotope, reaction_type, zaid, mt] = tokens.as_slice() else {
        return None;
    };
    if !is_isotope_name(isotope) || !is_reaction_name(reaction_type) {
        return None;
    }
    Some(Header {
        isotope,
        reaction_type,
        zaid: parse_bounded_uint(zaid, 6)?,
        reaction_mt: parse_bounded_uint(mt, 4)?,
    })
}

fn parse_profile(
    lines: &[&str],
    start: usize,
    header: Header<'_>,
    num_groups: usize,
    file: &str,
) -> Result<(SensitivityRecord, usize)> {
    let fail = |offset: usize, what: &str| {
        Error::format(
            file,
            format!(
                "profile '{} {}' at line {}: {}",
                header.isotope,
                header.reaction_type,
                start + offset + 1,
                what
            ),
        )
    };
    let tokens = |offset: usize| {
        lines
            .get(start + offset)
            .map(|l| l.split_whitespace().collect::<Vec<_>>())
            .unwrap_or_default()
    };

    let zone = tokens(1);
    let (zone_number, zone_volume) = match zone.as_slice() {
        [number, volume] => (
            parse_signed_int(number).ok_or_else(|| fail(1, "invalid zone number"))?,
            parse_signed_int(volume)
                .map(|v| v as f64)
                .or_else(|| parse_sci_real(volume))
                .ok_or_else(|| fail(1, "invalid zone volume"))?,
        ),
        _ => return Err(fail(1, "expected zone number and zone volume")),
    };

    let ignored = tokens(2);
    let ignored_ok = matches!(ignored.as_slice(), [a, b, c, d]
        if parse_sci_real(a).is_some()
            && parse_sci_real(b).is_some()
            && parse_signed_int(c).is_some()
            && parse_signed_int(d).is_some());
    if !ignored_ok {
        return Err(fail(2, "expected two reals and two integers"));
    }

    let summary = lines
        .get(start + 3)
        .and_then(|l| parse_real_line(l))
        .filter(|v| v.len() == 5)
        .ok_or_else(|| fail(3, "expected five reals of integrated sensitivity data"))?;

    let (data, next) = collect_reals(lines, start + 4);
    if data.len() != 2 * num_groups {
        return Err(fail(
            4,
            &format!(
                "expected {} group-wise values ({} groups), found {}",
                2 * num_groups,
                num_groups,
                data.len()
            ),
        ));
    }
    let (nominals, std_devs) = data.split_at(num_groups);
    let sensitivities = Quantity::from_parts(nominals, std_devs)?;

    let record = SensitivityRecord {
        isotope: header.isotope.to_string(),
        reaction_type: header.reaction_type.to_string(),
        zaid: header.zaid,
        reaction_mt: header.reaction_mt,
        zone_number,
        zone_volume,
        energy_integrated_sensitivity: Quantity::new(summary[0], summary[1]),
        abs_sum_groupwise_sensitivities: Quantity::exact(summary[2]),
        sum_opposite_sign_groupwise_sensitivities: Quantity::new(summary[3], summary[4]),
        sensitivities,
    };
    Ok((record, next))
}

fn push_reals(out: &mut String, values: impl IntoIterator<Item = f64>) {
    let values: Vec<f64> = values.into_iter().collect();
    for chunk in values.chunks(REALS_PER_LINE) {
        let line: String = chunk.iter().map(|&v| format_sdf_real(v)).collect();
        out.push_str(&line);
        out.push('\n');
    }
}

fn render_volume(volume: f64) -> String {
    if volume.fract() == 0.0 && volume.abs() < 1e15 {
        format!("{:.0}", volume)
    } else {
        format_sdf_real(volume)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const TWO_GROUP_SDF: &str = "\
u235 sphere
         2    number of neutron groups
         2    number of sensitivity profiles            1 are region integrated
  energy boundaries:
  2.000000E+07  1.000000E+00  1.000000E-05
u-235        fission            92235    18
         0         0
 0.000000E+00 0.000000E+00         0         0
 3.000000E-01 3.000000E-03 3.000000E-01 0.000000E+00 0.000000E+00
 1.000000E-01 2.000000E-01 1.000000E-02 2.000000E-02
u-235        fission            92235    18
         1        25
 0.000000E+00 0.000000E+00         0         0
 2.000000E-01 2.000000E-03 2.000000E-01 0.000000E+00 0.000000E+00
 5.000000E-02 1.500000E-01
 5.000000E-03 1.500000E-02
";

    #[test]
    fn test_parse_header_and_boundaries() {
        let doc = parse_sdf(TWO_GROUP_SDF).unwrap();
        assert_eq!(doc.title, "u235 sphere");
        assert_eq!(doc.num_groups(), 2);
        assert_eq!(doc.energy_boundaries, vec![2.0e7, 1.0, 1.0e-5]);
        assert_eq!(doc.records.len(), 2);
        assert_eq!(doc.num_region_integrated(), 1);
    }

    #[test]
    fn test_parse_profile_fields() {
        let doc = parse_sdf(TWO_GROUP_SDF).unwrap();
        let r = &doc.records[0];
        assert_eq!(r.isotope, "u-235");
        assert_eq!(r.reaction_type, "fission");
        assert_eq!(r.zaid, 92235);
        assert_eq!(r.reaction_mt, 18);
        assert!(r.is_region_integrated());
        assert_eq!(r.energy_integrated_sensitivity.nominal(), 0.3);
        assert_eq!(r.energy_integrated_sensitivity.uncertainty(), 0.003);
        assert_eq!(r.abs_sum_groupwise_sensitivities.nominal(), 0.3);
        assert!(r.abs_sum_groupwise_sensitivities.is_exact());
        assert_eq!(Quantity::nominal_values(&r.sensitivities), vec![0.1, 0.2]);
        assert_eq!(Quantity::std_devs(&r.sensitivities), vec![0.01, 0.02]);

        // data split over two lines
        let zoned = &doc.records[1];
        assert_eq!(zoned.zone_number, 1);
        assert_eq!(zoned.zone_volume, 25.0);
        assert_eq!(Quantity::nominal_values(&zoned.sensitivities), vec![0.05, 0.15]);
    }

    #[test]
    fn test_render_round_trip() {
        let doc = parse_sdf(TWO_GROUP_SDF).unwrap();
        let text = render_sdf(&doc);
        let again = parse_sdf(&text).unwrap();
        assert_eq!(again, doc);
        assert_eq!(render_sdf(&again), text);
    }

    #[test]
    fn test_missing_group_count() {
        let text = TWO_GROUP_SDF.replace("number of neutron groups", "groups");
        let err = parse_sdf(&text).unwrap_err();
        assert!(err.to_string().contains("number of neutron groups"));
        assert!(err.to_string().starts_with("<memory>"));
    }

    #[test]
    fn test_missing_energy_boundaries() {
        let text = TWO_GROUP_SDF.replace("energy boundaries:", "boundaries");
        let err = parse_sdf(&text).unwrap_err();
        assert!(err.to_string().contains("energy boundaries"));
    }

    #[test]
    fn test_boundary_count_mismatch() {
        let text = TWO_GROUP_SDF.replace("         2    number of neutron groups", "         3    number of neutron groups");
        let err = parse_sdf(&text).unwrap_err();
        assert!(err.to_string().contains("expected 4 energy boundaries"));
    }

    #[test]
    fn test_group_data_length_mismatch() {
        let text = TWO_GROUP_SDF.replace(
            " 1.000000E-01 2.000000E-01 1.000000E-02 2.000000E-02\n",
            " 1.000000E-01 2.000000E-01 1.000000E-02\n",
        );
        let err = parse_sdf(&text).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("u-235 fission"), "{msg}");
        assert!(msg.contains("expected 4 group-wise values"), "{msg}");
    }

    #[test]
    fn test_malformed_zone_line() {
        let text = TWO_GROUP_SDF.replacen("         0         0\n", "         0\n", 1);
        let err = parse_sdf(&text).unwrap_err();
        assert!(err.to_string().contains("zone"));
    }

    #[test]
    fn test_no_profiles() {
        let text: String = TWO_GROUP_SDF.lines().take(5).collect::<Vec<_>>().join("\n");
        let err = parse_sdf(&text).unwrap_err();
        assert!(err.to_string().contains("no sensitivity profiles"));
    }

    #[test]
    fn test_render_volume() {
        assert_eq!(render_volume(0.0), "0");
        assert_eq!(render_volume(125.0), "125");
        assert_eq!(render_volume(12.5), " 1.250000E+01");
    }
}
