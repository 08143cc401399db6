//! Comparison report generation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use sensim_core::format::{format_quantity, format_sci};
use sensim_core::{EType, Matrix, Measurement, Quantity};

use super::difference::{max_abs_finite, relative_difference};
use crate::error::Result;

/// Columns of a comparison table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    /// Automatic-mode E with its propagated uncertainty.
    Calculated,
    /// Uncertainty of manual-mode E.
    ManualUncertainty,
    /// E read from the reference output.
    Reference,
    /// Relative difference of the nominal values.
    RelativeDifferenceMean,
    /// Relative difference of manual and reference uncertainties.
    RelativeDifferenceUncertainty,
}

impl Attribute {
    pub const ALL: [Attribute; 5] = [
        Attribute::Calculated,
        Attribute::ManualUncertainty,
        Attribute::Reference,
        Attribute::RelativeDifferenceMean,
        Attribute::RelativeDifferenceUncertainty,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Attribute::Calculated => "Calculated",
            Attribute::ManualUncertainty => "Manual Uncertainty",
            Attribute::Reference => "Reference",
            Attribute::RelativeDifferenceMean => "Relative Difference in Mean",
            Attribute::RelativeDifferenceUncertainty => "Relative Difference in Manual Uncertainty",
        }
    }
}

/// One (experiment, application) entry of a table.
///
/// Output only: non-finite differences are written to JSON as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonCell {
    /// Automatic-mode E.
    pub calculated: Measurement,
    /// Standard deviation of manual-mode E.
    pub manual_uncertainty: f64,
    /// E from the reference output.
    pub reference: Measurement,
    /// Relative difference of `calculated` and `reference` nominal values.
    pub relative_difference_mean: f64,
    /// Relative difference of `manual_uncertainty` and the reference
    /// standard deviation.
    pub relative_difference_uncertainty: f64,
}

impl ComparisonCell {
    /// Compare automatic and manual E with the reference value.
    pub fn new(calculated: &Quantity, manual: &Quantity, reference: &Quantity) -> Self {
        Self {
            calculated: calculated.measurement(),
            manual_uncertainty: manual.uncertainty(),
            reference: reference.measurement(),
            relative_difference_mean: relative_difference(calculated.nominal(), reference.nominal()),
            relative_difference_uncertainty: relative_difference(
                manual.uncertainty(),
                reference.uncertainty(),
            ),
        }
    }

    /// Text form of one attribute, e.g. `9.876E-01+/-1.23E-03`.
    pub fn formatted(&self, attribute: Attribute) -> String {
        match attribute {
            Attribute::Calculated => format_quantity(&Quantity::from(self.calculated), 3, 2),
            Attribute::ManualUncertainty => format_sci(self.manual_uncertainty, 2),
            Attribute::Reference => format_quantity(&Quantity::from(self.reference), 3, 2),
            Attribute::RelativeDifferenceMean => format_sci(self.relative_difference_mean, 4),
            Attribute::RelativeDifferenceUncertainty => {
                format_sci(self.relative_difference_uncertainty, 4)
            }
        }
    }
}

/// Summary statistics for one table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonSummary {
    /// Number of cells compared.
    pub total_cells: usize,
    /// Largest finite relative difference in the mean, by magnitude.
    pub max_relative_difference_mean: Option<f64>,
    /// Largest finite relative difference in the uncertainty, by magnitude.
    pub max_relative_difference_uncertainty: Option<f64>,
    /// Cells whose mean difference is NaN or infinite.
    pub non_finite_cells: usize,
}

impl ComparisonSummary {
    fn of(cells: &Matrix<ComparisonCell>) -> Self {
        let cells = cells.as_slice();
        Self {
            total_cells: cells.len(),
            max_relative_difference_mean: max_abs_finite(cells.iter().map(|c| c.relative_difference_mean)),
            max_relative_difference_uncertainty: max_abs_finite(
                cells.iter().map(|c| c.relative_difference_uncertainty),
            ),
            non_finite_cells: cells
                .iter()
                .filter(|c| !c.relative_difference_mean.is_finite())
                .count(),
        }
    }
}

/// Comparison of one E type, experiments by applications.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonTable {
    /// Reaction grouping of this table.
    pub e_type: EType,
    /// Row labels.
    pub experiments: Vec<String>,
    /// Column labels.
    pub applications: Vec<String>,
    /// Experiments by applications.
    pub cells: Matrix<ComparisonCell>,
    pub summary: ComparisonSummary,
}

impl ComparisonTable {
    pub fn new(
        e_type: EType,
        experiments: Vec<String>,
        applications: Vec<String>,
        cells: Matrix<ComparisonCell>,
    ) -> Self {
        let summary = ComparisonSummary::of(&cells);
        Self {
            e_type,
            experiments,
            applications,
            cells,
            summary,
        }
    }

    /// Cell for experiment `row` and application `col`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&ComparisonCell> {
        self.cells.get(row, col)
    }

    /// Format as human-readable text, one line per cell.
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "E ({}): {} experiments x {} applications\n",
            self.e_type,
            self.experiments.len(),
            self.applications.len()
        ));
        let max = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format_sci(v, 4));
        out.push_str(&format!(
            "Max relative difference: mean {}, uncertainty {}\n",
            max(self.summary.max_relative_difference_mean),
            max(self.summary.max_relative_difference_uncertainty)
        ));
        if self.summary.non_finite_cells > 0 {
            out.push_str(&format!(
                "Non-finite cells: {}\n",
                self.summary.non_finite_cells
            ));
        }
        out.push('\n');

        let mut rows: Vec<Vec<String>> = vec![
            ["Experiment", "Application"]
                .into_iter()
                .chain(Attribute::ALL.iter().map(|a| a.label()))
                .map(str::to_string)
                .collect(),
        ];
        for (i, j, cell) in self.cells.iter() {
            let mut row = vec![label(&self.experiments, i), label(&self.applications, j)];
            row.extend(Attribute::ALL.iter().map(|&a| cell.formatted(a)));
            rows.push(row);
        }

        let widths: Vec<usize> = (0..rows[0].len())
            .map(|k| rows.iter().map(|r| r[k].len()).max().unwrap_or(0))
            .collect();
        for row in &rows {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(text, &w)| format!("{:<w$}", text))
                .collect();
            out.push_str("  ");
            out.push_str(line.join("  ").trim_end());
            out.push('\n');
        }

        out
    }
}

fn label(names: &[String], k: usize) -> String {
    names.get(k).cloned().unwrap_or_else(|| k.to_string())
}

/// Complete comparison report.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    /// Path to the reference output (if from file).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_path: Option<PathBuf>,
    /// One table per compared E type, in configuration order.
    pub tables: Vec<ComparisonTable>,
}

impl ComparisonReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self {
            reference_path: None,
            tables: Vec::new(),
        }
    }

    pub fn add_table(&mut self, table: ComparisonTable) {
        self.tables.push(table);
    }

    /// The table for one E type.
    pub fn table(&self, e_type: EType) -> Option<&ComparisonTable> {
        self.tables.iter().find(|t| t.e_type == e_type)
    }

    /// Serialize to pretty-printed JSON. Non-finite numbers become `null`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Format as human-readable text.
    pub fn to_text(&self) -> String {
        let mut out = String::from("Comparison Report\n");
        if let Some(ref path) = self.reference_path {
            out.push_str(&format!("Reference: {}\n", path.display()));
        }

        for table in &self.tables {
            out.push('\n');
            out.push_str(&table.to_text());
        }

        out
    }
}

impl Default for ComparisonReport {
    fn default() -> Self {
        Self::new()
    }
}
