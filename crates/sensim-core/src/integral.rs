//! Integral similarity indices as reported by the reference tool.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::quantity::Quantity;
use crate::record::ReactionFilter;

/// Which reactions an E index is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EType {
    Total,
    Fission,
    Capture,
    Scatter,
}

impl EType {
    pub const ALL: [EType; 4] = [EType::Total, EType::Fission, EType::Capture, EType::Scatter];

    /// Short name used in reports and configuration.
    pub fn label(self) -> &'static str {
        match self {
            EType::Total => "total",
            EType::Fission => "fission",
            EType::Capture => "capture",
            EType::Scatter => "scatter",
        }
    }

    /// Records that feed this index. Scattering uses the `elastic` profiles.
    pub fn reaction_filter(self) -> ReactionFilter {
        match self {
            EType::Total => ReactionFilter::All,
            EType::Fission => ReactionFilter::only("fission"),
            EType::Capture => ReactionFilter::only("capture"),
            EType::Scatter => ReactionFilter::only("elastic"),
        }
    }
}

impl std::fmt::Display for EType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for EType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        EType::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown E type '{}'", s))
    }
}

/// Per-pair integral indices, experiments by applications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegralIndexMatrix {
    /// Correlation coefficient c(k) from the data covariance.
    pub c_k: Matrix<Quantity>,
    /// E over every reaction.
    pub e_total: Matrix<Quantity>,
    /// E over fission reactions.
    pub e_fission: Matrix<Quantity>,
    /// E over capture reactions.
    pub e_capture: Matrix<Quantity>,
    /// E over scattering reactions.
    pub e_scatter: Matrix<Quantity>,
}

impl IntegralIndexMatrix {
    /// Bundle the five matrices, which must share a shape.
    pub fn new(
        c_k: Matrix<Quantity>,
        e_total: Matrix<Quantity>,
        e_fission: Matrix<Quantity>,
        e_capture: Matrix<Quantity>,
        e_scatter: Matrix<Quantity>,
    ) -> Result<Self> {
        let shape = c_k.shape();
        for (name, m) in [
            ("E total", &e_total),
            ("E fission", &e_fission),
            ("E capture", &e_capture),
            ("E scatter", &e_scatter),
        ] {
            if m.shape() != shape {
                return Err(Error::ShapeMismatch {
                    context: name.to_string(),
                    expected: format!("{}x{}", shape.0, shape.1),
                    actual: format!("{}x{}", m.rows(), m.cols()),
                });
            }
        }
        Ok(Self {
            c_k,
            e_total,
            e_fission,
            e_capture,
            e_scatter,
        })
    }

    /// The E matrix for one reaction grouping.
    pub fn e(&self, e_type: EType) -> &Matrix<Quantity> {
        match e_type {
            EType::Total => &self.e_total,
            EType::Fission => &self.e_fission,
            EType::Capture => &self.e_capture,
            EType::Scatter => &self.e_scatter,
        }
    }

    /// Rows of every matrix.
    pub fn num_experiments(&self) -> usize {
        self.c_k.rows()
    }

    /// Columns of every matrix.
    pub fn num_applications(&self) -> usize {
        self.c_k.cols()
    }
}
