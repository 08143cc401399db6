//! Application and experiment systems loaded from SDF files.

use std::path::Path;

use sensim_core::{Quantity, ReactionFilter, RegionIntegratedIndex, SdfDocument, SensitivityRecord};
use sensim_parser::{read_region_integrated, region_integrated_document};

use crate::error::Result;
use crate::vector::{build_sensitivity_vector, select_records};

/// The region-integrated profiles of one SDF file.
///
/// Two systems with the same `source` are the same sample, which is what
/// decides whether their similarity keeps correlated uncertainty.
#[derive(Debug, Clone)]
pub struct SdfSystem {
    name: String,
    source: String,
    document: SdfDocument,
    index: RegionIntegratedIndex,
}

impl SdfSystem {
    /// Read an SDF file, keeping its region-integrated profiles.
    ///
    /// Fails if the file is malformed or repeats an (isotope, reaction) pair.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = read_region_integrated(path)?;
        let source = std::fs::canonicalize(path)
            .unwrap_or_else(|_| path.to_path_buf())
            .display()
            .to_string();
        let fallback = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.clone());
        Self::build(source, fallback, document)
    }

    /// Wrap an already parsed document. Zoned profiles are dropped.
    pub fn from_document(source: impl Into<String>, document: SdfDocument) -> Result<Self> {
        let source = source.into();
        Self::build(source.clone(), source, region_integrated_document(document))
    }

    fn build(source: String, fallback_name: String, document: SdfDocument) -> Result<Self> {
        let index = RegionIntegratedIndex::from_records(document.records.iter().cloned())?;
        let name = if document.title.is_empty() {
            fallback_name
        } else {
            document.title.clone()
        };
        Ok(Self {
            name,
            source,
            document,
            index,
        })
    }

    /// Display name: the SDF title, or the file stem for untitled files.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identity of the underlying file.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn document(&self) -> &SdfDocument {
        &self.document
    }

    /// Profiles keyed by isotope and reaction.
    pub fn index(&self) -> &RegionIntegratedIndex {
        &self.index
    }

    /// Region-integrated profiles in file order.
    pub fn records(&self) -> &[SensitivityRecord] {
        &self.document.records
    }

    pub fn num_groups(&self) -> usize {
        self.document.num_groups()
    }

    /// Whether both systems were read from the same file.
    pub fn same_source(&self, other: &SdfSystem) -> bool {
        self.source == other.source
    }

    /// Sensitivity vector over the profiles passing `filter`.
    pub fn sensitivity_vector(&self, filter: &ReactionFilter) -> Vec<Quantity> {
        build_sensitivity_vector(select_records(self.records(), filter))
    }
}

/// Load every file up front so a malformed input fails before any
/// computation starts.
pub fn load_systems<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<SdfSystem>> {
    paths.iter().map(SdfSystem::load).collect()
}
