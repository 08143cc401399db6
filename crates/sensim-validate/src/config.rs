//! Comparison configuration and its JSON file form.

use std::path::Path;

use serde::{Deserialize, Serialize};

use sensim_core::EType;
use sensim_similarity::SimilarityConfig;

use crate::error::{Error, Result};

/// Complete comparison configuration.
///
/// ```json
/// {
///   "similarity": { "parallel": { "enabled": false } },
///   "e_types": ["total", "fission"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Settings passed through to the similarity engine.
    pub similarity: SimilarityConfig,
    /// Which E tables to build, in report order.
    pub e_types: Vec<EType>,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            similarity: SimilarityConfig::default(),
            e_types: EType::ALL.to_vec(),
        }
    }
}

impl ComparisonConfig {
    /// Create with custom similarity settings.
    pub fn with_similarity(mut self, similarity: SimilarityConfig) -> Self {
        self.similarity = similarity;
        self
    }

    /// Limit the comparison to specific E types.
    pub fn with_e_types(mut self, e_types: Vec<EType>) -> Self {
        self.e_types = e_types;
        self
    }

    /// Parse and check a JSON configuration.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<()> {
        if self.e_types.is_empty() {
            return Err(Error::InvalidConfig("e_types is empty".to_string()));
        }
        for (k, e_type) in self.e_types.iter().enumerate() {
            if self.e_types[..k].contains(e_type) {
                return Err(Error::InvalidConfig(format!(
                    "e_types lists '{}' more than once",
                    e_type
                )));
            }
        }
        Ok(())
    }
}

/// Load a configuration file from disk.
pub fn load_config(path: &Path) -> Result<ComparisonConfig> {
    if !path.exists() {
        return Err(Error::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = ComparisonConfig::from_json(&content)?;
    log::debug!("loaded comparison config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_covers_every_e_type() {
        let config = ComparisonConfig::default();
        assert_eq!(config.e_types, EType::ALL.to_vec());
        assert!(config.similarity.parallel.enabled);
    }

    #[test]
    fn test_partial_json() {
        let config = ComparisonConfig::from_json(
            r#"{"similarity": {"parallel": {"enabled": false}}, "e_types": ["scatter", "total"]}"#,
        )
        .unwrap();
        assert_eq!(config.e_types, vec![EType::Scatter, EType::Total]);
        assert!(!config.similarity.parallel.enabled);
        assert_eq!(config.similarity.parallel.min_cells_for_parallel, 4);
        assert!(config.similarity.redundant_reactions.names.is_empty());

        let filtered = ComparisonConfig::from_json(
            r#"{"similarity": {"redundant_reactions": {"names": ["total"], "mts": [1]}}}"#,
        )
        .unwrap();
        assert_eq!(filtered.similarity.redundant_reactions.names, vec!["total"]);
    }

    #[test]
    fn test_json_round_trip() {
        let config = ComparisonConfig::default().with_e_types(vec![EType::Capture]);
        let back = ComparisonConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_invalid_configs() {
        let empty = ComparisonConfig::from_json(r#"{"e_types": []}"#).unwrap_err();
        assert!(matches!(empty, Error::InvalidConfig(_)));

        let repeated = ComparisonConfig::from_json(r#"{"e_types": ["total", "total"]}"#).unwrap_err();
        assert!(repeated.to_string().contains("more than once"));

        let unknown = ComparisonConfig::from_json(r#"{"e_types": ["elastic"]}"#).unwrap_err();
        assert!(matches!(unknown, Error::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(load_config(&path), Err(Error::ConfigNotFound { .. })));

        std::fs::write(&path, r#"{"e_types": ["fission"]}"#).unwrap();
        assert_eq!(load_config(&path).unwrap().e_types, vec![EType::Fission]);
    }

    #[test]
    fn test_unreadable_config_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path()).unwrap_err();
        match &err {
            Error::Io { path, .. } => assert_eq!(path, dir.path()),
            other => panic!("expected Io, got {other:?}"),
        }
        assert!(err.to_string().contains(&dir.path().display().to_string()));
    }
}
