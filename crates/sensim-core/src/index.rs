//! Nested `isotope -> reaction -> profile` lookup for region-integrated data.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::SensitivityRecord;

/// How the two levels of a [`RegionIntegratedIndex`] are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyScheme {
    /// Isotope name, then reaction name (`u-235` / `fission`).
    #[default]
    Names,
    /// ZAID, then MT number (`92235` / `18`).
    Numbers,
}

impl KeyScheme {
    fn keys(self, record: &SensitivityRecord) -> (String, String) {
        match self {
            KeyScheme::Names => (record.isotope.clone(), record.reaction_type.clone()),
            KeyScheme::Numbers => (record.zaid.to_string(), record.reaction_mt.to_string()),
        }
    }
}

/// What to do when two profiles share the same key pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail with [`Error::DuplicateKey`].
    #[default]
    Reject,
    /// Keep the later profile (logged at warn level).
    Overwrite,
}

/// Reactions derived from (or summing) other reactions.
///
/// Including them in a decomposition counts the same physics twice, e.g.
/// `capture` is the sum of `n,gamma` and the other absorption channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedundantReactions {
    /// Reaction names treated as redundant.
    #[serde(default)]
    pub names: Vec<String>,
    /// MT numbers treated as redundant.
    #[serde(default)]
    pub mts: Vec<u32>,
}

impl Default for RedundantReactions {
    fn default() -> Self {
        Self {
            names: vec!["total".to_string(), "capture".to_string()],
            mts: vec![1, 101],
        }
    }
}

impl RedundantReactions {
    /// No reaction is redundant.
    pub fn none() -> Self {
        Self {
            names: Vec::new(),
            mts: Vec::new(),
        }
    }

    /// Whether a profile describes a redundant reaction.
    pub fn is_redundant(&self, record: &SensitivityRecord) -> bool {
        self.names.iter().any(|n| *n == record.reaction_type) || self.mts.contains(&record.reaction_mt)
    }
}

/// Region-integrated profiles keyed by isotope, then reaction.
///
/// Insertion order is preserved at both levels, so iterating two indexes
/// built from files with the same layout yields profiles in the same order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionIntegratedIndex {
    entries: IndexMap<String, IndexMap<String, SensitivityRecord>>,
}

impl RegionIntegratedIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index keyed by names, rejecting duplicate pairs.
    pub fn from_records(records: impl IntoIterator<Item = SensitivityRecord>) -> Result<Self> {
        Self::from_records_with(records, KeyScheme::Names, DuplicatePolicy::Reject)
    }

    /// Build an index with an explicit key scheme and duplicate policy.
    pub fn from_records_with(
        records: impl IntoIterator<Item = SensitivityRecord>,
        scheme: KeyScheme,
        policy: DuplicatePolicy,
    ) -> Result<Self> {
        let mut index = Self::new();
        for record in records {
            let (isotope, reaction) = scheme.keys(&record);
            index.insert_keyed(isotope, reaction, record, policy)?;
        }
        Ok(index)
    }

    /// Insert a profile under its names.
    pub fn insert(&mut self, record: SensitivityRecord, policy: DuplicatePolicy) -> Result<()> {
        let (isotope, reaction) = KeyScheme::Names.keys(&record);
        self.insert_keyed(isotope, reaction, record, policy)
    }

    fn insert_keyed(
        &mut self,
        isotope: String,
        reaction: String,
        record: SensitivityRecord,
        policy: DuplicatePolicy,
    ) -> Result<()> {
        let reactions = self.entries.entry(isotope.clone()).or_default();
        if reactions.contains_key(&reaction) {
            match policy {
                DuplicatePolicy::Reject => {
                    return Err(Error::DuplicateKey {
                        isotope,
                        reaction_type: reaction,
                    });
                }
                DuplicatePolicy::Overwrite => {
                    log::warn!("overwriting duplicate profile for {} {}", isotope, reaction);
                }
            }
        }
        reactions.insert(reaction, record);
        Ok(())
    }

    /// Look up a single profile.
    pub fn get(&self, isotope: &str, reaction: &str) -> Option<&SensitivityRecord> {
        self.entries.get(isotope).and_then(|r| r.get(reaction))
    }

    /// Whether the isotope has any profile.
    pub fn contains_isotope(&self, isotope: &str) -> bool {
        self.entries.contains_key(isotope)
    }

    /// Isotope keys in insertion order.
    pub fn isotopes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Profiles of one isotope keyed by reaction, in insertion order.
    pub fn reactions(&self, isotope: &str) -> Option<&IndexMap<String, SensitivityRecord>> {
        self.entries.get(isotope)
    }

    /// Every profile in insertion order.
    pub fn records(&self) -> impl Iterator<Item = &SensitivityRecord> {
        self.entries.values().flat_map(|r| r.values())
    }

    /// Number of isotopes.
    pub fn num_isotopes(&self) -> usize {
        self.entries.len()
    }

    /// Total number of profiles.
    pub fn len(&self) -> usize {
        self.entries.values().map(IndexMap::len).sum()
    }

    /// True when the index holds no profiles.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A copy without redundant reactions. Isotopes left with no reactions
    /// are dropped.
    pub fn without_redundant(&self, redundant: &RedundantReactions) -> Self {
        let entries = self
            .entries
            .iter()
            .filter_map(|(isotope, reactions)| {
                let kept: IndexMap<String, SensitivityRecord> = reactions
                    .iter()
                    .filter(|(_, record)| !redundant.is_redundant(record))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                (!kept.is_empty()).then(|| (isotope.clone(), kept))
            })
            .collect();
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::record;

    fn sample() -> Vec<SensitivityRecord> {
        vec![
            record("u-235", "total", 1, &[0.3, 0.2]),
            record("u-235", "fission", 18, &[0.2, 0.1]),
            record("u-235", "capture", 101, &[-0.1, -0.05]),
            record("h-1", "elastic", 2, &[0.05, 0.02]),
        ]
    }

    #[test]
    fn test_from_records_names() {
        let index = RegionIntegratedIndex::from_records(sample()).unwrap();
        assert_eq!(index.num_isotopes(), 2);
        assert_eq!(index.len(), 4);
        assert_eq!(index.isotopes().collect::<Vec<_>>(), vec!["u-235", "h-1"]);
        assert_eq!(index.get("u-235", "fission").unwrap().reaction_mt, 18);
        assert!(index.get("u-238", "fission").is_none());
    }

    #[test]
    fn test_from_records_numbers() {
        let index = RegionIntegratedIndex::from_records_with(
            sample().into_iter().take(3),
            KeyScheme::Numbers,
            DuplicatePolicy::Reject,
        )
        .unwrap();
        assert_eq!(index.get("92235", "18").unwrap().reaction_type, "fission");
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut records = sample();
        records.push(record("u-235", "fission", 18, &[9.0, 9.0]));
        let err = RegionIntegratedIndex::from_records(records.clone()).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { ref isotope, .. } if isotope == "u-235"));

        let index = RegionIntegratedIndex::from_records_with(
            records,
            KeyScheme::Names,
            DuplicatePolicy::Overwrite,
        )
        .unwrap();
        assert_eq!(index.get("u-235", "fission").unwrap().sensitivities[0].nominal(), 9.0);
    }

    #[test]
    fn test_without_redundant() {
        let index = RegionIntegratedIndex::from_records(sample()).unwrap();
        let filtered = index.without_redundant(&RedundantReactions::default());
        assert_eq!(filtered.len(), 2);
        assert!(filtered.get("u-235", "total").is_none());
        assert!(filtered.get("u-235", "capture").is_none());
        assert!(filtered.get("h-1", "elastic").is_some());

        let untouched = index.without_redundant(&RedundantReactions::none());
        assert_eq!(untouched, index);
    }

    #[test]
    fn test_isotope_dropped_when_empty() {
        let index =
            RegionIntegratedIndex::from_records(vec![record("o-16", "total", 1, &[0.1])]).unwrap();
        let filtered = index.without_redundant(&RedundantReactions::default());
        assert!(filtered.is_empty());
        assert!(!filtered.contains_isotope("o-16"));
    }
}
