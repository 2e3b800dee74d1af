use crate::model::StorageError;
use crate::normalizer::{normalize_month, normalize_year};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Exact lookup key: raw Probgate problem name plus normalized contest scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OverrideKey {
    pub name: String,
    pub month: String,
    pub year: String,
    pub division: String,
}

impl OverrideKey {
    /// Builds a key, normalizing month and year so "22" and "2022" agree.
    pub fn new(name: &str, month: &str, year: &str, division: &str) -> Self {
        Self {
            name: name.to_string(),
            month: normalize_month(month).to_string(),
            year: normalize_year(year),
            division: division.to_string(),
        }
    }
}

/// One row of an override file.
#[derive(Debug, Deserialize)]
struct OverrideEntry {
    name: String,
    month: String,
    year: String,
    division: String,
    usaco_id: u32,
}

/// Hand-maintained pairs that substring matching gets wrong.
#[derive(Debug, Clone, Default)]
pub struct ManualOverrides {
    entries: HashMap<OverrideKey, u32>,
}

impl ManualOverrides {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Pairs known to fail automatic matching on the live catalogs.
    pub fn builtin() -> Self {
        let mut overrides = Self::empty();
        overrides.insert(OverrideKey::new("Photoshoot 3", "OPEN", "2022", "Bronze"), 1346);
        overrides.insert(OverrideKey::new("Hoof Paper Scissors", "JAN", "2017", "Bronze"), 688);
        overrides.insert(OverrideKey::new("Marathon Cheating (Bronze)", "DEC", "2014", "Bronze"), 494);
        overrides
    }

    /// Reads a JSON array of `{name, month, year, division, usaco_id}`.
    pub fn load(path: &Path) -> Result<Self, StorageError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, StorageError> {
        let rows: Vec<OverrideEntry> = serde_json::from_str(content)?;
        let mut overrides = Self::empty();
        for row in rows {
            overrides.insert(
                OverrideKey::new(&row.name, &row.month, &row.year, &row.division),
                row.usaco_id,
            );
        }
        Ok(overrides)
    }

    pub fn insert(&mut self, key: OverrideKey, usaco_id: u32) {
        self.entries.insert(key, usaco_id);
    }

    /// Adds every entry of `other`; its values win on equal keys.
    pub fn extend(&mut self, other: ManualOverrides) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, key: &OverrideKey) -> Option<u32> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
