use crate::model::{ProbgateContest, ProblemMapping, StorageError, UsacoCatalog, Unmatched};
use crate::utils::write_atomic;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

/// File layout of the data directory. Every save rewrites the whole file.
pub struct CatalogStore {
    root: PathBuf,
}

impl CatalogStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn usaco_path(&self) -> PathBuf {
        self.root.join("usaco").join("problems.json")
    }

    pub fn contests_path(&self) -> PathBuf {
        self.root.join("probgate").join("contests.json")
    }

    pub fn mapping_path(&self) -> PathBuf {
        self.root.join("probgate").join("usaco_to_probgate_mapping.json")
    }

    pub fn unmatched_path(&self) -> PathBuf {
        self.root.join("probgate").join("unmatched.txt")
    }

    pub fn problems_dir(&self) -> PathBuf {
        self.root.join("probgate").join("problems")
    }

    /// A missing file is an empty catalog; a corrupt one is an error so it
    /// is never silently overwritten.
    pub fn load_usaco(&self) -> Result<UsacoCatalog, StorageError> {
        match fs::read_to_string(self.usaco_path()) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(UsacoCatalog::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save_usaco(&self, catalog: &UsacoCatalog) -> Result<(), StorageError> {
        write_json(&self.usaco_path(), catalog)
    }

    /// Missing or unreadable contest files start a fresh sync.
    pub fn load_contests(&self) -> Vec<ProbgateContest> {
        let path = self.contests_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    warn!("Cannot read {}: {}", path.display(), e);
                }
                return Vec::new();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("Ignoring malformed {}: {}", path.display(), e);
            Vec::new()
        })
    }

    /// Strict variant for the matcher, which must not run on a broken file.
    pub fn read_contests(&self) -> Result<Vec<ProbgateContest>, StorageError> {
        let content = fs::read_to_string(self.contests_path())?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_contests(&self, contests: &[ProbgateContest]) -> Result<(), StorageError> {
        write_json(&self.contests_path(), contests)
    }

    pub fn save_mapping(&self, mapping: &ProblemMapping) -> Result<(), StorageError> {
        write_json(&self.mapping_path(), mapping)
    }

    pub fn save_unmatched(&self, unmatched: &[Unmatched]) -> Result<(), StorageError> {
        let mut text = String::new();
        for entry in unmatched {
            text.push_str(&entry.to_string());
            text.push('\n');
        }
        write_atomic(&self.unmatched_path(), text.as_bytes())?;
        Ok(())
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    write_atomic(path, json.as_bytes())?;
    Ok(())
}
