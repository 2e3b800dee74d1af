// Core records: USACO problems, Probgate contests, and the error types shared across stages
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSource {
    pub source_string: String,
    pub year: u32,
    /// Contest label as printed on usaco.org, e.g. "US Open" or "December".
    pub contest: String,
    pub division: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemTitle {
    pub title_string: String,
    pub place: u32,
    pub name: String,
}

/// A problem page scraped from usaco.org (catalog A).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsacoProblem {
    pub id: u32,
    pub url: String,
    pub source: ProblemSource,
    #[serde(default = "default_submittable")]
    pub submittable: bool,
    pub title: ProblemTitle,
    #[serde(default = "default_input")]
    pub input: String,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default)]
    pub samples: Vec<Sample>,
}

fn default_submittable() -> bool {
    true
}

fn default_input() -> String {
    "stdin".into()
}

fn default_output() -> String {
    "stdout".into()
}

/// The persisted catalog A file, keyed by problem id in ascending order.
pub type UsacoCatalog = BTreeMap<u32, UsacoProblem>;

/// A problem row of a Probgate contest (catalog B).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbgateProblem {
    pub problem_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbgateContest {
    pub contest_id: String,
    pub name: String,
    /// Month code taken from the contest name, e.g. "DEC" or "OPEN".
    pub month: String,
    /// Two-digit year taken from the contest name.
    pub year: String,
    pub division: String,
    #[serde(default)]
    pub problems: Vec<ProbgateProblem>,
}

/// Mapping from USACO problem id to Probgate problem id.
pub type ProblemMapping = BTreeMap<u32, String>;

/// A Probgate problem the matcher could not place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unmatched {
    pub name: String,
    pub month: String,
    pub year: String,
    pub division: String,
    pub problem_id: String,
    /// Set when a match was found but a later problem took the USACO id.
    pub conflict_with: Option<u32>,
}

impl fmt::Display for Unmatched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Could not find matching USACO problem for Probgate problem: {} ({}{} {}, ID: {})",
            self.name, self.month, self.year, self.division, self.problem_id
        )?;
        if let Some(usaco_id) = self.conflict_with {
            write!(f, " [USACO {} remapped to another problem]", usaco_id)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    InvalidResponse(u16),
    #[error("parse error: {0}")]
    Parse(#[from] ParserError),
    #[error("authentication failed: {0}")]
    AuthFailed(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("HTML parse error: {0}")]
    HtmlParseError(String),
    #[error("missing field: {0}")]
    MissingField(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} must be set")]
    MissingCredential(&'static str),
}

/// Errors that abort a whole run.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scraper(#[from] ScraperError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
