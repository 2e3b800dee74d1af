use crate::model::{ProbgateContest, ProbgateProblem, ScraperError, UsacoProblem};

/// Single-id lookup against usaco.org. `Ok(None)` means "not a problem".
#[async_trait::async_trait]
pub trait ProblemProbe: Send + Sync {
    async fn probe(&self, id: u32) -> Result<Option<UsacoProblem>, ScraperError>;
}

/// Catalog A: newly discovered problem records.
#[async_trait::async_trait]
pub trait ProblemArchive: Send + Sync {
    async fn list_records(&self) -> Result<Vec<UsacoProblem>, ScraperError>;
}

/// Catalog B: an authenticated view of the Probgate contest gate.
#[async_trait::async_trait]
pub trait ContestGate: Send + Sync {
    /// Contests with parsed month/year/division and no problems yet.
    async fn list_contests(&self) -> Result<Vec<ProbgateContest>, ScraperError>;
    /// Problems of one contest, link entries already replaced by their target.
    async fn list_problems(&self, contest_id: &str) -> Result<Vec<ProbgateProblem>, ScraperError>;
    async fn resolve_linked_problem(&self, problem_id: &str) -> Result<Option<String>, ScraperError>;
}

/// Source of problem export packages (zip bytes).
#[async_trait::async_trait]
pub trait PackageSource: Send + Sync {
    async fn export_problem(&self, problem_id: &str) -> Result<Vec<u8>, ScraperError>;
}
