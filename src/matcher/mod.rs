// Matcher module: places Probgate problems onto USACO problem ids.

pub mod mapping;
pub mod overrides;

pub use mapping::MappingReport;
pub use overrides::{ManualOverrides, OverrideKey};

use crate::model::{ProbgateContest, ProbgateProblem, UsacoProblem};
use crate::normalizer::{clean_problem_name, normalize_month, normalize_year};
use tracing::debug;

/// Contest scope both catalogs can be compared on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestScope {
    pub month: String,
    pub year: String,
    pub division: String,
}

impl ContestScope {
    pub fn of_contest(contest: &ProbgateContest) -> Self {
        Self {
            month: normalize_month(&contest.month).to_string(),
            year: normalize_year(&contest.year),
            division: contest.division.clone(),
        }
    }

    pub fn of_problem(problem: &UsacoProblem) -> Self {
        Self {
            month: normalize_month(&problem.source.contest).to_string(),
            year: normalize_year(&problem.source.year.to_string()),
            division: problem.source.division.clone(),
        }
    }
}

pub struct Matcher {
    overrides: ManualOverrides,
}

impl Matcher {
    pub fn new(overrides: ManualOverrides) -> Self {
        Self { overrides }
    }

    /// USACO id for a Probgate problem, or `None`.
    ///
    /// An override entry wins outright. Otherwise the first record, in the
    /// order given, whose scope equals the contest scope and whose cleaned
    /// name contains the cleaned Probgate name is returned. Several records
    /// can contain the same short name; the earliest one wins.
    pub fn find(
        &self,
        problem: &ProbgateProblem,
        contest: &ProbgateContest,
        records: &[UsacoProblem],
    ) -> Option<u32> {
        let key = OverrideKey::new(&problem.name, &contest.month, &contest.year, &contest.division);
        if let Some(usaco_id) = self.overrides.get(&key) {
            debug!("override: {} -> {}", problem.name, usaco_id);
            return Some(usaco_id);
        }

        let name = clean_problem_name(&problem.name);
        let scope = ContestScope::of_contest(contest);

        records
            .iter()
            .find(|record| {
                ContestScope::of_problem(record) == scope
                    && clean_problem_name(&record.title.name).contains(&name)
            })
            .map(|record| record.id)
    }
}
