use crate::matcher::Matcher;
use crate::model::{ProbgateContest, ProbgateProblem, ProblemMapping, UsacoProblem, Unmatched};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Result of one full matching pass. Every Probgate problem ends up in
/// exactly one of the two collections.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MappingReport {
    pub mapping: ProblemMapping,
    pub unmatched: Vec<Unmatched>,
}

impl MappingReport {
    /// Matches every problem of every contest, in file order.
    ///
    /// When a later problem resolves to an already claimed USACO id it takes
    /// the entry, and the displaced earlier problem is reported with the
    /// conflicting id.
    pub fn build(matcher: &Matcher, contests: &[ProbgateContest], records: &[UsacoProblem]) -> Self {
        let mut report = Self::default();
        let mut claimed: HashMap<u32, (&ProbgateProblem, &ProbgateContest)> = HashMap::new();

        for contest in contests {
            for problem in &contest.problems {
                let Some(usaco_id) = matcher.find(problem, contest, records) else {
                    report.unmatched.push(unmatched(problem, contest, None));
                    continue;
                };

                debug!("{} -> {}", usaco_id, problem.problem_id);
                report.mapping.insert(usaco_id, problem.problem_id.clone());
                if let Some((earlier, earlier_contest)) = claimed.insert(usaco_id, (problem, contest)) {
                    warn!(
                        "USACO {} remapped from Probgate {} to {}",
                        usaco_id, earlier.problem_id, problem.problem_id
                    );
                    report.unmatched.push(unmatched(earlier, earlier_contest, Some(usaco_id)));
                }
            }
        }

        report
    }
}

fn unmatched(problem: &ProbgateProblem, contest: &ProbgateContest, conflict_with: Option<u32>) -> Unmatched {
    Unmatched {
        name: problem.name.clone(),
        month: contest.month.clone(),
        year: contest.year.clone(),
        division: contest.division.clone(),
        problem_id: problem.problem_id.clone(),
        conflict_with,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::fixtures::{contest, usaco};
    use crate::matcher::ManualOverrides;
    use crate::model::UsacoCatalog;
    use crate::storage::CatalogStore;
    use std::fs;

    fn records() -> Vec<UsacoProblem> {
        vec![
            usaco(494, 2014, "December", "Bronze", "Marathon"),
            usaco(688, 2017, "January", "Bronze", "Hoof, Paper, Scissors"),
            usaco(1346, 2022, "US Open", "Bronze", "Photoshoot 3"),
            usaco(1347, 2022, "US Open", "Bronze", "Counting Liars"),
        ]
    }

    fn contests() -> Vec<ProbgateContest> {
        vec![
            contest("10", "DEC", "14", "Bronze", &[("901", "Marathon Cheating (Bronze)")]),
            contest("11", "JAN", "17", "Bronze", &[("902", "Hoof Paper Scissors"), ("903", "Not Last")]),
            contest("12", "OPEN", "22", "Bronze", &[("904", "Photoshoot 3"), ("905", "Counting Liars")]),
        ]
    }

    #[test]
    fn every_problem_is_mapped_or_reported_once() {
        let report = MappingReport::build(&Matcher::new(ManualOverrides::builtin()), &contests(), &records());

        let expected: ProblemMapping = [
            (494, "901".to_string()),
            (688, "902".to_string()),
            (1346, "904".to_string()),
            (1347, "905".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(report.mapping, expected);
        assert_eq!(report.unmatched.len(), 1);
        assert_eq!(report.unmatched[0].problem_id, "903");
        assert_eq!(
            report.unmatched[0].to_string(),
            "Could not find matching USACO problem for Probgate problem: Not Last (JAN17 Bronze, ID: 903)"
        );

        let total: usize = contests().iter().map(|c| c.problems.len()).sum();
        assert_eq!(report.mapping.len() + report.unmatched.len(), total);
    }

    #[test]
    fn automatic_match_without_overrides() {
        let report = MappingReport::build(&Matcher::new(ManualOverrides::empty()), &contests()[2..], &records());
        assert_eq!(report.mapping.get(&1346).map(String::as_str), Some("904"));
        assert!(report.unmatched.is_empty());
    }

    #[test]
    fn later_problem_takes_duplicate_target() {
        let contests = vec![contest("1", "OPEN", "22", "Bronze", &[("a", "Photoshoot"), ("b", "Photoshoot 3")])];
        let report = MappingReport::build(&Matcher::new(ManualOverrides::empty()), &contests, &records());

        assert_eq!(report.mapping.get(&1346).map(String::as_str), Some("b"));
        assert_eq!(report.unmatched.len(), 1);
        assert_eq!(report.unmatched[0].problem_id, "a");
        assert_eq!(report.unmatched[0].conflict_with, Some(1346));
        assert_eq!(
            report.unmatched[0].to_string(),
            "Could not find matching USACO problem for Probgate problem: Photoshoot (OPEN22 Bronze, ID: a) \
             [USACO 1346 remapped to another problem]"
        );
    }

    #[test]
    fn three_way_conflict_keeps_last_and_reports_the_rest() {
        let contests = vec![
            contest("1", "OPEN", "22", "Bronze", &[("a", "Photoshoot")]),
            contest("2", "OPEN", "22", "Bronze", &[("b", "Photo"), ("c", "Photoshoot 3")]),
        ];
        let report = MappingReport::build(&Matcher::new(ManualOverrides::empty()), &contests, &records());

        assert_eq!(report.mapping.len(), 1);
        assert_eq!(report.mapping.get(&1346).map(String::as_str), Some("c"));
        let displaced: Vec<&str> = report.unmatched.iter().map(|u| u.problem_id.as_str()).collect();
        assert_eq!(displaced, vec!["a", "b"]);
        assert!(report.unmatched.iter().all(|u| u.conflict_with == Some(1346)));
    }

    #[test]
    fn empty_inputs_give_empty_report() {
        let report = MappingReport::build(&Matcher::new(ManualOverrides::builtin()), &[], &records());
        assert_eq!(report, MappingReport::default());
    }

    #[test]
    fn rerun_on_same_files_writes_identical_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::new(dir.path());
        let catalog: UsacoCatalog = records().into_iter().map(|r| (r.id, r)).collect();
        store.save_usaco(&catalog).unwrap();
        store.save_contests(&contests()).unwrap();

        let run = || {
            let records: Vec<UsacoProblem> = store.load_usaco().unwrap().into_values().collect();
            let contests = store.read_contests().unwrap();
            let report = MappingReport::build(&Matcher::new(ManualOverrides::builtin()), &contests, &records);
            store.save_mapping(&report.mapping).unwrap();
            store.save_unmatched(&report.unmatched).unwrap();
            fs::read(store.mapping_path()).unwrap()
        };

        let first = run();
        let second = run();
        assert_eq!(first, second);

        let raw: serde_json::Value = serde_json::from_slice(&first).unwrap();
        assert_eq!(raw["494"], "901");
        assert_eq!(raw.as_object().unwrap().len(), 4);
    }
}
