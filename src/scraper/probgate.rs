use crate::config::Credentials;
use crate::cutoff::ContestCutoff;
use crate::model::{ProbgateContest, ProbgateProblem, ScraperError};
use crate::parser::ProbgateParser;
use crate::parser::probgate_parser::ProblemRow;
use crate::scraper::traits::{ContestGate, PackageSource};
use crate::storage::{ArchiveExtractor, CatalogStore};
use crate::utils::pause;
use reqwest::header::REFERER;
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

const EXPORT_OPTIONS: &[(&str, &str)] = &[
    ("statement", "on"),
    ("analysis", "on"),
    ("render", "on"),
    ("attachments", "on"),
    ("tests", "on"),
    ("grader", "on"),
    ("scorer", "on"),
    ("validator", "on"),
    ("solutions", "on"),
    ("generators", "on"),
    ("submissions", "on"),
    ("archive", "zip"),
    ("export", "Export"),
];

/// A logged-in Probgate session. Dropping it discards the session cookies.
pub struct ProbgateClient {
    client: Client,
    base_url: String,
    parser: ProbgateParser,
    delay: Duration,
}

impl ProbgateClient {
    /// Exchanges credentials for a cookie session. Any failure here is fatal
    /// for the run.
    pub async fn login(base_url: &str, credentials: &Credentials, delay: Duration) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) UsacoProbgateSync/0.1")
            .cookie_store(true)
            .timeout(Duration::from_secs(60))
            .build()?;
        let session = Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            parser: ProbgateParser::new(),
            delay,
        };

        let login_url = session.url("login.php");
        session
            .client
            .get(&login_url)
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(|e| ScraperError::AuthFailed(e.to_string()))?;
        pause(session.delay).await;

        let form = [
            ("user", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];
        let response = session
            .client
            .post(&login_url)
            .header(REFERER, login_url.as_str())
            .form(&form)
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(|e| ScraperError::AuthFailed(e.to_string()))?;
        let body = response
            .text()
            .await
            .map_err(|e| ScraperError::AuthFailed(e.to_string()))?;

        if session.parser.is_login_rejected(&body) {
            return Err(ScraperError::AuthFailed(
                "login rejected, check PROBGATE_USERNAME / PROBGATE_PASSWORD".into(),
            ));
        }

        info!("Logged in to Probgate as {}", credentials.username);
        Ok(session)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_html(&self, url: &str) -> Result<String, ScraperError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ScraperError::InvalidResponse(response.status().as_u16()));
        }
        Ok(response.text().await?)
    }
}

#[async_trait::async_trait]
impl PackageSource for ProbgateClient {
    /// Downloads the full export package of a problem as zip bytes.
    async fn export_problem(&self, problem_id: &str) -> Result<Vec<u8>, ScraperError> {
        let export_url = self.url(&format!("probgate/export.php?pid={}", problem_id));
        let response = self
            .client
            .post(&export_url)
            .header(REFERER, export_url.as_str())
            .form(EXPORT_OPTIONS)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ScraperError::InvalidResponse(response.status().as_u16()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait::async_trait]
impl ContestGate for ProbgateClient {
    async fn list_contests(&self) -> Result<Vec<ProbgateContest>, ScraperError> {
        let html = self.get_html(&self.url("contest/contestgate.php")).await?;
        let rows = self.parser.parse_contest_list(&html)?;
        pause(self.delay).await;

        let mut contests = Vec::new();
        for row in rows {
            let Some(info) = self.parser.parse_contest_info(&row.name) else {
                warn!("Contest name '{}' does not match expected format", row.name);
                continue;
            };
            contests.push(ProbgateContest {
                contest_id: row.id,
                name: row.name,
                month: info.month,
                year: info.year,
                division: info.division,
                problems: Vec::new(),
            });
        }
        Ok(contests)
    }

    async fn list_problems(&self, contest_id: &str) -> Result<Vec<ProbgateProblem>, ScraperError> {
        let html = self
            .get_html(&self.url(&format!("contest/config.php?cid={}", contest_id)))
            .await?;
        let rows = self.parser.parse_contest_problems(&html)?;
        pause(self.delay).await;

        Ok(resolve_links(self, rows, self.delay).await)
    }

    async fn resolve_linked_problem(&self, problem_id: &str) -> Result<Option<String>, ScraperError> {
        let html = self
            .get_html(&self.url(&format!("probgate/edit.php?pid={}", problem_id)))
            .await?;
        Ok(self.parser.parse_linked_problem(&html)?)
    }
}

/// Turns contest rows into problems, replacing each link row's id with the
/// id it points at. Only one level is followed; an unresolved or failed
/// lookup keeps the row's own id.
pub async fn resolve_links(gate: &dyn ContestGate, rows: Vec<ProblemRow>, delay: Duration) -> Vec<ProbgateProblem> {
    let mut problems = Vec::with_capacity(rows.len());
    for row in rows {
        let mut problem_id = row.problem_id;
        if row.is_link {
            match gate.resolve_linked_problem(&problem_id).await {
                Ok(Some(target)) => {
                    info!("Problem {} (ID: {}) is a link to problem {}", row.name, problem_id, target);
                    problem_id = target;
                }
                Ok(None) => warn!("Link problem {} has no target, keeping its own id", problem_id),
                Err(e) => warn!("Error checking if problem {} is a link: {}", problem_id, e),
            }
            pause(delay).await;
        }
        problems.push(ProbgateProblem {
            problem_id,
            name: row.name,
        });
    }
    problems
}

/// Brings the persisted contest list up to date.
///
/// Contests past the cutoff are skipped, contests already on disk are reused
/// as-is, and the whole list is rewritten after each newly fetched contest so
/// an interrupted run resumes where it stopped. If the contest gate itself
/// cannot be listed, the contests already on disk are returned unchanged.
pub async fn sync_contests(
    gate: &dyn ContestGate,
    store: &CatalogStore,
    cutoff: ContestCutoff,
    delay: Duration,
) -> Result<Vec<ProbgateContest>, ScraperError> {
    let on_disk = store.load_contests();

    let listed = match gate.list_contests().await {
        Ok(listed) => listed,
        Err(e) => {
            warn!("Error listing Probgate contests, keeping {} saved contests: {}", on_disk.len(), e);
            return Ok(on_disk);
        }
    };

    let existing: HashMap<String, ProbgateContest> =
        on_disk.into_iter().map(|c| (c.contest_id.clone(), c)).collect();
    let mut contests = Vec::new();

    for mut contest in listed {
        if !cutoff.includes(&contest) {
            info!("Skipping {} (ID: {}) - after cutoff date or invalid date", contest.name, contest.contest_id);
            continue;
        }
        if let Some(known) = existing.get(&contest.contest_id) {
            info!("Skipping {} (ID: {}) - already scraped", contest.name, contest.contest_id);
            contests.push(known.clone());
            continue;
        }

        info!("Scraping {} (ID: {})...", contest.name, contest.contest_id);
        contest.problems = match gate.list_problems(&contest.contest_id).await {
            Ok(problems) => problems,
            Err(e) => {
                warn!("Error fetching problems for contest {}: {}", contest.contest_id, e);
                Vec::new()
            }
        };
        contests.push(contest);

        if let Err(e) = store.save_contests(&contests) {
            warn!("Failed to save contest progress: {}", e);
        }
        pause(delay).await;
    }

    store.save_contests(&contests)?;
    info!("Saved {} contests to {}", contests.len(), store.contests_path().display());
    Ok(contests)
}

/// Downloads and extracts the package of every problem not yet on disk.
/// Returns how many packages were extracted.
pub async fn download_archives(
    source: &dyn PackageSource,
    contests: &[ProbgateContest],
    extractor: &ArchiveExtractor,
    delay: Duration,
) -> usize {
    let mut extracted = 0;
    for problem in contests.iter().flat_map(|c| c.problems.iter()) {
        if extractor.is_extracted(&problem.problem_id) {
            info!("Skipping problem {} (ID: {}) - already downloaded", problem.name, problem.problem_id);
            continue;
        }

        info!("Downloading problem {} (ID: {})...", problem.name, problem.problem_id);
        match source.export_problem(&problem.problem_id).await {
            Ok(bytes) => match extractor.extract(&problem.problem_id, &bytes) {
                Ok(dir) => {
                    info!("Extracted problem {} into {}", problem.problem_id, dir.display());
                    extracted += 1;
                }
                Err(e) => warn!("Error extracting ZIP for problem {}: {}", problem.problem_id, e),
            },
            Err(e) => warn!("Error downloading problem {}: {}", problem.problem_id, e),
        }
        pause(delay).await;
    }
    extracted
}
