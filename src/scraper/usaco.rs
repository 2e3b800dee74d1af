use crate::model::{ScraperError, UsacoProblem};
use crate::parser::UsacoParser;
use crate::scraper::traits::{ProblemArchive, ProblemProbe};
use crate::utils::pause;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct UsacoScraper {
    client: Client,
    base_url: String,
    parser: UsacoParser,
}

impl UsacoScraper {
    pub fn new(base_url: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) UsacoProbgateSync/0.1")
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            parser: UsacoParser::new(),
        })
    }

    fn build_url(&self, id: u32) -> String {
        format!("{}/index.php?page=viewproblem2&cpid={}", self.base_url, id)
    }
}

#[async_trait::async_trait]
impl ProblemProbe for UsacoScraper {
    async fn probe(&self, id: u32) -> Result<Option<UsacoProblem>, ScraperError> {
        let url = self.build_url(id);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ScraperError::InvalidResponse(response.status().as_u16()));
        }

        let html = response.text().await?;
        Ok(self.parser.parse(id, &url, &html)?)
    }
}

/// Probes sequential ids after `last_known_id` until `max_gap` probes in a
/// row fail.
pub struct Discovery<P> {
    probe: P,
    last_known_id: u32,
    max_gap: u32,
    delay: Duration,
}

impl<P: ProblemProbe> Discovery<P> {
    pub fn new(probe: P, last_known_id: u32, max_gap: u32, delay: Duration) -> Self {
        Self {
            probe,
            last_known_id,
            max_gap,
            delay,
        }
    }
}

#[async_trait::async_trait]
impl<P: ProblemProbe> ProblemArchive for Discovery<P> {
    async fn list_records(&self) -> Result<Vec<UsacoProblem>, ScraperError> {
        let mut found = Vec::new();
        let mut current_id = self.last_known_id + 1;
        let mut consecutive_failures = 0;

        while consecutive_failures < self.max_gap {
            match self.probe.probe(current_id).await {
                Ok(Some(problem)) => {
                    info!(
                        "id {}: {} (#{} from {})",
                        problem.id, problem.title.name, problem.title.place, problem.source.source_string
                    );
                    consecutive_failures = 0;
                    found.push(problem);
                }
                Ok(None) => {
                    debug!("id {}: not a problem", current_id);
                    consecutive_failures += 1;
                }
                Err(e) => {
                    warn!("Error processing problem {}: {}", current_id, e);
                    consecutive_failures += 1;
                }
            }
            current_id += 1;
            pause(self.delay).await;
        }

        info!(
            "Discovery stopped at id {} after {} consecutive failures, {} new problems",
            current_id - 1,
            consecutive_failures,
            found.len()
        );
        Ok(found)
    }
}
