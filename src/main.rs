mod config;
mod cutoff;
mod matcher;
mod model;
mod normalizer;
mod parser;
mod scraper;
mod storage;
mod utils;

use clap::{Parser, Subcommand};
use config::{AppConfig, Credentials, load_config};
use cutoff::ContestCutoff;
use matcher::{ManualOverrides, MappingReport, Matcher};
use model::{AppError, UsacoProblem};
use crate::scraper::{Discovery, ProblemArchive, ProbgateClient, UsacoScraper, download_archives, sync_contests};
use std::path::PathBuf;
use std::process::ExitCode;
use storage::{ArchiveExtractor, CatalogStore};
use tracing::{error, info, warn};

/// Scrapes usaco.org and Probgate and links their problem ids.
#[derive(Parser, Debug)]
#[command(name = "usaco-probgate")]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Discover new usaco.org problems and rewrite the USACO catalog
    Usaco,
    /// Log in to Probgate, sync contests and download problem packages
    Probgate {
        /// Do not download problem packages
        #[arg(long)]
        skip_archives: bool,
    },
    /// Match Probgate problems to USACO ids and write the mapping
    Map,
    /// usaco, probgate and map in sequence
    All,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt::init();

    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error ({}): {}", cli.config.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let store = CatalogStore::new(&config.data_dir);

    let result = match cli.command {
        Command::Usaco => scrape_usaco(&config, &store).await,
        Command::Probgate { skip_archives } => scrape_probgate(&config, &store, skip_archives).await,
        Command::Map => generate_mapping(&config, &store),
        Command::All => run_all(&config, &store).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Run aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_all(config: &AppConfig, store: &CatalogStore) -> Result<(), AppError> {
    scrape_usaco(config, store).await?;
    scrape_probgate(config, store, false).await?;
    generate_mapping(config, store)
}

/// Probes usaco.org past the highest known id and rewrites the catalog.
async fn scrape_usaco(config: &AppConfig, store: &CatalogStore) -> Result<(), AppError> {
    let mut catalog = store.load_usaco()?;
    let last_known_id = catalog.keys().next_back().copied().unwrap_or(0);
    info!("USACO catalog has {} problems, last id {}", catalog.len(), last_known_id);

    let discovery = Discovery::new(
        UsacoScraper::new(&config.usaco_base_url)?,
        last_known_id,
        config.max_gap,
        config.request_delay(),
    );
    let added = discovery.list_records().await?;
    let added_count = added.len();
    for problem in added {
        catalog.insert(problem.id, problem);
    }

    store.save_usaco(&catalog)?;
    info!(
        "Added {} problems, saved {} to {}",
        added_count,
        catalog.len(),
        store.usaco_path().display()
    );
    Ok(())
}

/// Authenticates, syncs contests incrementally and fetches packages.
/// Missing credentials or a rejected login abort the run.
async fn scrape_probgate(config: &AppConfig, store: &CatalogStore, skip_archives: bool) -> Result<(), AppError> {
    let credentials = Credentials::from_env()?;
    let session = ProbgateClient::login(&config.probgate_base_url, &credentials, config.request_delay()).await?;

    let cutoff = ContestCutoff::new(config.cutoff);
    let contests = sync_contests(&session, store, cutoff, config.request_delay()).await?;

    if skip_archives || !config.download_archives {
        info!("Skipping problem package downloads");
        return Ok(());
    }

    info!("Downloading problem files...");
    let extractor = ArchiveExtractor::new(store.problems_dir());
    let extracted = download_archives(&session, &contests, &extractor, config.request_delay()).await;
    info!("Extracted {} problem packages", extracted);
    Ok(())
}

/// Runs the matcher over the persisted catalogs. Nothing is written unless
/// the whole pass completes.
fn generate_mapping(config: &AppConfig, store: &CatalogStore) -> Result<(), AppError> {
    let mut overrides = ManualOverrides::builtin();
    if let Some(path) = &config.overrides_file {
        let extra = ManualOverrides::load(path)?;
        if extra.is_empty() {
            warn!("Override file {} has no entries", path.display());
        }
        info!("Loaded {} manual overrides from {}", extra.len(), path.display());
        overrides.extend(extra);
    }

    let records: Vec<UsacoProblem> = store.load_usaco()?.into_values().collect();
    let contests = store.read_contests()?;
    if records.is_empty() {
        warn!("USACO catalog is empty, only manual overrides can match");
    }

    let report = MappingReport::build(&Matcher::new(overrides), &contests, &records);

    store.save_mapping(&report.mapping)?;
    store.save_unmatched(&report.unmatched)?;

    info!("Generated mapping for {} problems", report.mapping.len());
    info!("Found {} errors", report.unmatched.len());
    for entry in &report.unmatched {
        warn!("{}", entry);
    }
    Ok(())
}
