use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Latest contest (month, two-digit year) that is still scraped from Probgate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CutoffConfig {
    pub month: u32,
    pub year: u32,
}

impl Default for CutoffConfig {
    fn default() -> Self {
        Self { month: 3, year: 25 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub usaco_base_url: String,
    pub probgate_base_url: String,
    pub request_delay_ms: u64,
    pub max_gap: u32,
    pub cutoff: CutoffConfig,
    pub download_archives: bool,
    pub overrides_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data_private"),
            usaco_base_url: "https://usaco.org".into(),
            probgate_base_url: "https://probgate.org".into(),
            request_delay_ms: 120,
            max_gap: 20,
            cutoff: CutoffConfig::default(),
            download_archives: true,
            overrides_file: None,
        }
    }
}

impl AppConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// Probgate login, read from `PROBGATE_USERNAME` / `PROBGATE_PASSWORD`.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingCredential(key))
        };
        Ok(Self {
            username: read("PROBGATE_USERNAME")?,
            password: read("PROBGATE_PASSWORD")?,
        })
    }
}
