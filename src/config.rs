use crate::feed::filter::FilterSettings;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "config.toml";
const CONFIG_PATH_ENV: &str = "GRAMBRANDT_CONFIG";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub filters: FilterSettings,
    #[serde(default)]
    pub feed: FeedConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_search_url")]
    pub search_url: String,
    /// Sent as `AIC-User-Agent` so the API can identify the calling site.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_search_url() -> String {
    "https://api.artic.edu/api/v1/artworks/search".to_string()
}

fn default_user_agent() -> String {
    "grambrandt.com".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    /// Cards from the end of the list at which the next page is requested.
    #[serde(default = "default_prefetch_distance")]
    pub prefetch_distance: usize,
}

fn default_prefetch_distance() -> usize {
    3
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            prefetch_distance: default_prefetch_distance(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Like `load`, but a missing file yields the defaults. A file that exists
    /// and fails to parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .with_context(|| "Failed to parse config TOML")?;
        if let (Some(min), Some(max)) = (config.filters.min_year, config.filters.max_year) {
            if min > max {
                anyhow::bail!("filters.min_year ({}) is after filters.max_year ({})", min, max);
            }
        }
        Ok(config)
    }

    /// Config path: `GRAMBRANDT_CONFIG` if set, else `config.toml`.
    pub fn path_from_env() -> PathBuf {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(p) if !p.trim().is_empty() => PathBuf::from(p.trim()),
            _ => PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }
}
