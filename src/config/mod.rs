//! Configuration management.
//!
//! All endpoints and mirror base URLs are explicit configuration values
//! rather than hidden process-wide constants, so tests can substitute
//! mock servers. Configuration is read from a TOML file with a
//! `PAPER_SCOUT_` environment variable layer on top.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::sources::DblpEndpoints;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// DBLP search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Mirror resolution settings
    #[serde(default)]
    pub mirrors: MirrorConfig,

    /// CrossRef title lookup settings
    #[serde(default)]
    pub crossref: CrossRefConfig,

    /// Download and logging settings
    #[serde(default)]
    pub downloads: DownloadConfig,
}

/// DBLP search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Publication search endpoint
    #[serde(default = "default_publ_api")]
    pub publication_api: String,

    /// Author search endpoint
    #[serde(default = "default_author_api")]
    pub author_api: String,

    /// Venue search endpoint
    #[serde(default = "default_venue_api")]
    pub venue_api: String,

    /// Default number of results to request
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl SearchConfig {
    /// The three endpoint base URLs for the DBLP client.
    pub fn endpoints(&self) -> DblpEndpoints {
        DblpEndpoints {
            publication: self.publication_api.clone(),
            author: self.author_api.clone(),
            venue: self.venue_api.clone(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            publication_api: default_publ_api(),
            author_api: default_author_api(),
            venue_api: default_venue_api(),
            max_results: default_max_results(),
        }
    }
}

fn default_publ_api() -> String {
    "https://dblp.org/search/publ/api".to_string()
}

fn default_author_api() -> String {
    "https://dblp.org/search/author/api".to_string()
}

fn default_venue_api() -> String {
    "https://dblp.org/search/venue/api".to_string()
}

fn default_max_results() -> usize {
    100
}

/// Mirror resolution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Mirror base URLs, tried in order; first successful extraction wins
    #[serde(default = "default_mirrors")]
    pub bases: Vec<String>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            bases: default_mirrors(),
        }
    }
}

fn default_mirrors() -> Vec<String> {
    vec![
        "https://sci-hub.se/".to_string(),
        "https://sci-hub.st/".to_string(),
        "https://sci-hub.ru/".to_string(),
        "https://sci-hub.wf/".to_string(),
    ]
}

/// CrossRef configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossRefConfig {
    /// Works API base URL
    #[serde(default = "default_crossref_api")]
    pub api_base: String,
}

impl Default for CrossRefConfig {
    fn default() -> Self {
        Self {
            api_base: default_crossref_api(),
        }
    }
}

fn default_crossref_api() -> String {
    "https://api.crossref.org".to_string()
}

/// Download configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Directory PDFs are written to (created if absent)
    #[serde(default = "default_download_dir")]
    pub dir: PathBuf,

    /// Append-only log of successful retrievals (`doi -> filename`)
    #[serde(default = "default_success_log")]
    pub success_log: PathBuf,

    /// Append-only log of failed retrievals (one DOI per line)
    #[serde(default = "default_failed_log")]
    pub failed_log: PathBuf,

    /// Minimum delay between DOIs in batch mode, in seconds
    #[serde(default = "default_delay_min")]
    pub delay_min_secs: f64,

    /// Maximum delay between DOIs in batch mode, in seconds
    #[serde(default = "default_delay_max")]
    pub delay_max_secs: f64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            dir: default_download_dir(),
            success_log: default_success_log(),
            failed_log: default_failed_log(),
            delay_min_secs: default_delay_min(),
            delay_max_secs: default_delay_max(),
        }
    }
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("Downloaded_Papers")
}

fn default_success_log() -> PathBuf {
    PathBuf::from("success.log")
}

fn default_failed_log() -> PathBuf {
    PathBuf::from("failed.log")
}

fn default_delay_min() -> f64 {
    3.0
}

fn default_delay_max() -> f64 {
    7.0
}

/// Load configuration from a file, with `PAPER_SCOUT_*` environment
/// variables layered on top.
pub fn load_config(path: &PathBuf) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .add_source(config::Environment::with_prefix("PAPER_SCOUT").separator("__"))
        .build()?;

    settings.try_deserialize()
}

/// Look for a config file in conventional locations: `./paper-scout.toml`,
/// then `<config dir>/paper-scout/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("paper-scout.toml");
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("paper-scout").join("config.toml"))
        .filter(|path| path.is_file())
}
