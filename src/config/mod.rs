//! Configuration management.

mod file_config;

pub use file_config::{read_config_file, write_config_file, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::engine::DuplicatePolicy;
use crate::models::DEFAULT_RENDER_WIDTH;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "arxiv-checker.toml";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Listing server settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Corpus and matching settings
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Report output settings
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Listing server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Server that hosts the `/list/...` pages
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Categories checked when none are given on the command line
    #[serde(default)]
    pub categories: Vec<String>,

    /// Entries requested per page for recent and monthly listings
    #[serde(default = "default_show")]
    pub show: usize,

    /// Request timeout
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            categories: Vec::new(),
            show: default_show(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl FeedConfig {
    /// `base_url` parsed, with a trailing slash so relative joins keep its path
    pub fn server_url(&self) -> Result<Url, url::ParseError> {
        let mut base = self.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base)
    }
}

fn default_base_url() -> String {
    "https://arxiv.org".to_string()
}

fn default_show() -> usize {
    crate::feed::DEFAULT_SHOW
}

fn default_timeout() -> u64 {
    30
}

/// Matching configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// What to do with a paper listed under several categories
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Column width of rendered papers
    #[serde(default = "default_width")]
    pub width: usize,

    /// Colored headings when writing to a terminal
    #[serde(default = "default_true")]
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            color: true,
        }
    }
}

fn default_width() -> usize {
    DEFAULT_RENDER_WIDTH
}

fn default_true() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from a TOML file, overridden by `ARXIV_CHECKER_*`
/// environment variables (`ARXIV_CHECKER_FEED__SHOW=100`)
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path).format(config::FileFormat::Toml))
        .add_source(
            config::Environment::with_prefix("ARXIV_CHECKER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

/// Find a configuration file in the working directory or the user config dir
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("arxiv-checker").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Get the default configuration
pub fn get_config() -> Config {
    Config::default()
}
