//! Scraper configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is valid:
//!
//! ```toml
//! base_url = "https://finance.yahoo.com"
//! output_dir = "out"
//! log_dir = "logs"
//! row_policy = "strict"
//! time_basis = "utc"
//! ```

use crate::error::ScrapeError;
use crate::period::TimeBasis;
use crate::scrape::{RowPolicy, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScraperConfig {
    /// Host serving the history pages.
    pub base_url: String,
    pub user_agent: String,
    /// Directory for `{symbol}_historical_prices.json`.
    pub output_dir: PathBuf,
    /// Directory for `{operation}_{MM_DD_YYYY}_error.log`.
    pub log_dir: PathBuf,
    pub row_policy: RowPolicy,
    pub time_basis: TimeBasis,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            output_dir: PathBuf::from("."),
            log_dir: PathBuf::from("."),
            row_policy: RowPolicy::default(),
            time_basis: TimeBasis::default(),
        }
    }
}

impl ScraperConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ScrapeError> {
        let content = std::fs::read_to_string(path).map_err(|e| ScrapeError::io(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ScrapeError> {
        toml::from_str(content).map_err(|e| ScrapeError::Config(format!("parse config TOML: {e}")))
    }
}
