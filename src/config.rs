use std::path::PathBuf;

use crate::error::{Result, ScrapeError};

pub const DEFAULT_BASE_URL: &str = "https://www.british-history.ac.uk";
pub const CATALOGUE_CACHE_FILE: &str = "catalogue.json";
pub const USER_AGENT: &str = concat!("bho-scrape/", env!("CARGO_PKG_VERSION"));

/// Where the publication lives. Tests point this at a local stub server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    base_url: String,
}

impl SiteConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed = url::Url::parse(base_url)
            .map_err(|err| ScrapeError::invalid_argument("base_url", err.to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ScrapeError::invalid_argument(
                "base_url",
                format!("must be http/https: {base_url}"),
            ));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn catalogue_url(&self) -> String {
        format!("{}/catalogue", self.base_url)
    }

    /// Prefix every series search template starts with.
    pub fn series_search_prefix(&self) -> String {
        format!("{}/search/series", self.base_url)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScraperConfig {
    pub site: SiteConfig,
    /// Directory holding `catalogue.json`; no persistence when unset.
    pub catalogue_dir: Option<PathBuf>,
    /// Directory receiving one `<slug>.csv` per series; in-memory only when unset.
    pub out_dir: Option<PathBuf>,
    pub show_progress: bool,
}
