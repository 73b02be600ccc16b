use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::config::SiteConfig;
use crate::error::{Result, ScrapeError};
use crate::fetch::Fetch;
use crate::text::{normalize, rewrite_href};

const NO_SERIES_MARKER: &str = "no-series";
const SEARCH_SERIES_PATH: &str = "/search/series/";

static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("invalid selector: table"));
static ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("invalid selector: tr"));
static LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("invalid selector: a"));

/// Series search URL with two positional `{}` holes: query, then page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fills in the form-encoded query and the zero-based page index.
    pub fn render(&self, query: &str, page: u32) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        self.0
            .replacen("{}", &encoded, 1)
            .replacen("{}", &page.to_string(), 1)
    }

    /// File-safe series name: the path after `/search/series/`, up to the
    /// query string, with `/` turned into `-`.
    pub fn slug(&self) -> String {
        let without_query = self.0.split('?').next().unwrap_or_default();
        let path = match without_query.find("://") {
            Some(scheme_end) => {
                let after_scheme = &without_query[scheme_end + 3..];
                after_scheme
                    .find('/')
                    .map(|idx| &after_scheme[idx..])
                    .unwrap_or_default()
            }
            None => without_query,
        };
        let series_path = path
            .strip_prefix(SEARCH_SERIES_PATH)
            .unwrap_or_else(|| path.trim_start_matches('/'));
        series_path.replace('/', "-")
    }
}

impl std::fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueEntry {
    pub key: String,
    pub template: UrlTemplate,
}

/// Normalized series name -> search template, in catalogue table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesIndex {
    entries: Vec<CatalogueEntry>,
    positions: HashMap<String, usize>,
}

impl SeriesIndex {
    /// Later duplicates overwrite the template but keep the first position.
    pub fn insert(&mut self, key: String, template: UrlTemplate) {
        match self.positions.get(&key) {
            Some(&idx) => self.entries[idx].template = template,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push(CatalogueEntry { key, template });
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&UrlTemplate> {
        self.positions
            .get(key)
            .map(|&idx| &self.entries[idx].template)
    }

    pub fn entries(&self) -> &[CatalogueEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<CatalogueEntry> for SeriesIndex {
    fn from_iter<I: IntoIterator<Item = CatalogueEntry>>(iter: I) -> Self {
        let mut index = Self::default();
        for entry in iter {
            index.insert(entry.key, entry.template);
        }
        index
    }
}

/// Parses the catalogue listing page. The first table row is the header.
pub fn parse_catalogue(site: &SiteConfig, html: &str) -> Result<SeriesIndex> {
    let document = Html::parse_document(html);
    let table = document
        .select(&TABLE)
        .next()
        .ok_or(ScrapeError::MalformedPage { missing: "table" })?;

    let search_prefix = site.series_search_prefix();
    let mut index = SeriesIndex::default();
    for (row_idx, row) in table.select(&ROW).enumerate().skip(1) {
        let Some(link) = row.select(&LINK).next() else {
            tracing::debug!(row = row_idx, "catalogue row without link; skipping");
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            tracing::debug!(row = row_idx, "catalogue link without href; skipping");
            continue;
        };

        let href = match rewrite_href(href) {
            Ok(href) => href,
            Err(err) => {
                tracing::debug!(row = row_idx, %err, "catalogue href not site-relative; skipping");
                continue;
            }
        };
        if href.contains(NO_SERIES_MARKER) {
            continue;
        }

        let title = link.text().collect::<String>();
        let template = UrlTemplate::new(format!("{search_prefix}{href}?query={{}}&page={{}}"));
        index.insert(normalize(&title), template);
    }

    Ok(index)
}

/// Where a built index came from. A cached index may be stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogueSource {
    Live,
    Cache,
}

#[derive(Debug, Clone, Default)]
enum CatalogueState {
    #[default]
    Empty,
    Built(SeriesIndex, CatalogueSource),
}

/// The series catalogue. `build`/`load_cached` move it from empty to built,
/// `reset` moves it back.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    state: CatalogueState,
    cache_path: Option<PathBuf>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persists to `<dir>/catalogue.json` on build.
    pub fn with_cache_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            state: CatalogueState::Empty,
            cache_path: Some(dir.as_ref().join(crate::config::CATALOGUE_CACHE_FILE)),
        }
    }

    pub fn is_built(&self) -> bool {
        matches!(self.state, CatalogueState::Built(..))
    }

    pub fn source(&self) -> Option<CatalogueSource> {
        match &self.state {
            CatalogueState::Built(_, source) => Some(*source),
            CatalogueState::Empty => None,
        }
    }

    pub fn index(&self) -> Option<&SeriesIndex> {
        match &self.state {
            CatalogueState::Built(index, _) => Some(index),
            CatalogueState::Empty => None,
        }
    }

    pub fn lookup(&self, key: &str) -> Option<&UrlTemplate> {
        self.index().and_then(|index| index.get(key))
    }

    /// Fetches and parses the live catalogue page.
    pub async fn build(&mut self, fetcher: &dyn Fetch, site: &SiteConfig) -> Result<()> {
        self.ensure_empty()?;

        let html = fetch_catalogue(fetcher, site).await?;
        self.build_from_html(site, &html)
    }

    pub fn build_from_html(&mut self, site: &SiteConfig, html: &str) -> Result<()> {
        self.ensure_empty()?;
        let index = parse_catalogue(site, html)?;
        self.install_live(index)
    }

    /// Replaces the index with a fresh copy of the live catalogue. The
    /// current index and cache stay in place if fetching or parsing fails.
    pub async fn refresh(&mut self, fetcher: &dyn Fetch, site: &SiteConfig) -> Result<()> {
        let html = fetch_catalogue(fetcher, site).await?;
        let index = parse_catalogue(site, &html)?;
        self.install_live(index)
    }

    fn install_live(&mut self, index: SeriesIndex) -> Result<()> {
        tracing::info!(series = index.len(), "catalogue built");
        if let Some(path) = &self.cache_path {
            crate::persist::write_json_atomic(path, &index.entries)?;
            tracing::debug!(path = %path.display(), "catalogue cached");
        }

        self.state = CatalogueState::Built(index, CatalogueSource::Live);
        Ok(())
    }

    /// Restores a catalogue written by an earlier build. Returns `false` when
    /// there is no cache to restore from.
    pub fn load_cached(&mut self) -> Result<bool> {
        self.ensure_empty()?;

        let Some(path) = &self.cache_path else {
            return Ok(false);
        };
        let Some(entries) = crate::persist::read_json::<Vec<CatalogueEntry>>(path)? else {
            return Ok(false);
        };
        tracing::info!(
            path = %path.display(),
            series = entries.len(),
            "catalogue loaded from cache"
        );
        self.state =
            CatalogueState::Built(entries.into_iter().collect(), CatalogueSource::Cache);
        Ok(true)
    }

    pub fn reset(&mut self) -> Result<()> {
        if !self.is_built() {
            return Ok(());
        }
        self.remove_cache()?;
        Ok(())
    }

    /// Empties the catalogue and deletes the cache file whether or not it
    /// could be decoded. Returns `false` when there was no file.
    pub fn remove_cache(&mut self) -> Result<bool> {
        self.state = CatalogueState::Empty;
        let Some(path) = &self.cache_path else {
            return Ok(false);
        };
        match std::fs::remove_file(path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "catalogue cache removed");
                Ok(true)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(ScrapeError::persistence("remove", path.clone(), err)),
        }
    }

    fn ensure_empty(&self) -> Result<()> {
        if self.is_built() {
            return Err(ScrapeError::AlreadyBuilt);
        }
        Ok(())
    }
}

async fn fetch_catalogue(fetcher: &dyn Fetch, site: &SiteConfig) -> Result<String> {
    let url = site.catalogue_url();
    tracing::info!(%url, "collecting catalogue");
    fetcher.fetch(&url).await?.into_success_body(&url)
}
