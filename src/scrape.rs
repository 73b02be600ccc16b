use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use scraper::Html;
use serde_json::Value;

use crate::catalogue::{Catalogue, UrlTemplate};
use crate::config::{ScraperConfig, SiteConfig};
use crate::error::{Result, ScrapeError};
use crate::fetch::Fetch;
use crate::page::{has_last_page_link, last_page_in, parse_results, results_in};
use crate::resolve::resolve_series;
use crate::store::SeriesStore;
use crate::table::ResultTable;

/// Series names or queries, always as a non-empty list of non-blank strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgList(Vec<String>);

impl ArgList {
    pub fn new(name: &str, items: Vec<String>) -> Result<Self> {
        if items.is_empty() {
            return Err(ScrapeError::invalid_argument(name, "must not be empty"));
        }
        if let Some(idx) = items.iter().position(|item| item.trim().is_empty()) {
            return Err(ScrapeError::invalid_argument(
                name,
                format!("item {idx} is blank"),
            ));
        }
        Ok(Self(items))
    }

    pub fn one(name: &str, item: &str) -> Result<Self> {
        Self::new(name, vec![item.to_owned()])
    }

    /// Accepts a JSON string or an array of strings; anything else is rejected.
    pub fn from_value(name: &str, value: &Value) -> Result<Self> {
        match value {
            Value::String(item) => Self::one(name, item),
            Value::Array(items) => {
                let items = items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| {
                        item.as_str().map(str::to_owned).ok_or_else(|| {
                            ScrapeError::invalid_argument(
                                name,
                                format!("item {idx} must be a string, got {item}"),
                            )
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Self::new(name, items)
            }
            other => Err(ScrapeError::invalid_argument(
                name,
                format!("must be a string or a list of strings, got {other}"),
            )),
        }
    }

    /// `"[a, b]"` or a bare `"a"`, as typed on the command line.
    pub fn parse_bracketed(name: &str, text: &str) -> Result<Self> {
        let inner = text
            .trim()
            .trim_start_matches('[')
            .trim_end_matches(']');
        let items = inner
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect();
        Self::new(name, items)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoResultsReason {
    UnknownSeries,
    FirstPageUnavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairStatus {
    Collected {
        /// Highest page index advertised by the first page.
        last_page: u32,
        records: usize,
        /// Pages after the first that failed and were left out.
        skipped_pages: Vec<u32>,
    },
    NoResults(NoResultsReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairOutcome {
    pub query: String,
    pub status: PairStatus,
}

impl PairOutcome {
    pub fn has_results(&self) -> bool {
        matches!(self.status, PairStatus::Collected { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesOutcome {
    pub series: String,
    pub slug: Option<String>,
    pub pairs: Vec<PairOutcome>,
    pub rows_added: usize,
    pub total_rows: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub series: Vec<SeriesOutcome>,
    pub pages_fetched: u64,
}

impl BatchReport {
    pub fn pairs_without_results(&self) -> usize {
        self.series
            .iter()
            .flat_map(|series| &series.pairs)
            .filter(|pair| !pair.has_results())
            .count()
    }
}

/// Drives catalogue resolution and result-page collection for batches of
/// (series, query) pairs. Everything runs sequentially: series in order,
/// queries in order, pages in increasing index.
pub struct SeriesScraper {
    fetcher: Arc<dyn Fetch>,
    site: SiteConfig,
    catalogue: Catalogue,
    store: SeriesStore,
    show_progress: bool,
    pages_fetched: u64,
}

impl SeriesScraper {
    pub fn new(fetcher: Arc<dyn Fetch>, config: ScraperConfig) -> Self {
        let catalogue = match &config.catalogue_dir {
            Some(dir) => Catalogue::with_cache_dir(dir),
            None => Catalogue::new(),
        };
        let store = match &config.out_dir {
            Some(dir) => SeriesStore::with_out_dir(dir),
            None => SeriesStore::in_memory(),
        };
        Self {
            fetcher,
            site: config.site,
            catalogue,
            store,
            show_progress: config.show_progress,
            pages_fetched: 0,
        }
    }

    pub fn store(&self) -> &SeriesStore {
        &self.store
    }

    /// Result pages fetched over the scraper's lifetime.
    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched
    }

    /// Validates loosely typed input before touching the network.
    pub async fn scrape_values(&mut self, series: &Value, queries: &Value) -> Result<BatchReport> {
        let series = ArgList::from_value("series", series)?;
        let queries = ArgList::from_value("queries", queries)?;
        self.scrape(&series, &queries).await
    }

    pub async fn scrape(&mut self, series: &ArgList, queries: &ArgList) -> Result<BatchReport> {
        let pages_before = self.pages_fetched;
        let mut report = BatchReport::default();

        for name in series.iter() {
            let outcome = self.scrape_one_series(name, queries).await?;
            report.series.push(outcome);
        }

        report.pages_fetched = self.pages_fetched - pages_before;
        tracing::info!(
            series = report.series.len(),
            pages = report.pages_fetched,
            without_results = report.pairs_without_results(),
            "batch finished"
        );
        Ok(report)
    }

    async fn scrape_one_series(&mut self, name: &str, queries: &ArgList) -> Result<SeriesOutcome> {
        let mut slug: Option<String> = None;
        let mut pairs = Vec::with_capacity(queries.len());
        let mut series_table = ResultTable::new();

        for query in queries.iter() {
            tracing::info!(series = name, query, "searching");
            let resolved =
                match resolve_series(&mut self.catalogue, self.fetcher.as_ref(), &self.site, name)
                    .await
                {
                    Ok(resolved) => resolved,
                    Err(err @ ScrapeError::UnknownSeries { .. }) => {
                        tracing::warn!(
                            series = name,
                            query,
                            %err,
                            "no results: series not in catalogue"
                        );
                        pairs.push(PairOutcome {
                            query: query.to_owned(),
                            status: PairStatus::NoResults(NoResultsReason::UnknownSeries),
                        });
                        continue;
                    }
                    Err(err) => return Err(err),
                };
            slug.get_or_insert_with(|| resolved.slug.clone());

            let (status, table) = self.collect_query(&resolved.template, query).await;
            series_table.append(table);
            pairs.push(PairOutcome {
                query: query.to_owned(),
                status,
            });
        }

        let mut outcome = SeriesOutcome {
            series: name.to_owned(),
            slug: slug.clone(),
            pairs,
            rows_added: 0,
            total_rows: 0,
        };

        let collected = outcome.pairs.iter().any(PairOutcome::has_results);
        match slug {
            Some(slug) if collected => {
                series_table.dedup();
                outcome.rows_added = self.store.merge(&slug, series_table)?;
                outcome.total_rows = self.store.get(&slug).map_or(0, ResultTable::len);
            }
            _ => tracing::warn!(series = name, "no results for any query"),
        }

        Ok(outcome)
    }

    /// Collects every page of one query. Failures stay scoped to the pair:
    /// an unusable first page means no results, a failing later page is
    /// skipped and recorded.
    async fn collect_query(
        &mut self,
        template: &UrlTemplate,
        query: &str,
    ) -> (PairStatus, ResultTable) {
        let first_url = template.render(query, 0);
        let first_page = match self.fetch_page(&first_url).await {
            Ok(html) => html,
            Err(err) => return no_results(query, &first_url, err),
        };
        let (mut records, last_page) = {
            let document = Html::parse_document(&first_page);
            let records = match results_in(&document) {
                Ok(records) => records,
                Err(err) => return no_results(query, &first_url, err),
            };
            if !has_last_page_link(&document) {
                tracing::debug!(query, "no pager on first page; treating as single page");
            }
            (records, last_page_in(&document))
        };

        let progress = self.progress_bar(query, u64::from(last_page) + 1);
        progress.inc(1);

        let mut skipped_pages = Vec::new();
        for page in 1..=last_page {
            let url = template.render(query, page);
            let parsed = match self.fetch_page(&url).await {
                Ok(html) => parse_results(&html),
                Err(err) => Err(err),
            };
            match parsed {
                Ok(page_records) => {
                    tracing::debug!(query, page, records = page_records.len(), "page parsed");
                    records.extend(page_records);
                }
                Err(err) => {
                    tracing::warn!(query, page, %url, %err, "skipping result page");
                    skipped_pages.push(page);
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        let table = ResultTable::from_records(query, records);
        let status = PairStatus::Collected {
            last_page,
            records: table.len(),
            skipped_pages,
        };
        (status, table)
    }

    async fn fetch_page(&mut self, url: &str) -> Result<String> {
        let response = self.fetcher.fetch(url).await?;
        self.pages_fetched += 1;
        response.into_success_body(url)
    }

    fn progress_bar(&self, query: &str, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("{msg} [{elapsed_precise}] [{bar:40}] {pos}/{len} pages")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        bar.set_message(query.to_owned());
        bar
    }
}

fn no_results(query: &str, url: &str, err: ScrapeError) -> (PairStatus, ResultTable) {
    tracing::warn!(query, %url, %err, "no results: first page unavailable");
    (
        PairStatus::NoResults(NoResultsReason::FirstPageUnavailable(err.to_string())),
        ResultTable::new(),
    )
}
