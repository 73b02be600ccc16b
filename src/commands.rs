use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use serde::Deserialize;

use crate::catalogue::Catalogue;
use crate::cli::{BatchArgs, CatalogueArgs, CatalogueLookupArgs, ScrapeArgs, SiteArgs};
use crate::config::{ScraperConfig, SiteConfig};
use crate::fetch::HttpFetcher;
use crate::resolve::resolve_series;
use crate::scrape::{ArgList, BatchReport, SeriesScraper};

pub async fn scrape(args: ScrapeArgs) -> anyhow::Result<()> {
    let series = ArgList::parse_bracketed("series", &args.series)?;
    let queries = ArgList::parse_bracketed("queries", &args.queries)?;
    let out_dir = PathBuf::from(&args.path);

    let config = scraper_config(&args.site, &out_dir, !args.no_progress)?;
    let mut scraper = SeriesScraper::new(http_fetcher()?, config);
    let report = scraper.scrape(&series, &queries).await.context("scrape series")?;

    print_banner(&out_dir, &report);
    Ok(())
}

#[derive(Debug, Deserialize)]
struct BatchFile {
    series: serde_json::Value,
    queries: serde_json::Value,
    out: String,
}

pub async fn batch(args: BatchArgs) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("read batch file: {}", args.file))?;
    let batch: BatchFile = serde_json::from_str(&raw).context("parse batch file")?;
    let out_dir = PathBuf::from(&batch.out);

    let config = scraper_config(&args.site, &out_dir, !args.no_progress)?;
    let mut scraper = SeriesScraper::new(http_fetcher()?, config);
    let report = scraper
        .scrape_values(&batch.series, &batch.queries)
        .await
        .context("scrape series")?;

    print_banner(&out_dir, &report);
    Ok(())
}

pub async fn catalogue_build(args: CatalogueArgs) -> anyhow::Result<()> {
    let site = SiteConfig::new(&args.site.base_url)?;
    let mut catalogue = Catalogue::with_cache_dir(&args.site.catalogue_dir);
    if catalogue.load_cached().context("load cached catalogue")? {
        anyhow::bail!(
            "catalogue already cached at {}; run `catalogue reset` first",
            args.site.catalogue_dir
        );
    }

    let fetcher = HttpFetcher::new()?;
    catalogue
        .build(&fetcher, &site)
        .await
        .context("build catalogue")?;

    let count = catalogue.index().map_or(0, |index| index.len());
    println!("{count} series cached in {}", args.site.catalogue_dir);
    Ok(())
}

pub fn catalogue_reset(args: CatalogueArgs) -> anyhow::Result<()> {
    let mut catalogue = Catalogue::with_cache_dir(&args.site.catalogue_dir);
    if !catalogue.remove_cache().context("reset catalogue")? {
        println!("no cached catalogue in {}", args.site.catalogue_dir);
        return Ok(());
    }
    println!("catalogue cache removed from {}", args.site.catalogue_dir);
    Ok(())
}

pub async fn catalogue_lookup(args: CatalogueLookupArgs) -> anyhow::Result<()> {
    let site = SiteConfig::new(&args.site.base_url)?;
    let mut catalogue = Catalogue::with_cache_dir(&args.site.catalogue_dir);
    let fetcher = HttpFetcher::new()?;

    let resolved = resolve_series(&mut catalogue, &fetcher, &site, &args.series)
        .await
        .context("resolve series")?;
    println!("{}\t{}", resolved.slug, resolved.template);
    Ok(())
}

fn scraper_config(
    site: &SiteArgs,
    out_dir: &Path,
    show_progress: bool,
) -> anyhow::Result<ScraperConfig> {
    Ok(ScraperConfig {
        site: SiteConfig::new(&site.base_url).context("parse --base-url")?,
        catalogue_dir: Some(PathBuf::from(&site.catalogue_dir)),
        out_dir: Some(out_dir.to_path_buf()),
        show_progress,
    })
}

fn http_fetcher() -> anyhow::Result<Arc<HttpFetcher>> {
    Ok(Arc::new(HttpFetcher::new().context("build http client")?))
}

fn print_banner(out_dir: &Path, report: &BatchReport) {
    println!("==================== SCRAPING COMPLETED ====================");
    println!("*.csv files saved to: {}", out_dir.display());
    println!(
        "pairs without results: {}, pages fetched: {}",
        report.pairs_without_results(),
        report.pages_fetched
    );
    println!("============================================================");
}
