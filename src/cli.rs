use clap::{Args, Parser, Subcommand};

use crate::config::DEFAULT_BASE_URL;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Scrape(ScrapeArgs),
    Batch(BatchArgs),
    Catalogue {
        #[command(subcommand)]
        command: CatalogueCommand,
    },
}

#[derive(Debug, Args)]
pub struct SiteArgs {
    /// Site root the catalogue and search pages live under.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory for the cached catalogue (`catalogue.json`).
    #[arg(long, default_value = "catalogue")]
    pub catalogue_dir: String,
}

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    /// Series name, or a bracketed list: `[name one,name two]`.
    pub series: String,

    /// Search query, or a bracketed list: `[query one,query two]`.
    pub queries: String,

    /// Output directory for one `<series>.csv` per series.
    pub path: String,

    #[command(flatten)]
    pub site: SiteArgs,

    /// Hide per-query page progress bars.
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// JSON file: `{"series": ..., "queries": ..., "out": "..."}`.
    #[arg(long)]
    pub file: String,

    #[command(flatten)]
    pub site: SiteArgs,

    /// Hide per-query page progress bars.
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Debug, Subcommand)]
pub enum CatalogueCommand {
    /// Fetch the catalogue and cache it.
    Build(CatalogueArgs),
    /// Remove the cached catalogue.
    Reset(CatalogueArgs),
    /// Show the search template and slug a series name resolves to.
    Lookup(CatalogueLookupArgs),
}

#[derive(Debug, Args)]
pub struct CatalogueArgs {
    #[command(flatten)]
    pub site: SiteArgs,
}

#[derive(Debug, Args)]
pub struct CatalogueLookupArgs {
    /// Series name (matched ignoring case, spaces and punctuation).
    pub series: String,

    #[command(flatten)]
    pub site: SiteArgs,
}
