use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

use bho_scrape::cli::{CatalogueCommand, Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    bho_scrape::logging::init().context("init logging")?;

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        Command::Scrape(args) => {
            bho_scrape::commands::scrape(args).await.context("scrape")?;
        }
        Command::Batch(args) => {
            bho_scrape::commands::batch(args).await.context("batch")?;
        }
        Command::Catalogue {
            command: CatalogueCommand::Build(args),
        } => {
            bho_scrape::commands::catalogue_build(args)
                .await
                .context("catalogue build")?;
        }
        Command::Catalogue {
            command: CatalogueCommand::Reset(args),
        } => {
            bho_scrape::commands::catalogue_reset(args).context("catalogue reset")?;
        }
        Command::Catalogue {
            command: CatalogueCommand::Lookup(args),
        } => {
            bho_scrape::commands::catalogue_lookup(args)
                .await
                .context("catalogue lookup")?;
        }
    }

    Ok(())
}
