use crate::catalogue::{Catalogue, CatalogueSource, UrlTemplate};
use crate::config::SiteConfig;
use crate::error::{Result, ScrapeError};
use crate::fetch::Fetch;
use crate::text::normalize;

/// At most this many live catalogue fetches per resolution.
const MAX_CATALOGUE_BUILDS: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSeries {
    pub template: UrlTemplate,
    pub slug: String,
}

/// Looks a free-text series name up in the catalogue, populating the
/// catalogue first (cache, then live fetch) when it is empty. A miss against
/// a cached catalogue refreshes it from the live site before giving up.
pub async fn resolve_series(
    catalogue: &mut Catalogue,
    fetcher: &dyn Fetch,
    site: &SiteConfig,
    series: &str,
) -> Result<ResolvedSeries> {
    let key = normalize(series);
    let unknown = || ScrapeError::UnknownSeries {
        series: series.to_owned(),
        key: key.clone(),
    };

    let mut builds = 0;
    if !catalogue.is_built() && !load_cached(catalogue)? {
        tracing::info!(series, "no catalogue available locally");
        builds += 1;
        catalogue.build(fetcher, site).await?;
    }

    if catalogue.lookup(&key).is_none()
        && catalogue.source() == Some(CatalogueSource::Cache)
        && builds < MAX_CATALOGUE_BUILDS
    {
        tracing::info!(series, "series missing from cached catalogue; refreshing");
        if let Err(err) = catalogue.refresh(fetcher, site).await {
            tracing::warn!(series, %err, "catalogue refresh failed; keeping cached copy");
        }
    }

    let template = catalogue.lookup(&key).cloned().ok_or_else(unknown)?;
    let slug = template.slug();
    Ok(ResolvedSeries { template, slug })
}

// An undecodable cache is discarded in favour of a live build.
fn load_cached(catalogue: &mut Catalogue) -> Result<bool> {
    match catalogue.load_cached() {
        Ok(loaded) => Ok(loaded),
        Err(err @ ScrapeError::Persistence { .. }) => {
            tracing::warn!(%err, "ignoring unreadable catalogue cache");
            Ok(false)
        }
        Err(err) => Err(err),
    }
}
