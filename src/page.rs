use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrapeError};

static CONTENT_REGION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.region.region-content").expect("invalid selector: content region")
});
static VIEW_CONTENT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.view-content").expect("invalid selector: view content")
});
static LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("invalid selector: a"));
static PUBLICATION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("p.publication").expect("invalid selector: publication")
});
static EXCERPT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p.excerpt").expect("invalid selector: excerpt"));
static LAST_PAGE_LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"a[title="Go to last page"]"#).expect("invalid selector: last page link")
});
static PAGE_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&page=([0-9]+)").expect("invalid regex: page param"));

/// One search hit. Any field the block does not carry is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultRecord {
    pub title: Option<String>,
    pub publication: Option<String>,
    pub excerpt: Option<String>,
}

/// Extracts one record per direct `div` child of the result listing.
pub fn parse_results(html: &str) -> Result<Vec<ResultRecord>> {
    results_in(&Html::parse_document(html))
}

pub fn results_in(document: &Html) -> Result<Vec<ResultRecord>> {
    let region = document
        .select(&CONTENT_REGION)
        .next()
        .ok_or(ScrapeError::MalformedPage {
            missing: "content region",
        })?;
    let listing = region
        .select(&VIEW_CONTENT)
        .next()
        .ok_or(ScrapeError::MalformedPage {
            missing: "result listing",
        })?;

    let records = child_elements(listing)
        .filter(|child| child.value().name() == "div")
        .map(|block| ResultRecord {
            title: block_title(block),
            publication: block.select(&PUBLICATION).next().and_then(element_text),
            excerpt: block.select(&EXCERPT).next().and_then(element_text),
        })
        .collect();

    Ok(records)
}

/// Highest zero-based page index advertised by the "last page" control, or
/// 0 when there is none.
pub fn discover_last_page(html: &str) -> u32 {
    last_page_in(&Html::parse_document(html))
}

pub fn last_page_in(document: &Html) -> u32 {
    let Some(href) = last_page_href(document) else {
        return 0;
    };
    let Some(caps) = PAGE_PARAM.captures(&href) else {
        tracing::debug!(%href, "last page link without page parameter");
        return 0;
    };
    caps[1].parse().unwrap_or_else(|err| {
        tracing::debug!(%href, %err, "last page index out of range");
        0
    })
}

pub fn has_last_page_link(document: &Html) -> bool {
    last_page_href(document).is_some()
}

fn last_page_href(document: &Html) -> Option<String> {
    document
        .select(&LAST_PAGE_LINK)
        .next()
        .and_then(|link| link.value().attr("href"))
        .map(str::to_owned)
}

fn child_elements(parent: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    parent.children().filter_map(ElementRef::wrap)
}

// The heading must be a direct child of the block.
fn block_title(block: ElementRef<'_>) -> Option<String> {
    child_elements(block)
        .find(|child| {
            child.value().name() == "h4" && child.value().classes().any(|class| class == "title")
        })
        .and_then(|heading| heading.select(&LINK).next())
        .and_then(element_text)
}

fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text = element.text().collect::<String>();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_owned())
}
