#![forbid(unsafe_code)]

pub mod catalogue;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod page;
pub mod persist;
pub mod resolve;
pub mod scrape;
pub mod store;
pub mod table;
pub mod text;

#[cfg(test)]
mod fixtures;

pub use catalogue::{Catalogue, UrlTemplate};
pub use error::{Result, ScrapeError};
pub use scrape::{ArgList, BatchReport, SeriesScraper};
