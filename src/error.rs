use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Bad input shape at a public entry point.
    #[error("invalid argument `{name}`: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("catalogue already built; reset it before building again")]
    AlreadyBuilt,

    #[error("unknown series: {series:?} (normalized: {key:?})")]
    UnknownSeries { series: String, key: String },

    #[error("GET {url}: {message}")]
    Transport { url: String, message: String },

    #[error("GET {url}: unexpected status {status}")]
    UnexpectedStatus { url: String, status: u16 },

    /// The markup lacks an element the site always renders on valid pages.
    #[error("malformed page: missing {missing}")]
    MalformedPage { missing: &'static str },

    #[error("{action} {}: {message}", .path.display())]
    Persistence {
        action: &'static str,
        path: PathBuf,
        message: String,
    },
}

impl ScrapeError {
    pub fn invalid_argument(name: &str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.to_owned(),
            message: message.into(),
        }
    }

    pub(crate) fn persistence(
        action: &'static str,
        path: impl Into<PathBuf>,
        err: impl std::fmt::Display,
    ) -> Self {
        Self::Persistence {
            action,
            path: path.into(),
            message: err.to_string(),
        }
    }
}
