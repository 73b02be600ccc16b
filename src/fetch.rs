use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};

use crate::error::{Result, ScrapeError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body of a 2xx response; anything else becomes `UnexpectedStatus`.
    pub fn into_success_body(self, url: &str) -> Result<String> {
        if !self.is_success() {
            return Err(ScrapeError::UnexpectedStatus {
                url: url.to_owned(),
                status: self.status,
            });
        }
        Ok(self.body)
    }
}

/// Text-over-HTTP transport. Only transport failures are errors here; status
/// handling belongs to the caller.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchResponse>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|err| ScrapeError::Transport {
                url: String::new(),
                message: format!("build http client: {err}"),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse> {
        let transport = |err: reqwest::Error| ScrapeError::Transport {
            url: url.to_owned(),
            message: err.to_string(),
        };

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, crate::config::USER_AGENT)
            .header(ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;
        tracing::debug!(url, status, bytes = body.len(), "fetched");

        Ok(FetchResponse { status, body })
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Clone)]
    enum Reply {
        Response(FetchResponse),
        Unreachable,
    }

    /// In-memory site keyed by full URL. Unknown URLs answer 404.
    #[derive(Debug, Default)]
    pub(crate) struct StubFetcher {
        replies: HashMap<String, Reply>,
        calls: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        pub(crate) fn with_page(mut self, url: impl Into<String>, body: &str) -> Self {
            self.replies
                .insert(url.into(), Reply::Response(FetchResponse::ok(body)));
            self
        }

        pub(crate) fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
            self.replies.insert(
                url.into(),
                Reply::Response(FetchResponse {
                    status,
                    body: String::new(),
                }),
            );
            self
        }

        pub(crate) fn with_unreachable(mut self, url: impl Into<String>) -> Self {
            self.replies.insert(url.into(), Reply::Unreachable);
            self
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls().len()
        }
    }

    #[async_trait]
    impl Fetch for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchResponse> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(url.to_owned());
            }
            match self.replies.get(url) {
                Some(Reply::Response(response)) => Ok(response.clone()),
                Some(Reply::Unreachable) => Err(ScrapeError::Transport {
                    url: url.to_owned(),
                    message: "connection refused".to_owned(),
                }),
                None => Ok(FetchResponse {
                    status: 404,
                    body: "not found".to_owned(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_success_status_becomes_unexpected_status() {
        let response = FetchResponse {
            status: 503,
            body: "busy".to_owned(),
        };
        let err = response.into_success_body("http://x/catalogue").unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::UnexpectedStatus { status: 503, .. }
        ));
    }

    #[test]
    fn success_status_yields_body() -> anyhow::Result<()> {
        let body = FetchResponse::ok("<html></html>").into_success_body("http://x/")?;
        assert_eq!(body, "<html></html>");
        Ok(())
    }
}
