use std::future::Future;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::Settings;
use crate::error::FetchError;

/// Retrieves the raw body of a page. Any non-success status is a failure.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Plain HTTP GET over reqwest.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(settings: &Settings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|source| FetchError::Transport {
                url: settings.wiki_base.clone(),
                source,
            })?;
        Ok(HttpFetcher { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let start = Instant::now();
        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::Missing {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await.map_err(transport)?;
        debug!(
            "Fetched {} ({} bytes in {}ms)",
            url,
            body.len(),
            start.elapsed().as_millis()
        );
        Ok(body)
    }
}

/// Serves pages from memory; unknown URLs are missing.
#[cfg(test)]
#[derive(Default)]
pub struct StaticFetcher {
    pages: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl StaticFetcher {
    pub fn with(mut self, url: &str, body: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), body.into());
        self
    }

    pub fn with_fixture(self, url: &str, fixture: &str) -> Self {
        let body = std::fs::read_to_string(format!("tests/fixtures/{}.html", fixture)).unwrap();
        self.with(url, body)
    }
}

#[cfg(test)]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.pages.get(url).cloned().ok_or_else(|| FetchError::Missing {
            url: url.to_string(),
        })
    }
}
