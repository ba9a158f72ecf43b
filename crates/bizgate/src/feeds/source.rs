use reqwest::Client;
use std::future::Future;
use tracing::{instrument, warn};

use super::error::{FeedError, FetchFailure};
use crate::config::FeedConfig;

/// Upstream that yields the raw feed document.
pub trait FeedSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<String, FeedError>> + Send;
}

/// Fetches the feed over HTTP with a client-level timeout and a bounded number of attempts.
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: Client,
    url: String,
    attempts: u32,
}

impl HttpFeedSource {
    pub fn new(config: &FeedConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("bizgate/", env!("CARGO_PKG_VERSION")))
            .timeout(config.fetch_timeout())
            .build()?;

        Ok(Self {
            client,
            url: config.rss_url.clone(),
            attempts: config.fetch_attempts.max(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_once(&self) -> Result<String, FetchFailure> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| {
                warn!(error = %err, "feed request failed");
                FetchFailure::classify(&err)
            })?;

        response.text().await.map_err(|err| {
            warn!(error = %err, "feed body could not be read");
            FetchFailure::Body
        })
    }
}

impl FeedSource for HttpFeedSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<String, FeedError> {
        let mut last_failure = FetchFailure::Connect;
        for attempt in 1..=self.attempts {
            match self.fetch_once().await {
                Ok(body) => return Ok(body),
                Err(failure) => {
                    warn!(attempt, attempts = self.attempts, %failure, "feed fetch attempt failed");
                    last_failure = failure;
                }
            }
        }
        Err(FeedError::Fetch(last_failure))
    }
}
