/// Failures of the feed pipeline.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FeedError {
    #[error("feed document is not well-formed XML: {0}")]
    MalformedFeed(String),
    #[error("feed request failed: {0}")]
    Fetch(FetchFailure),
    #[error("failed to fetch the legal-news feed and no cached data is available")]
    FeedUnavailable {
        #[source]
        source: Box<FeedError>,
    },
}

/// Classified upstream failure. Only the classification leaves the service; the
/// underlying transport error is logged where it happens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchFailure {
    #[error("upstream request timed out")]
    Timeout,
    #[error("could not connect to upstream")]
    Connect,
    #[error("upstream responded with status {0}")]
    Status(u16),
    #[error("could not build the upstream request")]
    Request,
    #[error("could not read upstream response body")]
    Body,
    #[error("could not extract text from the document")]
    Extraction,
}

impl FetchFailure {
    pub fn classify(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else if err.is_builder() {
            Self::Request
        } else if err.is_body() || err.is_decode() {
            Self::Body
        } else {
            Self::Connect
        }
    }
}

/// Failures of the single-document context fetch.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("failed to fetch context: {0}")]
    UpstreamFetchFailed(FetchFailure),
}
