use regex::Regex;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{info, instrument, warn};

use super::error::{ContextError, FetchFailure};
use super::sanitizer::sanitize_html;
use crate::config::ContextConfig;

const EMPTY_TEXT_PLACEHOLDER: &str =
    "Matn ajratib bo'lmadi. Iltimos, hujjatni Lex.uz orqali tekshiring.";
const MAX_TITLE_CHARS: usize = 200;
const MIN_URL_CHARS: usize = 5;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title\s*>").expect("title regex"));

/// Query accepted by the context endpoint. `url` stays optional so a missing value maps to
/// our own client error instead of an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContextQuery {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextItem {
    pub id: String,
    pub doc_title: String,
    pub doc_type: String,
    pub source: String,
    pub url: String,
    pub status_hint: String,
    pub published_date: String,
    pub effective_date: String,
    pub last_updated: String,
    pub article_or_clause: String,
    pub snippet_text: String,
    pub snippet_language: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextPayload {
    pub items: Vec<ContextItem>,
}

/// Fetches a single legal document and reduces it to a plain-text snippet.
#[derive(Debug, Clone)]
pub struct ContextService {
    client: Client,
    snippet_limit: usize,
}

impl ContextService {
    pub fn new(config: &ContextConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("bizgate/", env!("CARGO_PKG_VERSION")))
            .timeout(config.fetch_timeout())
            .build()?;

        Ok(Self {
            client,
            snippet_limit: config.snippet_limit,
        })
    }

    #[instrument(skip_all, fields(url = query.url.as_deref().unwrap_or_default()))]
    pub async fn fetch(&self, query: &ContextQuery) -> Result<ContextPayload, ContextError> {
        let url = validate_url(query.url.as_deref())?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| {
                warn!(error = %err, "context request failed");
                ContextError::UpstreamFetchFailed(FetchFailure::classify(&err))
            })?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let is_pdf = is_pdf(url, &content_type);

        let (raw_text, html_title) = if is_pdf {
            let bytes = response.bytes().await.map_err(|err| {
                warn!(error = %err, "context body could not be read");
                ContextError::UpstreamFetchFailed(FetchFailure::Body)
            })?;
            (extract_pdf_text(bytes.to_vec()).await?, None)
        } else {
            let html = response.text().await.map_err(|err| {
                warn!(error = %err, "context body could not be read");
                ContextError::UpstreamFetchFailed(FetchFailure::Body)
            })?;
            (sanitize_html(&html), guess_title(&html))
        };

        let snippet = match raw_text.trim() {
            "" => EMPTY_TEXT_PLACEHOLDER.to_string(),
            text => text.chars().take(self.snippet_limit).collect(),
        };

        let doc_title = query
            .title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .map(str::to_string)
            .or(html_title)
            .unwrap_or_else(|| url.to_string());
        let source = if url.contains("lex.uz") { "lex.uz" } else { "other" };

        info!(is_pdf, chars = snippet.chars().count(), "context document extracted");

        Ok(ContextPayload {
            items: vec![ContextItem {
                id: url.to_string(),
                doc_title,
                doc_type: "Boshqa".to_string(),
                source: source.to_string(),
                url: url.to_string(),
                status_hint: "unknown".to_string(),
                published_date: query.published_date.clone().unwrap_or_default(),
                effective_date: String::new(),
                last_updated: String::new(),
                article_or_clause: "Band/Bo'lim topilmadi".to_string(),
                snippet_text: snippet,
                snippet_language: "uz".to_string(),
                confidence: 0.5,
            }],
        })
    }
}

fn validate_url(raw: Option<&str>) -> Result<&str, ContextError> {
    let url = raw.map(str::trim).unwrap_or_default();
    if url.is_empty() {
        return Err(ContextError::InvalidRequest("missing url".to_string()));
    }
    let absolute = url.chars().count() >= MIN_URL_CHARS
        && Url::parse(url).is_ok_and(|parsed| matches!(parsed.scheme(), "http" | "https"));
    if !absolute {
        return Err(ContextError::InvalidRequest(
            "url must be an absolute http(s) address".to_string(),
        ));
    }
    Ok(url)
}

fn is_pdf(url: &str, content_type: &str) -> bool {
    if content_type.to_ascii_lowercase().contains("application/pdf") {
        return true;
    }
    let path = url.split('?').next().unwrap_or_default();
    path.to_ascii_lowercase().ends_with(".pdf")
}

fn guess_title(html: &str) -> Option<String> {
    let raw = TITLE_RE.captures(html)?.get(1)?.as_str();
    let title: String = sanitize_html(raw).chars().take(MAX_TITLE_CHARS).collect();
    (!title.is_empty()).then_some(title)
}

/// PDF parsing is CPU-bound and may panic on hostile input, so it runs on the blocking pool
/// and both failure shapes collapse into an extraction failure.
async fn extract_pdf_text(bytes: Vec<u8>) -> Result<String, ContextError> {
    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|err| {
            warn!(error = %err, "pdf extraction task aborted");
            ContextError::UpstreamFetchFailed(FetchFailure::Extraction)
        })?;

    extracted.map_err(|err| {
        warn!(error = ?err, "pdf text extraction failed");
        ContextError::UpstreamFetchFailed(FetchFailure::Extraction)
    })
}
