use serde::{Deserialize, Serialize};

/// One parsed feed entry. Immutable once produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    #[serde(rename = "pubDate")]
    pub pub_date: String,
    pub description: String,
    pub guid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
}

impl NewsItem {
    /// Text the topic classifier and free-text query look at.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsMode {
    #[default]
    Entrepreneurship,
    All,
}

/// Query parameters accepted by the news listing.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub mode: NewsMode,
}

impl Default for NewsQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            q: None,
            mode: NewsMode::default(),
        }
    }
}

pub const MAX_NEWS_LIMIT: usize = 100;

fn default_limit() -> usize {
    20
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsResponse {
    pub source: String,
    pub generated_at: String,
    pub total: usize,
    pub stale: bool,
    pub items: Vec<NewsItem>,
}
