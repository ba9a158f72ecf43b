use chrono::Utc;

use super::cache::{CachedFeed, FeedCache};
use super::classifier::TopicClassifier;
use super::domain::{NewsItem, NewsMode, NewsQuery, NewsResponse, MAX_NEWS_LIMIT};
use super::error::FeedError;
use super::parser::parse_feed;
use super::source::FeedSource;
use crate::config::FeedConfig;

/// Cached, topic-filtered view over the upstream legal-news feed.
pub struct NewsService<S> {
    source: S,
    cache: FeedCache,
    classifier: TopicClassifier,
    base_url: String,
    source_label: String,
}

impl<S> NewsService<S>
where
    S: FeedSource,
{
    pub fn new(source: S, config: &FeedConfig) -> Self {
        Self::with_cache(source, FeedCache::new(config.cache_ttl()), config)
    }

    pub fn with_cache(source: S, cache: FeedCache, config: &FeedConfig) -> Self {
        let source_label = config
            .rss_url
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .to_string();

        Self {
            source,
            cache,
            classifier: TopicClassifier::entrepreneurship(),
            base_url: config.base_url.clone(),
            source_label,
        }
    }

    /// Cached items, refreshed from upstream when the cache window has passed.
    pub async fn items(&self) -> Result<CachedFeed, FeedError> {
        self.cache
            .read_through(|| async {
                let xml = self.source.fetch().await?;
                parse_feed(&xml, &self.base_url)
            })
            .await
    }

    pub async fn latest(&self, query: &NewsQuery) -> Result<NewsResponse, FeedError> {
        let feed = self.items().await?;
        let filtered = self.filter(&feed.items, query);
        let total = filtered.len();
        let items = filtered
            .into_iter()
            .take(query.limit.min(MAX_NEWS_LIMIT))
            .cloned()
            .collect();

        Ok(NewsResponse {
            source: self.source_label.clone(),
            generated_at: Utc::now().to_rfc3339(),
            total,
            stale: feed.stale,
            items,
        })
    }

    /// Topic filter, then the optional free-text query. `all` mode skips both.
    pub fn filter<'a>(&self, items: &'a [NewsItem], query: &NewsQuery) -> Vec<&'a NewsItem> {
        match query.mode {
            NewsMode::All => items.iter().collect(),
            NewsMode::Entrepreneurship => {
                let needle = query.q.as_deref().unwrap_or_default();
                items
                    .iter()
                    .filter(|item| {
                        let text = item.searchable_text();
                        self.classifier.matches(&text)
                            && TopicClassifier::matches_query(&text, needle)
                    })
                    .collect()
            }
        }
    }
}

impl NewsQuery {
    pub fn validate(&self) -> Result<(), String> {
        if self.limit == 0 || self.limit > MAX_NEWS_LIMIT {
            return Err(format!("limit must be between 1 and {MAX_NEWS_LIMIT}"));
        }
        Ok(())
    }
}
