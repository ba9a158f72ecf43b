//! Legal-news feed pipeline: parsing, sanitizing, topic filtering, caching and
//! single-document context fetches.

pub mod cache;
pub mod classifier;
pub mod context;
pub mod domain;
pub mod error;
pub mod parser;
pub mod router;
pub mod sanitizer;
pub mod service;
pub mod source;

pub use cache::{CachedFeed, Clock, FeedCache, SystemClock};
pub use classifier::TopicClassifier;
pub use context::{ContextItem, ContextPayload, ContextQuery, ContextService};
pub use domain::{NewsItem, NewsMode, NewsQuery, NewsResponse};
pub use error::{ContextError, FeedError, FetchFailure};
pub use parser::{normalize_link, parse_feed};
pub use router::news_router;
pub use sanitizer::sanitize_html;
pub use service::NewsService;
pub use source::{FeedSource, HttpFeedSource};
