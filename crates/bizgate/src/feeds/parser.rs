use regex::Regex;
use roxmltree::{Document, Node, ParsingOptions};
use std::sync::LazyLock;

use super::domain::NewsItem;
use super::error::FeedError;
use super::sanitizer::sanitize_html;

static DOCUMENT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/docs/(-?\d+)").expect("document id regex"));

/// Parse an RSS/Atom-like document into news items, in document order.
///
/// Elements are matched on their local name only, so `<rss:item>` and `<item>` are treated
/// alike. Missing children read as empty strings.
pub fn parse_feed(xml: &str, base_url: &str) -> Result<Vec<NewsItem>, FeedError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = Document::parse_with_options(xml, options)
        .map_err(|err| FeedError::MalformedFeed(err.to_string()))?;

    let items = document
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == "item")
        .map(|node| parse_item(node, base_url))
        .collect();

    Ok(items)
}

fn parse_item(item: Node<'_, '_>, base_url: &str) -> NewsItem {
    let title = child_text(item, "title").trim().to_string();
    let raw_link = child_text(item, "link").trim();
    let raw_guid = child_text(item, "guid").trim();
    let pub_date = child_text(item, "pubDate").trim().to_string();
    let description = sanitize_html(child_text(item, "description"));

    let link = normalize_link(raw_link, base_url);
    let guid = [raw_guid, raw_link, link.as_str()]
        .into_iter()
        .find(|candidate| !candidate.is_empty())
        .unwrap_or_default()
        .to_string();
    let document_id = extract_document_id(&link);

    NewsItem {
        title,
        link,
        pub_date,
        description,
        guid,
        document_id,
    }
}

fn child_text<'a>(item: Node<'a, '_>, name: &str) -> &'a str {
    item.children()
        .find(|child| child.is_element() && child.tag_name().name() == name)
        .and_then(|child| child.text())
        .unwrap_or_default()
}

/// Resolve a feed link against the feed origin. Absolute http(s) links pass through.
pub fn normalize_link(raw: &str, base_url: &str) -> String {
    let link = raw.trim();
    if link.is_empty() {
        return String::new();
    }
    if link.starts_with("http://") || link.starts_with("https://") {
        return link.to_string();
    }

    let path = link.trim_start_matches('/');
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

fn extract_document_id(link: &str) -> Option<String> {
    DOCUMENT_ID_RE
        .captures(link)
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
}
