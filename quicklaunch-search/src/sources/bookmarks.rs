//! Bookmarks as search results. Selecting one opens it in a new tab.

use std::sync::Arc;

use async_trait::async_trait;

use crate::browser::{BookmarkItem, BrowserApi};
use crate::error::Result;
use crate::orchestrator::scoring::{clamp_score, relevance_score};
use crate::source::SourceAdapter;
use crate::types::{SearchResult, SourceKind};

use super::{display_title, open_url_action};

/// Source adapter over saved bookmarks.
pub struct BookmarkSource {
    browser: Arc<dyn BrowserApi>,
}

impl BookmarkSource {
    pub fn new(browser: Arc<dyn BrowserApi>) -> Self {
        Self { browser }
    }

    fn to_result(&self, item: BookmarkItem, query: &str) -> SearchResult {
        let title = display_title(item.title, &item.url);
        let score = relevance_score(query, &title, &item.url);

        SearchResult {
            id: format!("bookmark-{}", item.id),
            kind: SourceKind::Bookmark,
            title,
            subtitle: Some(item.url.clone()),
            on_select: open_url_action(&self.browser, &item.url),
            url: Some(item.url),
            icon: None,
            score: clamp_score(score),
        }
    }
}

#[async_trait]
impl SourceAdapter for BookmarkSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Bookmark
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let items = self.browser.lookup_bookmarks(query).await?;
        Ok(items
            .into_iter()
            .map(|item| self.to_result(item, query))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::testing::FakeBrowser;

    fn bookmark(id: &str, url: &str, title: &str) -> BookmarkItem {
        BookmarkItem {
            id: id.into(),
            url: url.into(),
            title: title.into(),
        }
    }

    fn source_with(browser: FakeBrowser) -> (BookmarkSource, Arc<FakeBrowser>) {
        let browser = Arc::new(browser);
        let api: Arc<dyn BrowserApi> = browser.clone();
        (BookmarkSource::new(api), browser)
    }

    #[tokio::test]
    async fn blank_query_skips_lookup() {
        let (source, browser) = source_with(FakeBrowser::default());
        assert!(source.search("").await.expect("ok").is_empty());
        assert_eq!(browser.lookup_count(), 0);
    }

    #[tokio::test]
    async fn maps_items_to_results() {
        let (source, browser) = source_with(FakeBrowser {
            bookmarks: vec![
                bookmark("1", "https://example.com", "Example Bookmark"),
                bookmark("2", "https://test.com", "Test Bookmark"),
            ],
            ..Default::default()
        });
        let results = source.search("example").await.expect("ok");
        assert_eq!(*browser.lookups.lock().expect("lock"), vec!["example".to_string()]);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "bookmark-1");
        assert_eq!(results[0].kind, SourceKind::Bookmark);
        assert_eq!(results[0].title, "Example Bookmark");
        assert_eq!(results[0].subtitle.as_deref(), Some("https://example.com"));
        assert!((results[0].score - 0.8).abs() < f64::EPSILON);
        assert_eq!(results[1].score, 0.0);
    }

    #[tokio::test]
    async fn score_tiers() {
        let (source, _) = source_with(FakeBrowser {
            bookmarks: vec![
                bookmark("exact", "https://a.com", "Rust"),
                bookmark("prefix", "https://b.com", "Rust Book"),
                bookmark("contains", "https://c.com", "The Rust Book"),
                bookmark("url", "https://rust-lang.org", "Home"),
                bookmark("none", "https://d.com", "Cooking"),
            ],
            ..Default::default()
        });
        let results = source.search("rust").await.expect("ok");
        let score = |id: &str| {
            results
                .iter()
                .find(|r| r.id == format!("bookmark-{id}"))
                .map(|r| r.score)
                .expect("result present")
        };
        assert!((score("exact") - 1.0).abs() < f64::EPSILON);
        assert!((score("prefix") - 0.8).abs() < f64::EPSILON);
        assert!((score("contains") - 0.6).abs() < f64::EPSILON);
        assert!((score("url") - 0.4).abs() < f64::EPSILON);
        assert_eq!(score("none"), 0.0);
    }

    #[tokio::test]
    async fn empty_title_falls_back_to_url() {
        let (source, _) = source_with(FakeBrowser {
            bookmarks: vec![bookmark("1", "https://example.com", "")],
            ..Default::default()
        });
        let results = source.search("example").await.expect("ok");
        assert_eq!(results[0].title, "https://example.com");
    }

    #[tokio::test]
    async fn select_opens_url() {
        let (source, browser) = source_with(FakeBrowser {
            bookmarks: vec![bookmark("1", "https://example.com", "Example Bookmark")],
            ..Default::default()
        });
        let mut results = source.search("example").await.expect("ok");
        results.remove(0).select().await.expect("select");
        assert_eq!(
            *browser.opened.lock().expect("lock"),
            vec!["https://example.com".to_string()]
        );
    }
}
