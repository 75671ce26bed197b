//! Browsing history as search results.
//!
//! Recently visited pages earn a recency bonus on top of the text match.
//! Selecting a history result opens the URL in a new tab.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::browser::{BrowserApi, HistoryItem};
use crate::config::{HistoryConfig, ScoringConfig};
use crate::error::Result;
use crate::orchestrator::scoring::{clamp_score, recency_bonus, relevance_score};
use crate::source::SourceAdapter;
use crate::types::{SearchResult, SourceKind};

use super::search_pages::is_search_engine_url;
use super::{display_title, open_url_action};

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Source adapter over browsing history.
pub struct HistorySource {
    browser: Arc<dyn BrowserApi>,
    scoring: ScoringConfig,
    options: HistoryConfig,
    clock: Clock,
}

impl HistorySource {
    pub fn new(browser: Arc<dyn BrowserApi>, scoring: ScoringConfig, options: HistoryConfig) -> Self {
        Self {
            browser,
            scoring,
            options,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the wall clock used for recency, e.g. to pin "now" in tests.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    fn to_result(&self, item: HistoryItem, query: &str, now_ms: f64) -> SearchResult {
        let title = display_title(item.title, &item.url);

        let mut score = relevance_score(query, &title, &item.url);
        if let Some(last_visit) = item.last_visit_time {
            score += recency_bonus(last_visit, now_ms, &self.scoring);
        }

        SearchResult {
            id: format!("history-{}", item.id),
            kind: SourceKind::History,
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
impl SourceAdapter for HistorySource {
    fn kind(&self) -> SourceKind {
        SourceKind::History
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let items = self.browser.lookup_history(query).await?;
        let now_ms = (self.clock)().timestamp_millis() as f64;
        Ok(items
            .into_iter()
            .filter(|item| !(self.options.exclude_search_pages && is_search_engine_url(&item.url)))
            .map(|item| self.to_result(item, query, now_ms))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::testing::FakeBrowser;
    use chrono::{Duration, TimeZone};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn visit(id: &str, url: &str, title: &str, days_ago: Option<i64>) -> HistoryItem {
        HistoryItem {
            id: id.into(),
            url: url.into(),
            title: title.into(),
            last_visit_time: days_ago
                .map(|days| (fixed_now() - Duration::days(days)).timestamp_millis() as f64),
        }
    }

    fn source_with(browser: FakeBrowser, options: HistoryConfig) -> (HistorySource, Arc<FakeBrowser>) {
        let browser = Arc::new(browser);
        let api: Arc<dyn BrowserApi> = browser.clone();
        let source = HistorySource::new(api, ScoringConfig::default(), options).with_clock(fixed_now);
        (source, browser)
    }

    fn find<'a>(results: &'a [SearchResult], id: &str) -> &'a SearchResult {
        results.iter().find(|r| r.id == id).expect("result present")
    }

    #[tokio::test]
    async fn blank_query_skips_lookup() {
        let (source, browser) = source_with(FakeBrowser::default(), HistoryConfig::default());
        assert!(source.search(" ").await.expect("ok").is_empty());
        assert_eq!(browser.lookup_count(), 0);
    }

    #[tokio::test]
    async fn maps_items_with_namespaced_ids() {
        let (source, browser) = source_with(
            FakeBrowser {
                history: vec![
                    visit("1", "https://example.com", "Example Site", Some(0)),
                    visit("2", "https://test.com", "Test Site", Some(1)),
                ],
                ..Default::default()
            },
            HistoryConfig::default(),
        );
        let results = source.search("example").await.expect("ok");
        assert_eq!(browser.lookup_count(), 1);
        assert_eq!(results.len(), 2);

        let first = find(&results, "history-1");
        assert_eq!(first.kind, SourceKind::History);
        assert_eq!(first.title, "Example Site");
        assert_eq!(first.subtitle.as_deref(), Some("https://example.com"));
        for result in &results {
            assert!((0.0..=1.0).contains(&result.score));
        }
    }

    #[tokio::test]
    async fn recency_bonus_applies_and_clamps() {
        let (source, _) = source_with(
            FakeBrowser {
                history: vec![
                    visit("fresh", "https://a.com", "Rust Book", Some(0)),
                    visit("stale", "https://b.com", "Rust Blog", Some(60)),
                    visit("undated", "https://c.com", "Rust Forum", None),
                    visit("exact", "https://d.com", "rust", Some(0)),
                ],
                ..Default::default()
            },
            HistoryConfig::default(),
        );
        let results = source.search("rust").await.expect("ok");
        assert!((find(&results, "history-fresh").score - 0.9).abs() < 1e-9);
        assert!((find(&results, "history-stale").score - 0.8).abs() < 1e-9);
        assert!((find(&results, "history-undated").score - 0.8).abs() < 1e-9);
        assert!((find(&results, "history-exact").score - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn empty_title_falls_back_to_url() {
        let (source, _) = source_with(
            FakeBrowser {
                history: vec![visit("1", "https://example.com", "", Some(0))],
                ..Default::default()
            },
            HistoryConfig::default(),
        );
        let results = source.search("example").await.expect("ok");
        assert_eq!(results[0].title, "https://example.com");
    }

    #[tokio::test]
    async fn search_pages_kept_by_default() {
        let (source, _) = source_with(
            FakeBrowser {
                history: vec![visit("1", "https://www.google.com/search?q=rust", "rust - Google", None)],
                ..Default::default()
            },
            HistoryConfig::default(),
        );
        assert_eq!(source.search("rust").await.expect("ok").len(), 1);
    }

    #[tokio::test]
    async fn search_pages_dropped_when_excluded() {
        let (source, _) = source_with(
            FakeBrowser {
                history: vec![
                    visit("1", "https://www.google.com/search?q=rust", "rust - Google", None),
                    visit("2", "https://www.rust-lang.org", "Rust", None),
                ],
                ..Default::default()
            },
            HistoryConfig {
                exclude_search_pages: true,
            },
        );
        let results = source.search("rust").await.expect("ok");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "history-2");
    }

    #[tokio::test]
    async fn select_opens_url() {
        let (source, browser) = source_with(
            FakeBrowser {
                history: vec![visit("1", "https://example.com", "Example Site", Some(0))],
                ..Default::default()
            },
            HistoryConfig::default(),
        );
        let mut results = source.search("example").await.expect("ok");
        results.remove(0).select().await.expect("select");
        assert_eq!(
            *browser.opened.lock().expect("lock"),
            vec!["https://example.com".to_string()]
        );
    }

    #[tokio::test]
    async fn lookup_failure_propagates() {
        let (source, _) = source_with(
            FakeBrowser {
                fail_lookups: true,
                ..Default::default()
            },
            HistoryConfig::default(),
        );
        assert!(source.search("example").await.is_err());
    }
}
