//! The browser platform as seen by the source adapters.
//!
//! [`BrowserApi`] is the seam to whatever actually lists tabs, history and
//! bookmarks. The launcher reaches it through the host channel; tests use
//! in-memory mocks. The item types double as the wire payloads of that
//! channel, hence the camelCase field names.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// An open tab as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabItem {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub window_id: i64,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub pinned: bool,
}

/// A history entry. `last_visit_time` is milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visit_time: Option<f64>,
}

/// A bookmark with a URL. Folders never reach the adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkItem {
    pub id: String,
    pub url: String,
    pub title: String,
}

/// Lookups and actions provided by the browser platform.
///
/// Every method is a single external call. Implementations report
/// failures as errors; they never retry.
#[async_trait]
pub trait BrowserApi: Send + Sync {
    /// List open tabs relevant to `query`.
    async fn lookup_tabs(&self, query: &str) -> Result<Vec<TabItem>>;

    /// Search browsing history for `query`.
    async fn lookup_history(&self, query: &str) -> Result<Vec<HistoryItem>>;

    /// Search bookmarks for `query`.
    async fn lookup_bookmarks(&self, query: &str) -> Result<Vec<BookmarkItem>>;

    /// Open `url` in a new browsing context.
    async fn open_url(&self, url: &str) -> Result<()>;

    /// Bring an existing tab and its window to the foreground and focus it.
    async fn activate_tab(&self, tab_id: i64) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_item_uses_camel_case() {
        let tab: TabItem = serde_json::from_str(
            r#"{"id": 3, "url": "https://a.com", "title": "A", "windowId": 9, "active": true}"#,
        )
        .expect("deserialize");
        assert_eq!(tab.window_id, 9);
        assert!(tab.active);
        assert!(!tab.pinned);
    }

    #[test]
    fn history_item_without_visit_time() {
        let item: HistoryItem =
            serde_json::from_str(r#"{"id": "h1", "url": "https://a.com", "title": ""}"#)
                .expect("deserialize");
        assert!(item.last_visit_time.is_none());
        let json = serde_json::to_string(&item).expect("serialize");
        assert!(!json.contains("lastVisitTime"));
    }
}
