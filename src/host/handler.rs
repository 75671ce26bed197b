//! Platform side of the host channel: raw browser calls and request routing.
//!
//! [`PlatformHandler`] is the thin layer over whatever actually owns tabs,
//! history and bookmarks. [`RequestHandler`] turns a [`HostRequest`] into
//! calls on it and shapes the answer. Search failures never reach the
//! launcher as errors: they are logged and answered with no items.

use std::sync::Arc;

use async_trait::async_trait;
use quicklaunch_search::{BookmarkItem, HistoryItem, TabItem};
use serde::{Deserialize, Serialize};

use crate::config::HostConfig;
use crate::error::{LauncherError, Result};
use crate::host::contract::{Ack, HostRequest, SearchItems};

/// A bookmark tree node as the platform reports it. Folders have no URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkNode {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl BookmarkNode {
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.url.is_none()
    }
}

/// Raw browser capabilities required by the launcher.
#[async_trait]
pub trait PlatformHandler: Send + Sync + 'static {
    /// Every open tab in every window.
    async fn query_tabs(&self) -> Result<Vec<TabItem>>;

    /// Free-text history search, at most `max_results` entries.
    async fn search_history(&self, text: &str, max_results: usize) -> Result<Vec<HistoryItem>>;

    /// Bookmark search. May include folders.
    async fn search_bookmarks(&self, query: &str) -> Result<Vec<BookmarkNode>>;

    /// Open `url` in a new tab.
    async fn create_tab(&self, url: &str) -> Result<()>;

    /// Make `tab_id` the active tab of its window.
    async fn activate_tab(&self, tab_id: i64) -> Result<()>;

    /// Look up a single tab.
    async fn get_tab(&self, tab_id: i64) -> Result<TabItem>;

    /// Bring a window to the foreground.
    async fn focus_window(&self, window_id: i64) -> Result<()>;

    /// Move keyboard focus into the page shown by `tab_id`.
    async fn focus_page(&self, tab_id: i64) -> Result<()>;
}

/// Routes [`HostRequest`]s to a [`PlatformHandler`].
pub struct RequestHandler<P: PlatformHandler> {
    platform: Arc<P>,
    history_max_results: usize,
}

impl<P: PlatformHandler> RequestHandler<P> {
    #[must_use]
    pub fn new(platform: Arc<P>, config: &HostConfig) -> Self {
        Self {
            platform,
            history_max_results: config.history_max_results,
        }
    }

    /// Handle one request and return its JSON payload.
    ///
    /// # Errors
    ///
    /// Searches never fail. Actions fail when the platform call fails.
    pub async fn handle(&self, request: &HostRequest) -> Result<serde_json::Value> {
        tracing::debug!(kind = %request.kind(), "handling host request");
        match request {
            HostRequest::SearchHistory { query } => to_payload(self.search_history(query).await),
            HostRequest::SearchTabs { query } => to_payload(self.search_tabs(query).await),
            HostRequest::SearchBookmarks { query } => {
                to_payload(self.search_bookmarks(query).await)
            }
            HostRequest::OpenTab { url } => to_payload(self.open_tab(url).await?),
            HostRequest::SwitchToTab { tab_id } => to_payload(self.switch_to_tab(*tab_id).await?),
        }
    }

    /// Recent history matching `query`, capped at the configured maximum.
    pub async fn search_history(&self, query: &str) -> SearchItems<HistoryItem> {
        match self
            .platform
            .search_history(query, self.history_max_results)
            .await
        {
            Ok(mut items) => {
                items.truncate(self.history_max_results);
                SearchItems::new(items)
            }
            Err(e) => {
                tracing::error!(error = %e, "history search failed");
                SearchItems::empty()
            }
        }
    }

    /// Tabs whose title or URL contains `query`, case-insensitively.
    /// A blank query returns every tab.
    pub async fn search_tabs(&self, query: &str) -> SearchItems<TabItem> {
        let tabs = match self.platform.query_tabs().await {
            Ok(tabs) => tabs,
            Err(e) => {
                tracing::error!(error = %e, "tab search failed");
                return SearchItems::empty();
            }
        };
        if query.trim().is_empty() {
            return SearchItems::new(tabs);
        }

        let needle = query.to_lowercase();
        SearchItems::new(
            tabs.into_iter()
                .filter(|tab| {
                    tab.title.to_lowercase().contains(&needle)
                        || tab.url.to_lowercase().contains(&needle)
                })
                .collect(),
        )
    }

    /// Bookmarks matching `query`. Folders are dropped.
    pub async fn search_bookmarks(&self, query: &str) -> SearchItems<BookmarkItem> {
        match self.platform.search_bookmarks(query).await {
            Ok(nodes) => SearchItems::new(
                nodes
                    .into_iter()
                    .filter_map(|node| {
                        node.url.map(|url| BookmarkItem {
                            id: node.id,
                            url,
                            title: node.title,
                        })
                    })
                    .collect(),
            ),
            Err(e) => {
                tracing::error!(error = %e, "bookmark search failed");
                SearchItems::empty()
            }
        }
    }

    /// Open `url` in a new tab.
    ///
    /// # Errors
    ///
    /// Returns the platform error if the tab cannot be created.
    pub async fn open_tab(&self, url: &str) -> Result<Ack> {
        self.platform.create_tab(url).await?;
        Ok(Ack::accepted())
    }

    /// Activate `tab_id`, focus its window, then focus the page.
    ///
    /// # Errors
    ///
    /// Returns the first failing platform call; later steps are skipped.
    pub async fn switch_to_tab(&self, tab_id: i64) -> Result<Ack> {
        self.platform.activate_tab(tab_id).await?;
        let tab = self.platform.get_tab(tab_id).await?;
        self.platform.focus_window(tab.window_id).await?;
        self.platform.focus_page(tab_id).await?;
        Ok(Ack::accepted())
    }
}

fn to_payload<T: Serialize>(value: T) -> Result<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| LauncherError::Protocol(format!("failed to serialize payload: {e}")))
}
