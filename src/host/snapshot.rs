//! A [`PlatformHandler`] backed by a JSON snapshot of browser state.
//!
//! Useful wherever a live browser is not available: the CLI, demos and
//! integration tests. Lookups read the snapshot; actions update it (new
//! tabs, active tab) and are recorded so callers can inspect them.
//!
//! ```json
//! {
//!   "tabs": [{"id": 1, "url": "https://docs.rs", "title": "Docs", "windowId": 1}],
//!   "history": [{"id": "7", "url": "https://crates.io", "title": "crates.io", "lastVisitTime": 1767225600000}],
//!   "bookmarks": [{"id": "b1", "title": "Rust", "url": "https://rust-lang.org"}]
//! }
//! ```

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use quicklaunch_search::{HistoryItem, TabItem};
use serde::{Deserialize, Serialize};

use crate::error::{LauncherError, Result};
use crate::host::handler::{BookmarkNode, PlatformHandler};

/// Browser state as stored in a snapshot file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub tabs: Vec<TabItem>,
    pub history: Vec<HistoryItem>,
    pub bookmarks: Vec<BookmarkNode>,
}

/// An action the platform performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformAction {
    CreateTab { url: String },
    ActivateTab { tab_id: i64 },
    FocusWindow { window_id: i64 },
    FocusPage { tab_id: i64 },
}

/// In-memory platform over a [`Snapshot`].
#[derive(Debug, Default)]
pub struct SnapshotPlatform {
    state: Mutex<Snapshot>,
    actions: Mutex<Vec<PlatformAction>>,
}

impl SnapshotPlatform {
    #[must_use]
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            state: Mutex::new(snapshot),
            actions: Mutex::new(Vec::new()),
        }
    }

    /// Load a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid snapshot.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&content).map_err(|e| {
            LauncherError::Config(format!("invalid snapshot {}: {e}", path.display()))
        })?;
        tracing::info!(
            path = %path.display(),
            tabs = snapshot.tabs.len(),
            history = snapshot.history.len(),
            bookmarks = snapshot.bookmarks.len(),
            "loaded browser snapshot"
        );
        Ok(Self::new(snapshot))
    }

    /// Every action performed so far, oldest first.
    #[must_use]
    pub fn actions(&self) -> Vec<PlatformAction> {
        self.actions.lock().map(|a| a.clone()).unwrap_or_default()
    }

    /// A copy of the current state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn snapshot(&self) -> Result<Snapshot> {
        Ok(self.state()?.clone())
    }

    fn state(&self) -> Result<MutexGuard<'_, Snapshot>> {
        self.state
            .lock()
            .map_err(|_| LauncherError::Platform("snapshot state poisoned".into()))
    }

    fn record(&self, action: PlatformAction) {
        tracing::info!(?action, "platform action");
        if let Ok(mut actions) = self.actions.lock() {
            actions.push(action);
        }
    }
}

fn contains_lowercase(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[async_trait]
impl PlatformHandler for SnapshotPlatform {
    async fn query_tabs(&self) -> Result<Vec<TabItem>> {
        Ok(self.state()?.tabs.clone())
    }

    /// Matches title or URL, most recent visit first.
    async fn search_history(&self, text: &str, max_results: usize) -> Result<Vec<HistoryItem>> {
        let needle = text.trim().to_lowercase();
        let mut items: Vec<HistoryItem> = self
            .state()?
            .history
            .iter()
            .filter(|item| {
                needle.is_empty()
                    || contains_lowercase(&item.title, &needle)
                    || contains_lowercase(&item.url, &needle)
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            b.last_visit_time
                .unwrap_or(0.0)
                .total_cmp(&a.last_visit_time.unwrap_or(0.0))
        });
        items.truncate(max_results);
        Ok(items)
    }

    async fn search_bookmarks(&self, query: &str) -> Result<Vec<BookmarkNode>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .state()?
            .bookmarks
            .iter()
            .filter(|node| {
                contains_lowercase(&node.title, &needle)
                    || node
                        .url
                        .as_deref()
                        .is_some_and(|url| contains_lowercase(url, &needle))
            })
            .cloned()
            .collect())
    }

    /// Opens the tab in the first window and makes it active there.
    async fn create_tab(&self, url: &str) -> Result<()> {
        {
            let mut state = self.state()?;
            let id = state.tabs.iter().map(|t| t.id).max().unwrap_or(0) + 1;
            let window_id = state.tabs.first().map_or(1, |t| t.window_id);
            for tab in state.tabs.iter_mut().filter(|t| t.window_id == window_id) {
                tab.active = false;
            }
            state.tabs.push(TabItem {
                id,
                url: url.to_owned(),
                title: String::new(),
                window_id,
                active: true,
                pinned: false,
            });
        }
        self.record(PlatformAction::CreateTab {
            url: url.to_owned(),
        });
        Ok(())
    }

    async fn activate_tab(&self, tab_id: i64) -> Result<()> {
        {
            let mut state = self.state()?;
            let window_id = state
                .tabs
                .iter()
                .find(|t| t.id == tab_id)
                .map(|t| t.window_id)
                .ok_or_else(|| LauncherError::Platform(format!("no tab with id {tab_id}")))?;
            for tab in state.tabs.iter_mut().filter(|t| t.window_id == window_id) {
                tab.active = tab.id == tab_id;
            }
        }
        self.record(PlatformAction::ActivateTab { tab_id });
        Ok(())
    }

    async fn get_tab(&self, tab_id: i64) -> Result<TabItem> {
        self.state()?
            .tabs
            .iter()
            .find(|t| t.id == tab_id)
            .cloned()
            .ok_or_else(|| LauncherError::Platform(format!("no tab with id {tab_id}")))
    }

    async fn focus_window(&self, window_id: i64) -> Result<()> {
        self.record(PlatformAction::FocusWindow { window_id });
        Ok(())
    }

    async fn focus_page(&self, tab_id: i64) -> Result<()> {
        self.record(PlatformAction::FocusPage { tab_id });
        Ok(())
    }
}
