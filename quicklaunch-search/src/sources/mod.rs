//! Source adapter implementations over a [`BrowserApi`](crate::BrowserApi).

pub mod bookmarks;
pub mod history;
pub mod search_pages;
pub mod tabs;

pub use bookmarks::BookmarkSource;
pub use history::HistorySource;
pub use search_pages::is_search_engine_url;
pub use tabs::TabSource;

use std::sync::Arc;

use crate::browser::BrowserApi;
use crate::types::SelectAction;

/// Provider titles are often empty; fall back to the URL.
fn display_title(title: String, url: &str) -> String {
    if title.is_empty() {
        url.to_string()
    } else {
        title
    }
}

fn open_url_action(browser: &Arc<dyn BrowserApi>, url: &str) -> SelectAction {
    let browser = Arc::clone(browser);
    let url = url.to_string();
    SelectAction::new(move || {
        let browser = Arc::clone(&browser);
        let url = url.clone();
        async move { browser.open_url(&url).await }
    })
}
