//! # quicklaunch-search
//!
//! Query aggregation and ranking for the quicklaunch overlay.
//!
//! One query string fans out to every registered source (open tabs,
//! browsing history, bookmarks). Each source scores its own results; the
//! orchestrator merges them, removes duplicate URLs and publishes a single
//! ranked list.
//!
//! ## Design
//!
//! - Sources are independent [`SourceAdapter`]s queried concurrently
//! - Relevance uses fixed match tiers (exact, prefix, title, URL) plus small
//!   bonuses for active/pinned tabs and recently visited history
//! - Duplicate URLs collapse to one result, preferring the tab
//! - Input is debounced; a newer query always supersedes an older pass
//! - Graceful degradation: a failing source never hides the others
//!
//! ## Privacy
//!
//! - Nothing leaves the process except calls through [`BrowserApi`]
//! - Queries are logged only at trace level

pub mod browser;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod source;
pub mod sources;
pub mod types;

use std::sync::Arc;

pub use browser::{BookmarkItem, BrowserApi, HistoryItem, TabItem};
pub use config::{HistoryConfig, ScoringConfig, SearchConfig};
pub use error::{Result, SearchError};
pub use orchestrator::pass::{PassOutcome, SourceFailure};
pub use orchestrator::session::{SearchOptions, SearchPhase, SearchSession, SearchState};
pub use source::SourceAdapter;
pub use sources::{BookmarkSource, HistorySource, TabSource};
pub use types::{SearchResult, SelectAction, SourceKind};

/// Build the standard source set (tabs, history, bookmarks) over `browser`.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` fails validation.
pub fn default_sources(
    browser: Arc<dyn BrowserApi>,
    config: &SearchConfig,
) -> Result<Vec<Arc<dyn SourceAdapter>>> {
    config.validate()?;
    Ok(vec![
        Arc::new(TabSource::new(Arc::clone(&browser), config.scoring.clone())),
        Arc::new(HistorySource::new(
            Arc::clone(&browser),
            config.scoring.clone(),
            config.history.clone(),
        )),
        Arc::new(BookmarkSource::new(browser)),
    ])
}

/// Run one undebounced pass of `query` over `sources`.
///
/// Convenience for callers that do not need a live [`SearchSession`].
/// Source failures are logged and skipped.
///
/// # Examples
///
/// ```no_run
/// # async fn example(browser: std::sync::Arc<dyn quicklaunch_search::BrowserApi>) -> quicklaunch_search::Result<()> {
/// let config = quicklaunch_search::SearchConfig::default();
/// let sources = quicklaunch_search::default_sources(browser, &config)?;
/// for result in quicklaunch_search::search_once(&sources, "rust").await {
///     println!("{:.2} {}", result.score, result.title);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search_once(sources: &[Arc<dyn SourceAdapter>], query: &str) -> Vec<SearchResult> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    orchestrator::pass::run_pass(sources, query).await.results
}
