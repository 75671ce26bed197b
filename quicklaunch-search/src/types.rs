//! Core types: the unified search result and the source tag.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Which kind of source produced a [`SearchResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// An open browser tab.
    Tab,
    /// A browsing history entry.
    History,
    /// A saved bookmark.
    Bookmark,
    /// A non-navigational command.
    Command,
    /// A free-text suggestion.
    Suggestion,
}

impl SourceKind {
    /// Returns the wire name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tab => "tab",
            Self::History => "history",
            Self::Bookmark => "bookmark",
            Self::Command => "command",
            Self::Suggestion => "suggestion",
        }
    }

    /// Returns all kind variants.
    pub fn all() -> &'static [SourceKind] {
        &[
            Self::Tab,
            Self::History,
            Self::Bookmark,
            Self::Command,
            Self::Suggestion,
        ]
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Boxed future returned by a [`SelectAction`].
pub type SelectFuture = BoxFuture<'static, Result<()>>;

/// The action run when the user commits to a result.
///
/// Cheap to clone; every clone shares the same callback.
#[derive(Clone)]
pub struct SelectAction(Arc<dyn Fn() -> SelectFuture + Send + Sync>);

impl SelectAction {
    /// Wrap an async closure as a select action.
    pub fn new<F, Fut>(action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self(Arc::new(move || -> SelectFuture { Box::pin(action()) }))
    }

    /// An action that does nothing. Useful for command results and tests.
    pub fn noop() -> Self {
        Self::new(|| async { Ok(()) })
    }

    async fn run(&self) -> Result<()> {
        (self.0)().await
    }
}

impl fmt::Debug for SelectAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SelectAction(..)")
    }
}

/// A single ranked hit from one of the sources.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    /// Unique within one aggregation pass; namespaced by the producing source.
    pub id: String,
    /// Which source produced this result.
    pub kind: SourceKind,
    /// Display title. Falls back to the URL when the provider has none.
    pub title: String,
    /// Secondary display line.
    pub subtitle: Option<String>,
    /// Target URL, absent for non-navigational results.
    pub url: Option<String>,
    /// Icon name or URL; interpretation is up to the presentation layer.
    pub icon: Option<String>,
    /// Relevance in `[0, 1]`, used only for ordering.
    pub score: f64,
    #[serde(skip)]
    pub on_select: SelectAction,
}

impl SearchResult {
    /// The subtitle to display, falling back to the URL.
    pub fn display_subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref().or(self.url.as_deref())
    }

    /// Commit to this result, running its select action once.
    ///
    /// # Errors
    ///
    /// Returns whatever the underlying platform action reports, typically
    /// [`crate::SearchError::Action`].
    pub async fn select(self) -> Result<()> {
        self.on_select.run().await
    }
}
