//! Trait definition for pluggable result sources.
//!
//! Each source (tabs, history, bookmarks) implements [`SourceAdapter`] to
//! provide a uniform interface the aggregation engine can fan out to.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{SearchResult, SourceKind};

/// A pluggable source of search results.
///
/// Implementors wrap one external lookup and map its items into scored
/// [`SearchResult`] values. Every implementation must:
///
/// - return an empty list for a blank or whitespace-only query without
///   performing any lookup
/// - otherwise perform exactly one lookup per call
/// - tag every result with [`SourceAdapter::kind`]
/// - clamp every score into `[0, 1]`
/// - propagate lookup failures instead of swallowing them
///
/// The order of the returned list carries no meaning.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Which [`SourceKind`] this adapter produces.
    fn kind(&self) -> SourceKind;

    /// Search this source for `query`.
    ///
    /// # Errors
    ///
    /// Returns the lookup's error unchanged, typically
    /// [`crate::SearchError::Lookup`].
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>>;
}
