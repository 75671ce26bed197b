//! One aggregation pass: concurrent fan-out, merge, dedup, rank.
//!
//! Every source is queried concurrently on the current task. A failing
//! source (an error or a panic inside its `search`) is logged and
//! contributes nothing; the pass still settles with whatever the other
//! sources returned. No per-source timeout is applied, so a source that
//! never answers holds the pass open.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::error::{Result, SearchError};
use crate::source::SourceAdapter;
use crate::types::{SearchResult, SourceKind};

use super::dedup::deduplicate;

/// A source that failed during a pass.
#[derive(Debug, Clone)]
pub struct SourceFailure {
    pub kind: SourceKind,
    pub error: SearchError,
}

/// The settled outcome of one pass.
#[derive(Debug, Clone, Default)]
pub struct PassOutcome {
    /// Deduplicated results, highest score first.
    pub results: Vec<SearchResult>,
    /// Sources whose lookup failed, in source order.
    pub failures: Vec<SourceFailure>,
}

/// Run one pass of `query` against every source.
///
/// # Pipeline
///
/// 1. Fan out `search(query)` to all sources with [`futures::future::join_all`]
/// 2. Log per-source errors at warn level; keep successful result lists.
///    A source that panics is recorded as [`SearchError::Orchestration`].
/// 3. Concatenate, deduplicate by URL, sort by score descending
pub async fn run_pass(sources: &[Arc<dyn SourceAdapter>], query: &str) -> PassOutcome {
    tracing::trace!(query, sources = sources.len(), "starting pass");

    let futures: Vec<_> = sources
        .iter()
        .map(|source| async move {
            let kind = source.kind();
            let outcome = AssertUnwindSafe(source.search(query))
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| {
                    Err(SearchError::Orchestration(panic_message(payload.as_ref())))
                });
            (kind, outcome)
        })
        .collect();

    let outcomes = futures::future::join_all(futures).await;

    let mut all_results: Vec<SearchResult> = Vec::new();
    let mut failures: Vec<SourceFailure> = Vec::new();

    for (kind, outcome) in outcomes {
        match outcome {
            Ok(source_results) => {
                tracing::debug!(source = %kind, count = source_results.len(), "source returned results");
                all_results.extend(source_results);
            }
            Err(error) => {
                tracing::warn!(source = %kind, error = %error, "source search failed");
                failures.push(SourceFailure { kind, error });
            }
        }
    }

    PassOutcome {
        results: merge_and_rank(all_results),
        failures,
    }
}

/// Run a pass, converting a panic outside the per-source isolation
/// (merging, ranking) into an error.
///
/// # Errors
///
/// Returns [`SearchError::Orchestration`] if the pass panicked.
pub async fn run_pass_isolated(
    sources: &[Arc<dyn SourceAdapter>],
    query: &str,
) -> Result<PassOutcome> {
    AssertUnwindSafe(run_pass(sources, query))
        .catch_unwind()
        .await
        .map_err(|payload| SearchError::Orchestration(panic_message(payload.as_ref())))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panicked".to_string())
}

/// Deduplicate and sort merged results, highest score first.
///
/// The sort is stable, so equal scores keep their merge order.
pub fn merge_and_rank(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut ranked = deduplicate(results);
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}
