//! Result deduplication by URL.
//!
//! Collapses results that point at the same URL into a single winner:
//!
//! - the first result seen for a URL is kept by default
//! - a tab replaces an earlier non-tab result
//! - among non-tab results, a strictly higher score replaces the kept one
//! - a kept tab is never displaced
//!
//! Results without a URL are never merged.

use std::collections::HashMap;

use crate::types::{SearchResult, SourceKind};

/// Deduplicate `results` by exact URL.
///
/// Each URL occupies the position of its first occurrence; the winner is
/// swapped into that slot. Callers sort afterwards, so the order here is
/// only stable, not meaningful.
pub fn deduplicate(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut kept: Vec<SearchResult> = Vec::with_capacity(results.len());
    let mut slots: HashMap<String, usize> = HashMap::new();

    for result in results {
        let Some(url) = result.url.clone() else {
            kept.push(result);
            continue;
        };

        match slots.get(&url) {
            None => {
                slots.insert(url, kept.len());
                kept.push(result);
            }
            Some(&slot) => {
                if replaces(&kept[slot], &result) {
                    kept[slot] = result;
                }
            }
        }
    }

    kept
}

fn replaces(existing: &SearchResult, candidate: &SearchResult) -> bool {
    if existing.kind == SourceKind::Tab {
        return false;
    }
    candidate.kind == SourceKind::Tab || candidate.score > existing.score
}
