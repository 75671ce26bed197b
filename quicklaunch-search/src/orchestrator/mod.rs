//! Search orchestrator: scoring, dedup, concurrent passes, debounced sessions.
//!
//! Source adapters score their own items with [`scoring`]. A [`pass`] fans
//! one query out to every source, deduplicates by URL and ranks by score.
//! A [`session`] drives passes from live query edits.

pub mod dedup;
pub mod pass;
pub mod scoring;
pub mod session;
