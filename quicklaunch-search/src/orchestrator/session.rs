//! Debounced, superseding search session.
//!
//! A [`SearchSession`] turns a stream of query edits into at most one
//! pass per quiet period and publishes `{results, is_loading}` through a
//! [`tokio::sync::watch`] channel.
//!
//! # State Machine
//!
//! ```text
//!            non-blank query           timer fires
//! ┌──────┐ ─────────────────► ┌────────────┐ ─────────► ┌───────────┐
//! │ Idle │                    │ Debouncing │            │ Searching │
//! └──▲───┘ ◄───────────────── └─────▲──────┘            └─────┬─────┘
//!    │        blank query           │ query edit              │ all sources
//!    │        (from any state)      └─────────────────────────┤ settled
//!    │                                                  ┌─────▼─────┐
//!    └──────────────────────────────────────────────────┤  Settled  │
//!                                                       └───────────┘
//! ```
//!
//! Every query edit bumps a generation counter stored alongside the
//! state. A pass remembers the generation it was started for and only
//! publishes when that generation is still current. Edits cancel a
//! pending debounce timer outright; a pass already in flight runs to
//! completion and its outcome is dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::SearchConfig;
use crate::source::SourceAdapter;
use crate::types::SearchResult;

use super::pass::run_pass_isolated;

/// Where the session is in its query lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchPhase {
    /// No query; results are empty.
    #[default]
    Idle,
    /// Waiting for the debounce window to elapse.
    Debouncing,
    /// A pass is in flight.
    Searching,
    /// The latest pass has settled.
    Settled,
}

/// The observable state exposed to the presentation layer.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// The most recent query passed to [`SearchSession::set_query`].
    pub query: String,
    /// Ranked results of the latest settled pass.
    pub results: Vec<SearchResult>,
    /// Whether a pass for the current query is in flight.
    pub is_loading: bool,
    /// Current lifecycle phase.
    pub phase: SearchPhase,
    generation: u64,
}

impl SearchState {
    /// Identity of the latest query edit. Increases on every edit.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Options for a [`SearchSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Quiet period after the last edit before a pass starts.
    pub debounce: Duration,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(150),
        }
    }
}

impl From<&SearchConfig> for SearchOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            debounce: config.debounce(),
        }
    }
}

/// Aggregates a set of sources behind a debounced query input.
///
/// Methods that start a debounce timer must be called from within a
/// Tokio runtime.
pub struct SearchSession {
    sources: Arc<[Arc<dyn SourceAdapter>]>,
    debounce: Duration,
    state: Arc<watch::Sender<SearchState>>,
    timer: Option<JoinHandle<()>>,
}

impl SearchSession {
    /// Create an idle session over `sources`.
    pub fn new(sources: Vec<Arc<dyn SourceAdapter>>, options: SearchOptions) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            sources: sources.into(),
            debounce: options.debounce,
            state: Arc::new(state),
            timer: None,
        }
    }

    /// Create an idle session using the debounce window from `config`.
    pub fn from_config(sources: Vec<Arc<dyn SourceAdapter>>, config: &SearchConfig) -> Self {
        Self::new(sources, SearchOptions::from(config))
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Replace the source set. Passes already started keep the old set.
    pub fn set_sources(&mut self, sources: Vec<Arc<dyn SourceAdapter>>) {
        self.sources = sources.into();
    }

    /// Feed a new query value.
    ///
    /// A blank query clears results immediately and queries nothing.
    /// Anything else (re)starts the debounce timer; when it fires, the
    /// query fans out to every source.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.cancel_timer();

        let blank = query.trim().is_empty();
        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            generation = state.generation;
            state.query.clone_from(&query);
            if blank {
                state.results.clear();
                state.is_loading = false;
                state.phase = SearchPhase::Idle;
            } else {
                state.phase = SearchPhase::Debouncing;
            }
        });

        if blank {
            tracing::trace!(generation, "query cleared");
            return;
        }

        let state = Arc::clone(&self.state);
        let sources = Arc::clone(&self.sources);
        let debounce = self.debounce;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            let started = state.send_if_modified(|s| {
                if s.generation != generation {
                    return false;
                }
                s.phase = SearchPhase::Searching;
                s.is_loading = true;
                true
            });
            if started {
                // Detached: a later edit must not cancel lookups in flight.
                tokio::spawn(settle_pass(state, sources, query, generation));
            }
        }));
    }

    /// Stop the session: cancel a pending timer, orphan any pass in flight
    /// and discard the current results.
    pub fn close(&mut self) {
        self.cancel_timer();
        self.state.send_modify(|state| {
            state.generation += 1;
            state.results.clear();
            state.is_loading = false;
            state.phase = SearchPhase::Idle;
        });
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.close();
    }
}

async fn settle_pass(
    state: Arc<watch::Sender<SearchState>>,
    sources: Arc<[Arc<dyn SourceAdapter>]>,
    query: String,
    generation: u64,
) {
    let results = match run_pass_isolated(&sources, &query).await {
        Ok(outcome) => outcome.results,
        Err(err) => {
            tracing::error!(error = %err, "unexpected search failure");
            Vec::new()
        }
    };

    let applied = state.send_if_modified(|s| {
        if s.generation != generation {
            return false;
        }
        s.results = results;
        s.is_loading = false;
        s.phase = SearchPhase::Settled;
        true
    });
    if !applied {
        tracing::debug!(generation, "discarding superseded pass");
    }
}
