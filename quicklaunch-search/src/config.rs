//! Engine and scoring configuration with sensible defaults.
//!
//! The recency and tab bonuses are tunables, not business rules. The
//! defaults reproduce the launcher's long-standing ranking behaviour.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Configuration for the aggregation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Debounce window in milliseconds before a query fans out.
    pub debounce_ms: u64,
    /// Score bonuses applied by the source adapters.
    pub scoring: ScoringConfig,
    /// History adapter behaviour.
    pub history: HistoryConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 150,
            scoring: ScoringConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl SearchConfig {
    /// The debounce window as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Validates this configuration, returning an error if any field is invalid.
    pub fn validate(&self) -> Result<(), SearchError> {
        self.scoring.validate()
    }
}

/// Additive bonuses applied after the base relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Bonus for a history entry visited just now. Decays linearly to zero.
    pub recency_max_bonus: f64,
    /// Days after which a history visit earns no recency bonus.
    pub recency_horizon_days: f64,
    /// Bonus for the active tab of its window.
    pub active_tab_bonus: f64,
    /// Bonus for a pinned tab.
    pub pinned_tab_bonus: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            recency_max_bonus: 0.1,
            recency_horizon_days: 30.0,
            active_tab_bonus: 0.05,
            pinned_tab_bonus: 0.02,
        }
    }
}

impl ScoringConfig {
    /// Checks:
    /// - every bonus is finite and within `[0, 1]`
    /// - `recency_horizon_days` is finite and greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        let bonuses = [
            ("recency_max_bonus", self.recency_max_bonus),
            ("active_tab_bonus", self.active_tab_bonus),
            ("pinned_tab_bonus", self.pinned_tab_bonus),
        ];
        for (name, value) in bonuses {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(SearchError::Config(format!(
                    "{name} must be within [0, 1]"
                )));
            }
        }
        if !self.recency_horizon_days.is_finite() || self.recency_horizon_days <= 0.0 {
            return Err(SearchError::Config(
                "recency_horizon_days must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// History adapter options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Drop search-engine result pages (Google, Bing, ...) from history hits.
    pub exclude_search_pages: bool,
}
