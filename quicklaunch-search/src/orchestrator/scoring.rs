//! Relevance scoring shared by every source adapter.
//!
//! The base score is a fixed tier ladder, first match wins:
//!
//! ```text
//! title == query         1.0
//! title starts with      0.8
//! title contains         0.6
//! url contains           0.4
//! otherwise              0.0
//! ```
//!
//! Both operands are NFKC-folded and lowercased first, so full-width and
//! half-width input forms compare equal. Adapters add their own bonuses
//! on top and clamp with [`clamp_score`].

use unicode_normalization::UnicodeNormalization;

use crate::config::ScoringConfig;

const MILLIS_PER_DAY: f64 = 1000.0 * 60.0 * 60.0 * 24.0;

/// How a query matched a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Title equals the query.
    Exact,
    /// Title starts with the query.
    Prefix,
    /// Title contains the query.
    TitleContains,
    /// Only the URL contains the query.
    UrlContains,
    /// No match.
    None,
}

impl MatchTier {
    /// The base score for this tier.
    pub fn score(self) -> f64 {
        match self {
            Self::Exact => 1.0,
            Self::Prefix => 0.8,
            Self::TitleContains => 0.6,
            Self::UrlContains => 0.4,
            Self::None => 0.0,
        }
    }
}

/// NFKC-fold and lowercase `text` for comparison.
pub fn normalize(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

/// Classify how `query` matches a candidate with `title` and `url`.
pub fn classify(query: &str, title: &str, url: &str) -> MatchTier {
    let query = normalize(query);
    let title = normalize(title);

    if title == query {
        MatchTier::Exact
    } else if title.starts_with(&query) {
        MatchTier::Prefix
    } else if title.contains(&query) {
        MatchTier::TitleContains
    } else if normalize(url).contains(&query) {
        MatchTier::UrlContains
    } else {
        MatchTier::None
    }
}

/// Base relevance of a candidate for `query`, before any bonus.
pub fn relevance_score(query: &str, title: &str, url: &str) -> f64 {
    classify(query, title, url).score()
}

/// Clamp a score into `[0, 1]`. NaN maps to 0.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 1.0)
}

/// Recency bonus for a history visit at `last_visit_ms`, seen at `now_ms`.
///
/// Decays linearly from `recency_max_bonus` for a visit just now to zero
/// at `recency_horizon_days`, and stays at zero beyond it. A visit
/// timestamped in the future counts as "just now".
pub fn recency_bonus(last_visit_ms: f64, now_ms: f64, config: &ScoringConfig) -> f64 {
    let days_since_visit = ((now_ms - last_visit_ms) / MILLIS_PER_DAY).max(0.0);
    let bonus = config.recency_max_bonus * (1.0 - days_since_visit / config.recency_horizon_days);
    bonus.max(0.0)
}
