//! Error types for the quicklaunch-search crate.
//!
//! Messages are stable strings suitable for logs. Query text never
//! appears in an error message.

/// Errors that can occur while searching or acting on a result.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// An external lookup (tabs, history, bookmarks) failed.
    #[error("lookup failed: {0}")]
    Lookup(String),

    /// A select action (open URL, activate tab) failed.
    #[error("action failed: {0}")]
    Action(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A pass failed outside per-source isolation.
    #[error("orchestration error: {0}")]
    Orchestration(String),
}

/// Convenience type alias for quicklaunch-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
