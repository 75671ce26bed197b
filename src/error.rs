//! Error types for the quicklaunch launcher.

use quicklaunch_search::SearchError;

/// Top-level error type for the launcher and its host transport.
#[derive(Debug, thiserror::Error)]
pub enum LauncherError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send/receive error.
    #[error("channel error: {0}")]
    Channel(String),

    /// Malformed or unexpected message on the host channel.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The browser platform rejected or failed a call.
    #[error("platform error: {0}")]
    Platform(String),

    /// Search engine error.
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, LauncherError>;
