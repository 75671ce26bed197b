//! quicklaunch: a keyboard-driven launcher over open tabs, browsing history
//! and bookmarks.
//!
//! The ranking engine lives in the `quicklaunch-search` crate. This crate
//! wires it to the browser:
//!
//! - **Host**: request/response transport to the privileged side that owns
//!   tabs, history and bookmarks ([`host`])
//! - **Overlay**: show/hide/focus lifecycle and the toggle shortcut ([`overlay`])
//! - **Config**: one TOML file for engine, host and overlay settings ([`config`])
//! - **Query loop**: line-in, JSON-out driver for a session ([`query_loop`])

pub mod config;
pub mod error;
pub mod host;
pub mod overlay;
pub mod query_loop;

use std::sync::Arc;

pub use config::LauncherConfig;
pub use error::{LauncherError, Result};
pub use quicklaunch_search as search;

use quicklaunch_search::{BrowserApi, SearchSession};

/// Build a search session over the standard sources, reaching the browser
/// through `browser`.
///
/// # Errors
///
/// Returns an error if the search configuration is invalid.
pub fn launcher_session(
    browser: Arc<dyn BrowserApi>,
    config: &LauncherConfig,
) -> Result<SearchSession> {
    let sources = quicklaunch_search::default_sources(browser, &config.search)?;
    Ok(SearchSession::from_config(sources, &config.search))
}
