//! Line-oriented query loop behind `quicklaunch search`.
//!
//! Each input line becomes a query edit on a [`SearchSession`] backed by a
//! host channel; once that edit settles, its results are written as one
//! JSON line. The loop ends at end of input and waits for the host server
//! to shut down.

use std::sync::Arc;

use quicklaunch_search::{BrowserApi, SearchPhase, SearchResult};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::LauncherConfig;
use crate::error::{LauncherError, Result};
use crate::host::channel::host_channel;
use crate::host::handler::PlatformHandler;
use crate::launcher_session;

/// Run queries read from `input` against `platform`, writing each settled
/// result list to `output`.
///
/// # Errors
///
/// Returns an error if the search configuration is invalid, `input` cannot
/// be read, or `output` cannot be written.
pub async fn run_query_loop<R, W, P>(
    input: R,
    mut output: W,
    platform: Arc<P>,
    config: &LauncherConfig,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    P: PlatformHandler,
{
    let (client, server) = host_channel(platform, &config.host);
    let server_handle = tokio::spawn(server.run());

    let browser: Arc<dyn BrowserApi> = Arc::new(client);
    let mut session = launcher_session(browser, config)?;
    let mut state_rx = session.subscribe();

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        session.set_query(line.as_str());
        let generation = session.snapshot().generation();

        let results: Vec<SearchResult> = state_rx
            .wait_for(|s| {
                s.generation() == generation
                    && matches!(s.phase, SearchPhase::Idle | SearchPhase::Settled)
            })
            .await
            .map_err(|e| LauncherError::Channel(format!("search session closed: {e}")))?
            .results
            .clone();

        let json = serde_json::to_string(&results)
            .map_err(|e| LauncherError::Protocol(format!("failed to serialize results: {e}")))?;
        output.write_all(json.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }

    // Results hold host clients through their select actions; the server
    // only stops once the session, its state and every client are gone.
    drop(state_rx);
    drop(session);
    if let Err(e) = server_handle.await {
        tracing::warn!(error = %e, "host server task failed");
    }
    Ok(())
}
