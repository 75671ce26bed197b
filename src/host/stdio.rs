//! Stdin/stdout JSON bridge for the host channel.
//!
//! Reads newline-delimited JSON [`RequestEnvelope`] messages, dispatches
//! them through a [`HostClient`], and writes one [`ResponseEnvelope`] per
//! request as newline-delimited JSON.
//!
//! Stdout is exclusively reserved for the JSON protocol; all diagnostic
//! output (tracing, logs) must be routed to stderr.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

use crate::config::HostConfig;
use crate::error::{LauncherError, Result};
use crate::host::channel::{HostClient, host_channel};
use crate::host::contract::{RequestEnvelope, ResponseEnvelope};
use crate::host::handler::PlatformHandler;

/// Run the bridge over the process's stdin and stdout until stdin closes.
///
/// # Errors
///
/// Returns an error if stdin cannot be read or stdout cannot be written.
pub async fn run_stdio_bridge<P: PlatformHandler>(platform: Arc<P>, config: &HostConfig) -> Result<()> {
    run_bridge(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        platform,
        config,
    )
    .await
}

/// Run the bridge over arbitrary line-oriented streams until `input` ends.
///
/// Two concurrent tasks operate:
///
/// 1. **Reader** -- reads one envelope per line, dispatches it through the
///    host client, and writes the resulting response.
/// 2. **Server** -- runs the [`HostServer`](crate::host::channel::HostServer)
///    loop.
///
/// The reader runs on the current task. When it finishes the client is
/// dropped, which lets the server task exit.
///
/// # Errors
///
/// Returns an error if `input` cannot be read or `output` cannot be written.
pub async fn run_bridge<R, W, P>(
    input: R,
    output: W,
    platform: Arc<P>,
    config: &HostConfig,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    P: PlatformHandler,
{
    let (client, server) = host_channel(platform, config);
    let server_handle = tokio::spawn(server.run());

    let reader_result = run_reader(client, input, BufWriter::new(output)).await;

    let _ = server_handle.await;
    reader_result
}

/// Read `input` line-by-line, dispatch each request, and write responses.
async fn run_reader<R, W>(client: HostClient, mut input: R, mut writer: BufWriter<W>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = input
            .read_line(&mut line)
            .await
            .map_err(|e| LauncherError::Channel(format!("failed to read request line: {e}")))?;

        // EOF
        if bytes_read == 0 {
            tracing::info!("input closed (EOF); shutting down host bridge");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<RequestEnvelope>(trimmed) {
            Ok(envelope) => dispatch(&client, envelope).await,
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse request envelope");
                ResponseEnvelope::error(
                    "parse-error",
                    format!("failed to parse request envelope: {e}"),
                )
            }
        };

        let json = serde_json::to_string(&response).map_err(|e| {
            LauncherError::Protocol(format!("failed to serialize response envelope: {e}"))
        })?;
        write_line(&mut writer, &json).await?;
    }

    Ok(())
}

async fn dispatch(client: &HostClient, envelope: RequestEnvelope) -> ResponseEnvelope {
    if let Err(e) = envelope.validate() {
        return ResponseEnvelope::error(envelope.request_id, e.to_string());
    }

    let RequestEnvelope {
        request_id,
        request,
        ..
    } = envelope;
    match client.send(request).await {
        Ok(payload) => ResponseEnvelope::ok(request_id, payload),
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "host request dispatch failed");
            ResponseEnvelope::error(request_id, e.to_string())
        }
    }
}

/// Write a single JSON line to the buffered writer and flush.
async fn write_line<W: AsyncWrite + Unpin>(writer: &mut BufWriter<W>, json: &str) -> Result<()> {
    writer
        .write_all(json.as_bytes())
        .await
        .map_err(|e| LauncherError::Channel(format!("failed to write response: {e}")))?;
    writer
        .write_all(b"\n")
        .await
        .map_err(|e| LauncherError::Channel(format!("failed to write newline: {e}")))?;
    writer
        .flush()
        .await
        .map_err(|e| LauncherError::Channel(format!("failed to flush output: {e}")))?;
    Ok(())
}
