//! CLI binary for quicklaunch.
//!
//! Stdout carries JSON lines only; all tracing output goes to stderr.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use quicklaunch::LauncherConfig;
use quicklaunch::host::SnapshotPlatform;
use quicklaunch::host::stdio::run_stdio_bridge;
use quicklaunch::query_loop::run_query_loop;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

/// quicklaunch: one ranked list over your tabs, history and bookmarks.
#[derive(Parser)]
#[command(name = "quicklaunch", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Read queries from stdin (one per line) and print each settled result
    /// list as a JSON line.
    Search {
        /// JSON snapshot of tabs, history and bookmarks to search.
        #[arg(long)]
        snapshot: PathBuf,
    },

    /// Serve host requests as newline-delimited JSON over stdin/stdout.
    Host {
        /// JSON snapshot of tabs, history and bookmarks to serve.
        #[arg(long)]
        snapshot: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("quicklaunch=info,quicklaunch_search=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = LauncherConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Search { snapshot } => run_search(&config, &snapshot).await,
        Command::Host { snapshot } => run_host(&config, &snapshot).await,
    }
}

async fn run_search(config: &LauncherConfig, snapshot: &Path) -> anyhow::Result<()> {
    let platform = Arc::new(SnapshotPlatform::from_file(snapshot)?);
    run_query_loop(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        platform,
        config,
    )
    .await?;
    Ok(())
}

async fn run_host(config: &LauncherConfig, snapshot: &Path) -> anyhow::Result<()> {
    let platform = Arc::new(SnapshotPlatform::from_file(snapshot)?);

    tracing::info!("quicklaunch host starting");
    run_stdio_bridge(platform, &config.host).await.map_err(|e| {
        tracing::error!(error = %e, "quicklaunch host exited with error");
        anyhow::anyhow!("quicklaunch host failed: {e}")
    })?;
    tracing::info!("quicklaunch host shut down cleanly");
    Ok(())
}
