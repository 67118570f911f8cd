//! metrics-meta entry point

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use metrics_meta::{Cli, Command, FileConfig, NodeConfig, WriterArgs, WriterRuntime};
use metrics_meta_telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _telemetry = init_telemetry(TelemetryConfig::from_env().with_debug(cli.debug))
        .context("failed to initialize logging")?;

    match cli.command {
        Command::Writer(args) => run_writer(cli.config.as_deref(), &args).await,
    }
}

async fn run_writer(config_path: Option<&Path>, args: &WriterArgs) -> Result<()> {
    let file = match config_path {
        Some(path) => FileConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => FileConfig::default(),
    };
    let config = NodeConfig::resolve(file, args).context("invalid configuration")?;

    let runtime = WriterRuntime::start(config).await?;

    info!("writer is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    runtime.shutdown().await;
    Ok(())
}
