//! sqlmemo - SQLite-backed MCP server with an insight memo.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use sqlmemo_config::{load_config, LogFormat};

mod commands;
mod logging;

/// SQLite MCP server over stdio or HTTP push streams.
#[derive(Debug, Parser)]
#[command(name = "sqlmemo", version, about)]
struct Cli {
    /// Configuration file path.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format: plain or json (for log aggregation).
    #[arg(long, global = true, value_parser = ["plain", "json"])]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the MCP server over stdio or SSE.
    Serve(commands::serve::ServeArgs),
}

/// How long to wait for blocked I/O threads (such as a pending stdin read)
/// once the server has finished.
const RUNTIME_SHUTDOWN: Duration = Duration::from_secs(1);

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run(cli));
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN);
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let log_format = match cli.log_format.as_deref() {
        Some("json") => Some(LogFormat::Json),
        Some(_) => Some(LogFormat::Plain),
        None => None,
    };

    match &cli.command {
        Commands::Serve(args) => {
            let overrides = args.overrides(log_format)?;
            let config = load_config(cli.config.as_deref(), &overrides)?;
            logging::init(&config.logging, config.transport, cli.verbose)?;
            tracing::debug!(config_file = ?cli.config, ?config, "configuration loaded");
            commands::serve::execute(config).await
        }
    }
}
