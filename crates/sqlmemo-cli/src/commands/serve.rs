//! `sqlmemo serve` command.
//!
//! Opens the database, starts the chosen transport, and runs the dispatcher
//! on a dedicated blocking thread until input ends or Ctrl-C arrives.

use anyhow::Context;
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use sqlmemo_config::{ConfigOverrides, LogFormat, MemoConfig, TransportKind};
use sqlmemo_mcp::{Dispatcher, Transport};
use sqlmemo_store_sqlite::SqliteBackend;
use sqlmemo_transport_http::HttpTransport;
use sqlmemo_transport_stdio::StdioTransport;
use sqlmemo_types::FailurePolicy;

/// Start the MCP server.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Transport type: stdio or sse.
    #[arg(long, value_parser = ["stdio", "sse"])]
    pub transport: Option<String>,
    /// Log file path (stdio transport only).
    #[arg(long)]
    pub logpath: Option<String>,
    /// SQLite database path.
    #[arg(long)]
    pub dbpath: Option<String>,
    /// TCP port for the sse transport.
    #[arg(long)]
    pub port: Option<u16>,
    /// What to do when a request fails: drop or reply.
    #[arg(long, value_parser = ["drop", "reply"])]
    pub failure_policy: Option<String>,
}

impl ServeArgs {
    /// Converts the flags into configuration overrides.
    pub fn overrides(&self, log_format: Option<LogFormat>) -> anyhow::Result<ConfigOverrides> {
        let transport = match self.transport.as_deref() {
            Some("sse") => Some(TransportKind::Sse),
            Some(_) => Some(TransportKind::Stdio),
            None => None,
        };
        let failure_policy = self
            .failure_policy
            .as_deref()
            .map(str::parse::<FailurePolicy>)
            .transpose()?;
        Ok(ConfigOverrides {
            transport,
            database_path: self.dbpath.clone(),
            log_path: self.logpath.clone(),
            log_format,
            port: self.port,
            failure_policy,
        })
    }
}

/// Executes the serve command.
pub async fn execute(config: MemoConfig) -> anyhow::Result<()> {
    let backend = SqliteBackend::open(&config.store.database_path)
        .context("failed to create sqlite db")?;

    let capacity = config.dispatch.queue_capacity;
    let mut transport: Box<dyn Transport> = match config.transport {
        TransportKind::Stdio => Box::new(StdioTransport::stdio(capacity)),
        TransportKind::Sse => Box::new(HttpTransport::new(
            &config.http.host,
            config.http.port,
            capacity,
            config.http.shutdown_grace(),
        )),
    };
    info!(transport = %config.transport, "using {} transport", config.transport);

    let inbound = transport
        .receive_queue()
        .context("inbound queue already taken")?;
    let outbound = transport
        .send_queue()
        .context("outbound queue already taken")?;

    let shutdown = CancellationToken::new();
    transport.start(shutdown.child_token()).await?;

    let dispatcher =
        Dispatcher::new(Box::new(backend)).with_policy(config.dispatch.failure_policy);
    let mut dispatch = tokio::task::spawn_blocking(move || dispatcher.run(inbound, outbound));
    info!("server started");

    let finished = tokio::select! {
        res = &mut dispatch => {
            info!("input closed");
            Some(res)
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
            None
        }
    };
    shutdown.cancel();

    let transport_result = transport.wait_for_shutdown().await;
    let state = match finished {
        Some(res) => res,
        None => dispatch.await,
    }
    .context("dispatcher thread failed")?;

    state
        .into_backend()
        .close()
        .context("failed to close sqlite db")?;
    if let Err(e) = transport_result {
        warn!(error = %e, "transport stopped with an error");
        return Err(e.into());
    }
    info!("server finished");
    Ok(())
}
