//! Tracing subscriber setup.

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use sqlmemo_config::schema::LoggingConfig;
use sqlmemo_config::{LogFormat, TransportKind};

/// Installs the global subscriber.
///
/// Under stdio, stdout carries the protocol, so logs go to the configured
/// file. Otherwise they go to stderr.
pub fn init(config: &LoggingConfig, transport: TransportKind, verbose: u8) -> anyhow::Result<()> {
    let level = match verbose {
        0 => config.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_new(level).with_context(|| format!("invalid log level {level:?}"))?;

    match transport {
        TransportKind::Stdio => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&config.path)
                .with_context(|| format!("cannot open log file {}", config.path))?;
            install(filter, config.format, Mutex::new(file), false)
        }
        TransportKind::Sse => install(filter, config.format, std::io::stderr, true),
    }
}

fn install<W>(filter: EnvFilter, format: LogFormat, writer: W, ansi: bool) -> anyhow::Result<()>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer);
    let installed = match format {
        LogFormat::Json => builder.json().with_target(true).try_init(),
        LogFormat::Plain => builder.with_ansi(ansi).try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}
