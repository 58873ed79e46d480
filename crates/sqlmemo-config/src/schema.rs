//! Configuration schema types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use sqlmemo_types::FailurePolicy;

/// Top-level sqlmemo configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoConfig {
    /// Which transport to serve on.
    #[serde(default)]
    pub transport: TransportKind,
    /// Relational store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Push transport settings.
    #[serde(default)]
    pub http: HttpConfig,
    /// Dispatcher settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Transport selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Line-delimited JSON over stdin/stdout.
    #[default]
    Stdio,
    /// `GET /sse` + `POST /messages`.
    Sse,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stdio => "stdio",
            Self::Sse => "sse",
        })
    }
}

/// Relational store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub database_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: default_db_path(),
        }
    }
}

fn default_db_path() -> String {
    "/tmp/sqlmemo.db".to_string()
}

/// Push transport listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound on the shutdown drain, in seconds.
    #[serde(default = "default_grace_secs")]
    pub shutdown_grace_secs: u64,
}

impl HttpConfig {
    /// Returns the shutdown grace period as a `Duration`.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_grace_secs: default_grace_secs(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3001
}
fn default_grace_secs() -> u64 {
    5
}

/// Dispatcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Capacity of the inbound and outbound queues.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// What to do when a request cannot be answered normally.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

fn default_queue_capacity() -> usize {
    100
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Plain,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "sqlmemo_mcp=trace").
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file used when stdout carries the wire protocol.
    #[serde(default = "default_log_path")]
    pub path: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            path: default_log_path(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_path() -> String {
    "/tmp/sqlmemo.log".to_string()
}
