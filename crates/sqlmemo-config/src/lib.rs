//! # sqlmemo-config
//!
//! Configuration management for sqlmemo.
//! Supports layered config: defaults -> file -> env vars -> command line.

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError, ConfigOverrides};
pub use schema::{LogFormat, MemoConfig, TransportKind};
