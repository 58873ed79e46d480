//! Configuration loader (file + env + CLI merge).

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::Serialize;
use thiserror::Error;

use sqlmemo_types::FailurePolicy;

use crate::schema::{LogFormat, MemoConfig, TransportKind};

/// Prefix of the environment variables read into the config.
pub const ENV_PREFIX: &str = "SQLMEMO_";

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {0}")]
    Missing(String),
    /// Failed to load or merge configuration.
    #[error("configuration error: {0}")]
    Load(String),
    /// The merged configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub transport: Option<TransportKind>,
    pub database_path: Option<String>,
    pub log_path: Option<String>,
    pub log_format: Option<LogFormat>,
    pub port: Option<u16>,
    pub failure_policy: Option<FailurePolicy>,
}

impl ConfigOverrides {
    fn apply(&self, mut figment: Figment) -> Figment {
        figment = merge_opt(figment, "transport", &self.transport);
        figment = merge_opt(figment, "store.database_path", &self.database_path);
        figment = merge_opt(figment, "logging.path", &self.log_path);
        figment = merge_opt(figment, "logging.format", &self.log_format);
        figment = merge_opt(figment, "http.port", &self.port);
        merge_opt(figment, "dispatch.failure_policy", &self.failure_policy)
    }
}

fn merge_opt<T: Serialize>(figment: Figment, key: &str, value: &Option<T>) -> Figment {
    match value {
        Some(v) => figment.merge(Serialized::default(key, v)),
        None => figment,
    }
}

/// Builds the layered provider:
/// 1. Default values
/// 2. Config file (if given)
/// 3. Environment variables (`SQLMEMO_` prefix, `__` nests)
/// 4. The bare `PORT` variable as `http.port`
/// 5. Command-line overrides
pub fn figment(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(MemoConfig::default()));

    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }

    figment = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .merge(Env::raw().only(&["PORT"]).map(|_| "http.port".into()));

    overrides.apply(figment)
}

/// Loads and validates the configuration.
pub fn load_config(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<MemoConfig, ConfigError> {
    if let Some(path) = config_path {
        if !path.is_file() {
            return Err(ConfigError::Missing(path.display().to_string()));
        }
    }

    let config: MemoConfig = figment(config_path, overrides)
        .extract()
        .map_err(|e| ConfigError::Load(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &MemoConfig) -> Result<(), ConfigError> {
    if config.dispatch.queue_capacity == 0 {
        return Err(ConfigError::Invalid(
            "dispatch.queue_capacity must be greater than zero".into(),
        ));
    }
    if config.store.database_path.trim().is_empty() {
        return Err(ConfigError::Invalid("store.database_path is empty".into()));
    }
    Ok(())
}
