//! Schema defaults and serde behavior.

use std::time::Duration;

use sqlmemo_config::schema::{
    DispatchConfig, HttpConfig, LogFormat, LoggingConfig, MemoConfig, StoreConfig, TransportKind,
};
use sqlmemo_types::FailurePolicy;

#[test]
fn memo_config_default_values() {
    let config = MemoConfig::default();
    assert_eq!(config.transport, TransportKind::Stdio);
    assert_eq!(config.store.database_path, "/tmp/sqlmemo.db");
    assert_eq!(config.http.host, "0.0.0.0");
    assert_eq!(config.http.port, 3001);
    assert_eq!(config.http.shutdown_grace_secs, 5);
    assert_eq!(config.dispatch.queue_capacity, 100);
    assert_eq!(config.dispatch.failure_policy, FailurePolicy::Drop);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.path, "/tmp/sqlmemo.log");
    assert_eq!(config.logging.format, LogFormat::Plain);
}

#[test]
fn grace_returns_duration() {
    let http = HttpConfig {
        shutdown_grace_secs: 9,
        ..HttpConfig::default()
    };
    assert_eq!(http.shutdown_grace(), Duration::from_secs(9));
}

#[test]
fn enums_use_lowercase_names() {
    let json = r#"{"transport":"sse","dispatch":{"failure_policy":"reply"},"logging":{"format":"json"}}"#;
    let config: MemoConfig = serde_json::from_str(json).expect("parse");
    assert_eq!(config.transport, TransportKind::Sse);
    assert_eq!(config.dispatch.failure_policy, FailurePolicy::Reply);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.transport.to_string(), "sse");
}

#[test]
fn deny_unknown_fields_rejects_extra_key() {
    let json = r#"{"store":{},"unknown_key":"bad"}"#;
    assert!(serde_json::from_str::<MemoConfig>(json).is_err());
    let nested = r#"{"http":{"prot":1}}"#;
    assert!(serde_json::from_str::<MemoConfig>(nested).is_err());
}

#[test]
fn partial_config_uses_defaults_for_missing() {
    let json = r#"{"http":{"port":8080}}"#;
    let config: MemoConfig = serde_json::from_str(json).expect("parse");
    assert_eq!(config.http.port, 8080);
    assert_eq!(config.http.host, "0.0.0.0");
    assert_eq!(config.store.database_path, StoreConfig::default().database_path);
    assert_eq!(
        config.dispatch.queue_capacity,
        DispatchConfig::default().queue_capacity
    );
    assert_eq!(config.logging.level, LoggingConfig::default().level);
}
