//! Embedded tool catalog served by `tools/list`.
//!
//! The catalog is stored as a complete response envelope; only its `result`
//! is used, and the dispatcher stamps the current request id on it.

use serde_json::Value;

use sqlmemo_protocol::mcp::ToolsListResult;
use sqlmemo_types::MemoError;

/// The raw catalog envelope.
pub const TOOLS_JSON: &str = include_str!("tools.json");

/// Parses the catalog and returns its `result` object.
pub fn tools_list() -> Result<Value, MemoError> {
    let mut envelope: Value = serde_json::from_str(TOOLS_JSON)
        .map_err(|e| MemoError::internal(format!("tool catalog is not valid JSON: {e}")))?;
    envelope
        .get_mut("result")
        .map(Value::take)
        .ok_or_else(|| MemoError::internal("tool catalog has no result"))
}

/// The catalog as typed definitions.
pub fn tool_definitions() -> Result<ToolsListResult, MemoError> {
    serde_json::from_value(tools_list()?)
        .map_err(|e| MemoError::internal(format!("tool catalog has an unexpected shape: {e}")))
}
