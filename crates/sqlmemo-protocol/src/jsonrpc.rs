//! JSON-RPC 2.0 types for MCP transport.
//!
//! Only the subset the hub speaks is modelled: single requests (no batches),
//! requests without an `id` are one-way, and errors are a separate envelope.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Protocol tag carried by every envelope.
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request or notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version, always "2.0".
    pub jsonrpc: String,
    /// Request ID; absent for one-way notifications. An explicit `null`
    /// is read as absent, so such a message gets no reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    /// Method name, by convention `namespace/action`.
    pub method: String,
    /// Named parameters.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "RequestParams::is_empty"
    )]
    pub params: RequestParams,
}

/// Request parameters: a name plus an open argument map.
///
/// Used as tool name + tool arguments for `tools/call` and `prompts/get`,
/// and as generic named arguments otherwise. Unrecognised keys are kept
/// in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestParams {
    /// Tool or prompt name.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,
    /// Arguments keyed by name. `null` reads as no arguments.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Map::is_empty"
    )]
    pub arguments: Map<String, Value>,
    /// Any other top-level parameter.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RequestParams {
    /// Returns true when no field carries data.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.arguments.is_empty() && self.extra.is_empty()
    }

    /// Returns a string argument, or `None` if absent or not a string.
    pub fn argument_str(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(Value::as_str)
    }
}

/// JSON-RPC 2.0 success response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version, always "2.0".
    pub jsonrpc: String,
    /// Request ID (matches the request).
    pub id: RequestId,
    /// Result value.
    pub result: Value,
}

/// JSON-RPC 2.0 error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcErrorResponse {
    /// Protocol version, always "2.0".
    pub jsonrpc: String,
    /// Request ID (matches the request).
    pub id: RequestId,
    /// Error details.
    pub error: JsonRpcError,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code.
    pub code: i32,
    /// Human-readable message.
    pub message: String,
    /// Optional structured data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Request ID can be a number or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric ID.
    Number(i64),
    /// String ID.
    String(String),
}

/// Standard JSON-RPC error codes.
pub mod error_codes {
    /// Invalid JSON was received.
    pub const PARSE_ERROR: i32 = -32700;
    /// The JSON sent is not a valid Request object.
    pub const INVALID_REQUEST: i32 = -32600;
    /// The method does not exist.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid method parameter(s).
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal JSON-RPC error.
    pub const INTERNAL_ERROR: i32 = -32603;
}

impl JsonRpcRequest {
    /// Creates a new JSON-RPC 2.0 request expecting a reply.
    pub fn new(id: RequestId, method: impl Into<String>, params: RequestParams) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(id),
            method: method.into(),
            params,
        }
    }

    /// Creates a one-way notification (no `id`).
    pub fn notification(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: None,
            method: method.into(),
            params: RequestParams::default(),
        }
    }

    /// Returns true for methods under the reserved `notifications/` prefix.
    ///
    /// These never receive a reply, whatever their `id`.
    pub fn is_notification(&self) -> bool {
        self.method.starts_with(crate::methods::NOTIFICATION_PREFIX)
    }
}

impl JsonRpcResponse {
    /// Creates a success response.
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result,
        }
    }
}

impl JsonRpcErrorResponse {
    /// Creates an error response.
    pub fn error(id: RequestId, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error: JsonRpcError {
                code,
                message: message.into(),
                data: None,
            },
        }
    }

    /// Attaches structured data to the error object.
    pub fn with_data(mut self, data: Value) -> Self {
        self.error.data = Some(data);
        self
    }
}

/// Accepts `null` wherever the field's default would be used.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
