//! Handler contract shared by every routed method.

use serde::Serialize;
use serde_json::Value;

use sqlmemo_protocol::{JsonRpcErrorResponse, JsonRpcRequest, JsonRpcResponse, RequestId};
use sqlmemo_types::MemoError;

use crate::state::HubState;

/// A JSON-RPC message the hub sends back.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum JsonRpcOutput {
    /// Successful result.
    Success(JsonRpcResponse),
    /// Error object correlated by id.
    Error(JsonRpcErrorResponse),
}

impl JsonRpcOutput {
    /// Serializes the output as a single-line JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// The id of the request this output answers.
    pub fn id(&self) -> &RequestId {
        match self {
            Self::Success(r) => &r.id,
            Self::Error(e) => &e.id,
        }
    }

    /// Returns true for error outputs.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// What a handler produced for a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Send this value as the `result`.
    Result(Value),
    /// Intentionally send nothing.
    Silent,
}

/// Outcome of a handler: a reply, or a typed failure the dispatcher routes
/// through its failure policy.
pub type HandlerResult = Result<Reply, MemoError>;

/// Produces zero or one reply for a request, given mutable hub state.
pub trait MethodHandler: Send {
    /// Handles one request.
    fn handle(&self, request: &JsonRpcRequest, state: &mut HubState) -> HandlerResult;
}

impl<F> MethodHandler for F
where
    F: Fn(&JsonRpcRequest, &mut HubState) -> HandlerResult + Send,
{
    fn handle(&self, request: &JsonRpcRequest, state: &mut HubState) -> HandlerResult {
        self(request, state)
    }
}

/// Serializes a typed result into a `Reply`.
pub(crate) fn reply_with<T: Serialize>(value: T) -> HandlerResult {
    serde_json::to_value(value)
        .map(Reply::Result)
        .map_err(|e| MemoError::internal(format!("failed to encode result: {e}")))
}
