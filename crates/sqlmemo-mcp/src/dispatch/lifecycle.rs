//! Handles `ping` and `initialize`.

use serde_json::{json, Value};

use sqlmemo_protocol::mcp::initialize::{
    InitializeParams, InitializeResult, ServerCapabilities, ServerInfo, PROTOCOL_VERSION,
};
use sqlmemo_protocol::JsonRpcRequest;

use crate::handler::{reply_with, HandlerResult, Reply};
use crate::state::HubState;

/// Server name announced during initialization.
pub(crate) const SERVER_NAME: &str = "sqlmemo";

pub(crate) fn ping(_request: &JsonRpcRequest, _state: &mut HubState) -> HandlerResult {
    Ok(Reply::Result(json!({})))
}

/// Replies with the fixed capability descriptor. Client info is logged when present.
pub(crate) fn initialize(request: &JsonRpcRequest, _state: &mut HubState) -> HandlerResult {
    let extra = Value::Object(request.params.extra.clone());
    if let Ok(params) = serde_json::from_value::<InitializeParams>(extra) {
        tracing::info!(
            client = %params.client_info.name,
            client_version = %params.client_info.version,
            protocol = %params.protocol_version,
            "client initializing"
        );
    }

    reply_with(InitializeResult {
        protocol_version: PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities::default(),
        server_info: ServerInfo {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    })
}
