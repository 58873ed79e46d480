//! Handles `resources/list`, `resources/read` and `resources/write`.

use sqlmemo_protocol::mcp::{
    McpResourceDefinition, ResourceContents, ResourcesListResult, ResourcesReadResult,
};
use sqlmemo_protocol::JsonRpcRequest;
use sqlmemo_types::MemoError;

use crate::handler::{reply_with, HandlerResult, Reply};
use crate::state::HubState;

pub(crate) const INSIGHTS_URI: &str = "memo://insights";
const TEXT_PLAIN: &str = "text/plain";

pub(crate) fn list(_request: &JsonRpcRequest, _state: &mut HubState) -> HandlerResult {
    reply_with(ResourcesListResult {
        resources: vec![McpResourceDefinition {
            uri: INSIGHTS_URI.to_string(),
            name: "Business Insights Memo".to_string(),
            description: Some("A living document of discovered business insights".to_string()),
            mime_type: Some(TEXT_PLAIN.to_string()),
        }],
    })
}

/// Serves the note log joined by newline.
pub(crate) fn read(request: &JsonRpcRequest, state: &mut HubState) -> HandlerResult {
    if let Some(uri) = request.params.extra.get("uri").and_then(|v| v.as_str()) {
        if uri != INSIGHTS_URI {
            return Err(MemoError::not_found(format!("unknown resource: {uri}")));
        }
    }

    reply_with(ResourcesReadResult {
        contents: vec![ResourceContents {
            uri: INSIGHTS_URI.to_string(),
            mime_type: TEXT_PLAIN.to_string(),
            text: state.notes.joined(),
        }],
    })
}

/// Accepted and ignored.
pub(crate) fn write(request: &JsonRpcRequest, _state: &mut HubState) -> HandlerResult {
    tracing::debug!(params = ?request.params, "resources/write ignored");
    Ok(Reply::Silent)
}
