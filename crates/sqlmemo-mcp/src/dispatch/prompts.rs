//! Handles `prompts/list` and `prompts/get`.

use sqlmemo_protocol::mcp::{
    McpPromptDefinition, PromptArgument, PromptContent, PromptMessage, PromptsGetResult,
    PromptsListResult,
};
use sqlmemo_protocol::JsonRpcRequest;
use sqlmemo_types::MemoError;

use crate::handler::{reply_with, HandlerResult};
use crate::state::HubState;

pub(crate) const DEMO_PROMPT: &str = "mcp-demo";
const TOPIC: &str = "topic";

pub(crate) fn list(_request: &JsonRpcRequest, _state: &mut HubState) -> HandlerResult {
    reply_with(PromptsListResult {
        prompts: vec![McpPromptDefinition {
            name: DEMO_PROMPT.to_string(),
            description: Some(
                "A prompt to seed the database with initial data and demonstrate what you can \
                 do with an SQLite MCP Server + Claude"
                    .to_string(),
            ),
            arguments: vec![PromptArgument {
                name: TOPIC.to_string(),
                description: Some("Topic to seed the database with initial data".to_string()),
                required: true,
            }],
        }],
    })
}

/// Renders the demo prompt. An empty name selects it; a missing topic renders as "".
pub(crate) fn get(request: &JsonRpcRequest, _state: &mut HubState) -> HandlerResult {
    let name = request.params.name.as_str();
    if !name.is_empty() && name != DEMO_PROMPT {
        return Err(MemoError::not_found(format!("unknown prompt: {name}")));
    }

    let topic = request.params.argument_str(TOPIC).unwrap_or_default();
    reply_with(PromptsGetResult {
        description: Some("This is a test prompt".to_string()),
        messages: vec![PromptMessage {
            role: "user".to_string(),
            content: PromptContent::Text {
                text: format!(
                    "The assistants goal is to walkthrough an informative demo of MCP. topic: {topic}"
                ),
            },
        }],
    })
}
