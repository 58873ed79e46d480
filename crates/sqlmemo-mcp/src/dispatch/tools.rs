//! Handles `tools/list` and `tools/call`.

use sqlmemo_protocol::mcp::ToolsCallResult;
use sqlmemo_protocol::JsonRpcRequest;
use sqlmemo_types::{MemoError, ToolName};

use crate::catalog;
use crate::handler::{reply_with, HandlerResult, Reply};
use crate::state::HubState;

/// Replies with the embedded catalog.
pub(crate) fn list(_request: &JsonRpcRequest, _state: &mut HubState) -> HandlerResult {
    Ok(Reply::Result(catalog::tools_list()?))
}

/// Routes a tool call to the note log or the relational backend.
pub(crate) fn call(request: &JsonRpcRequest, state: &mut HubState) -> HandlerResult {
    let tool: ToolName = request.params.name.parse()?;
    let argument = tool_argument(request, tool)?;
    tracing::debug!(%tool, "executing tool");

    let text = match tool {
        ToolName::AppendInsight => {
            state.notes.append(argument);
            argument.to_string()
        }
        _ => state.backend.call(tool, argument)?,
    };
    reply_with(ToolsCallResult::text(text))
}

/// Finds the tool's single string argument.
///
/// Tools that take no input get "". A tool that takes input fails when none
/// of its keys is present as a string.
fn tool_argument(request: &JsonRpcRequest, tool: ToolName) -> Result<&str, MemoError> {
    let keys = tool.argument_keys();
    if keys.is_empty() {
        return Ok("");
    }
    keys.iter()
        .find_map(|key| request.params.argument_str(key))
        .ok_or_else(|| {
            MemoError::invalid_input(format!("{tool} requires a string `{}` argument", keys[0]))
        })
}
