//! MCP resources/* method types.

use serde::{Deserialize, Serialize};

/// A resource definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpResourceDefinition {
    /// Resource URI.
    pub uri: String,
    /// Resource name.
    pub name: String,
    /// Resource description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// MIME type.
    #[serde(
        default,
        rename = "mimeType",
        skip_serializing_if = "Option::is_none"
    )]
    pub mime_type: Option<String>,
}

/// Response for `resources/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcesListResult {
    /// Available resources.
    pub resources: Vec<McpResourceDefinition>,
}

/// Text contents of one resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceContents {
    /// Resource URI.
    pub uri: String,
    /// MIME type.
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// The resource body.
    pub text: String,
}

/// Response for `resources/read`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcesReadResult {
    /// Contents of the requested resource.
    pub contents: Vec<ResourceContents>,
}
