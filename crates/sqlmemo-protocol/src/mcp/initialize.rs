//! MCP initialize method types.
//!
//! The initialize handshake is the first message exchanged between
//! client and server to negotiate capabilities and protocol version.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A capability that can announce list changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListChangedCapability {
    /// Whether the server emits list-changed notifications.
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
}

/// Resource-related capability.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceCapability {
    /// Whether clients may subscribe to resource updates.
    pub subscribe: bool,
    /// Whether the server emits list-changed notifications.
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
}

/// Server capabilities returned during initialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerCapabilities {
    /// Experimental, non-standard capabilities.
    #[serde(default)]
    pub experimental: Map<String, Value>,
    /// Prompts capability.
    #[serde(default)]
    pub prompts: ListChangedCapability,
    /// Resources capability.
    #[serde(default)]
    pub resources: ResourceCapability,
    /// Tools capability.
    #[serde(default)]
    pub tools: ListChangedCapability,
}

/// Client info sent during initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Client name.
    pub name: String,
    /// Client version.
    pub version: String,
}

/// Server info returned during initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

/// Request params for `initialize`, as far as the hub reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeParams {
    /// Protocol version requested by client.
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Client info.
    #[serde(rename = "clientInfo")]
    pub client_info: ClientInfo,
}

/// Response for `initialize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResult {
    /// Protocol version agreed by server.
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Server capabilities.
    pub capabilities: ServerCapabilities,
    /// Server info.
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

/// MCP protocol version supported by this implementation.
pub const PROTOCOL_VERSION: &str = "2024-11-05";
