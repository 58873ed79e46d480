//! MCP (Model Context Protocol) type definitions.

pub mod initialize;
pub mod prompts;
pub mod resources;
pub mod tools;

pub use prompts::*;
pub use resources::*;
pub use tools::*;

/// MCP protocol method names.
pub mod methods {
    pub const PING: &str = "ping";
    pub const INITIALIZE: &str = "initialize";
    pub const TOOLS_LIST: &str = "tools/list";
    pub const TOOLS_CALL: &str = "tools/call";
    pub const PROMPTS_LIST: &str = "prompts/list";
    pub const PROMPTS_GET: &str = "prompts/get";
    pub const RESOURCES_LIST: &str = "resources/list";
    pub const RESOURCES_READ: &str = "resources/read";
    pub const RESOURCES_WRITE: &str = "resources/write";
    pub const NOTIFICATIONS_INITIALIZED: &str = "notifications/initialized";
    /// Reserved prefix for one-way messages.
    pub const NOTIFICATION_PREFIX: &str = "notifications/";
}
