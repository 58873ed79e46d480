//! # sqlmemo-mcp
//!
//! MCP method dispatch (APPLICATION layer).
//!
//! Provides the `Dispatcher` that owns hub state and routes requests through
//! a `MethodRegistry`, plus the `Transport` contract both transports
//! implement. The dispatcher never knows which transport is active.

pub mod catalog;
mod dispatch;
pub mod dispatcher;
pub mod handler;
pub mod notes;
pub mod registry;
pub mod state;
pub mod transport;

pub use dispatcher::Dispatcher;
pub use handler::{HandlerResult, JsonRpcOutput, MethodHandler, Reply};
pub use notes::NoteLog;
pub use registry::MethodRegistry;
pub use state::HubState;
pub use transport::{queue, Inbound, Outbound, Transport};
