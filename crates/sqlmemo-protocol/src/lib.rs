//! # sqlmemo-protocol
//!
//! MCP protocol and JSON-RPC 2.0 type definitions.
//! This crate defines the wire format shared by both transports and the
//! dispatcher; it performs no I/O.

pub mod jsonrpc;
pub mod mcp;

pub use jsonrpc::*;
pub use mcp::methods;
