//! Built-in method handlers.
//!
//! Each sub-module handles one family of MCP methods as free functions
//! matching the `MethodHandler` signature.

pub(crate) mod lifecycle;
pub(crate) mod prompts;
pub(crate) mod resources;
pub(crate) mod tools;
