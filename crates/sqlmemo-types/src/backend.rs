//! Port for the relational tool backend.
//!
//! Implementations live in adapter crates (e.g., `sqlmemo-store-sqlite`).

use crate::error::MemoError;
use crate::tool::ToolName;

/// Executes one named relational tool against a single free-text argument.
///
/// The dispatcher is the only caller and runs on a single thread, so
/// implementations take `&mut self` and need no interior locking.
pub trait ToolBackend: Send {
    /// Runs `tool` with `argument` (a statement or table name) and returns
    /// the result rendered as text.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` for a statement the tool may not run, `NotFound`
    /// for an unknown tool or table, `InvalidInput` for SQL the engine
    /// rejects, and `Internal` when a result cannot be rendered.
    fn call(&mut self, tool: ToolName, argument: &str) -> Result<String, MemoError>;

    /// Releases the underlying handle.
    fn close(self: Box<Self>) -> Result<(), MemoError>;
}
