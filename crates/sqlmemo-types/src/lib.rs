//! # sqlmemo-types
//!
//! Domain types for the sqlmemo message hub.
//! Pure data types plus the `ToolBackend` port; no I/O lives here.

pub mod backend;
pub mod capability;
pub mod error;
pub mod policy;
pub mod session;
pub mod tool;

// Re-exports for convenience.
pub use backend::ToolBackend;
pub use capability::StatementCapability;
pub use error::{DiagnosticError, ErrorKind, MemoError};
pub use policy::FailurePolicy;
pub use session::SessionId;
pub use tool::ToolName;
