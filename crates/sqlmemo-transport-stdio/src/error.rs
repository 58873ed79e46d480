//! Transport-layer error types.

use sqlmemo_types::{ErrorKind, MemoError};
use thiserror::Error;

/// Errors from the stdio transport layer.
#[derive(Debug, Error)]
pub enum StdioTransportError {
    /// Failed to read from the input stream.
    #[error("read error: {0}")]
    Read(String),
    /// Failed to write to the output stream.
    #[error("write error: {0}")]
    Write(String),
    /// A reply could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),
    /// `start` was called twice.
    #[error("transport already started")]
    AlreadyStarted,
    /// A background task panicked or was aborted.
    #[error("background task failed: {0}")]
    Join(String),
}

impl From<StdioTransportError> for MemoError {
    fn from(e: StdioTransportError) -> Self {
        let kind = match &e {
            StdioTransportError::Read(_) | StdioTransportError::Write(_) => ErrorKind::Unavailable,
            StdioTransportError::AlreadyStarted => ErrorKind::InvalidInput,
            _ => ErrorKind::Internal,
        };
        MemoError::new(kind, e.to_string())
    }
}
