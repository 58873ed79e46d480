//! Error types for the HTTP transport layer.

use sqlmemo_types::{ErrorKind, MemoError};
use thiserror::Error;

/// Errors that can occur in the HTTP transport.
#[derive(Debug, Error)]
pub enum HttpTransportError {
    /// Failed to bind to the TCP address.
    #[error("failed to bind on {addr}: {source}")]
    Bind {
        /// The address string.
        addr: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The HTTP server encountered an I/O error while serving.
    #[error("server error: {0}")]
    Serve(String),
    /// `start` was called twice.
    #[error("transport already started")]
    AlreadyStarted,
    /// A background task panicked or was aborted.
    #[error("background task failed: {0}")]
    Join(String),
}

impl From<HttpTransportError> for MemoError {
    fn from(e: HttpTransportError) -> Self {
        let kind = match &e {
            HttpTransportError::Bind { .. } => ErrorKind::Unavailable,
            HttpTransportError::AlreadyStarted => ErrorKind::InvalidInput,
            _ => ErrorKind::Internal,
        };
        MemoError::new(kind, e.to_string())
    }
}
