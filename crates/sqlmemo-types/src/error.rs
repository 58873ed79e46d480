//! Errors that cross from a backend or transport into the dispatcher.
//!
//! The dispatcher only sees `MemoError`. Its `kind` decides whether the
//! caller or the server is at fault, and its `hint` becomes the `data`
//! of a JSON-RPC error reply.

use std::fmt;

/// Who a failure is attributed to when it is reported back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A table, tool, prompt, resource or session that does not exist.
    NotFound,
    /// The statement kind is not allowed for the chosen tool.
    PermissionDenied,
    /// Missing arguments, or SQL the engine rejected.
    InvalidInput,
    /// A queue, socket or pipe is closed or could not be acquired.
    Unavailable,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// True when retrying with different parameters could succeed.
    pub fn is_caller_fault(self) -> bool {
        matches!(
            self,
            Self::NotFound | Self::PermissionDenied | Self::InvalidInput
        )
    }

    fn label(self) -> &'static str {
        match self {
            Self::NotFound => "not found",
            Self::PermissionDenied => "not permitted",
            Self::InvalidInput => "invalid input",
            Self::Unavailable => "unavailable",
            Self::Internal => "internal error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A failed operation, as the dispatcher reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoError {
    pub kind: ErrorKind,
    pub message: String,
    /// Suggestion for the caller, sent as `{"hint": ...}`.
    pub hint: Option<String>,
}

impl MemoError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            hint: None,
        }
    }

    /// Wraps a component error, carrying over its message and hint.
    pub fn from_diagnostic<E>(kind: ErrorKind, err: &E) -> Self
    where
        E: DiagnosticError + fmt::Display,
    {
        Self {
            kind,
            message: err.to_string(),
            hint: err.hint(),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PermissionDenied, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl fmt::Display for MemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {hint})")?;
        }
        Ok(())
    }
}

impl std::error::Error for MemoError {}

/// Component errors that can tell the caller what to try instead.
pub trait DiagnosticError {
    fn hint(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Refused;

    impl fmt::Display for Refused {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("read-query: only SELECT queries are allowed")
        }
    }

    impl DiagnosticError for Refused {
        fn hint(&self) -> Option<String> {
            Some("use write-query".into())
        }
    }

    #[test]
    fn display_names_kind_and_hint() {
        let err = MemoError::not_found("table ghost").with_hint("call list-tables");
        assert_eq!(err.to_string(), "not found: table ghost (hint: call list-tables)");
        assert_eq!(MemoError::internal("disk").to_string(), "internal error: disk");
    }

    #[test]
    fn diagnostic_carries_message_and_hint() {
        let err = MemoError::from_diagnostic(ErrorKind::PermissionDenied, &Refused);
        assert_eq!(err.message, "read-query: only SELECT queries are allowed");
        assert_eq!(err.hint.as_deref(), Some("use write-query"));
    }

    #[test]
    fn caller_faults() {
        assert!(ErrorKind::NotFound.is_caller_fault());
        assert!(ErrorKind::PermissionDenied.is_caller_fault());
        assert!(ErrorKind::InvalidInput.is_caller_fault());
        assert!(!ErrorKind::Unavailable.is_caller_fault());
        assert!(!ErrorKind::Internal.is_caller_fault());
    }
}
