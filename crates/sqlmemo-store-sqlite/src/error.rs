//! Store-specific error types.

use sqlmemo_types::{DiagnosticError, ErrorKind, MemoError, ToolName};
use thiserror::Error;

/// Errors from the relational backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The statement kind is not allowed for the chosen tool.
    #[error("{tool}: {rule}")]
    Forbidden {
        tool: ToolName,
        rule: &'static str,
    },
    /// The tool is not served by this backend.
    #[error("unknown call: {name}")]
    UnknownTool { name: String },
    /// `describe-table` found no columns for the table.
    #[error("table not found: {table}")]
    TableNotFound { table: String },
    /// The database file could not be opened.
    #[error("failed to open database at '{path}': {message}")]
    Open { path: String, message: String },
    /// A read statement failed to prepare or step.
    #[error("query execution error: {message}")]
    Query { message: String },
    /// A mutating statement failed.
    #[error("write query execution error: {message}")]
    Write { message: String },
    /// Query rows could not be rendered as JSON text.
    #[error("failed to encode result: {message}")]
    Encode { message: String },
    /// The connection refused to close.
    #[error("failed to close database: {message}")]
    Close { message: String },
}

impl From<StoreError> for MemoError {
    fn from(e: StoreError) -> Self {
        let kind = match &e {
            StoreError::Forbidden { .. } => ErrorKind::PermissionDenied,
            StoreError::UnknownTool { .. } | StoreError::TableNotFound { .. } => {
                ErrorKind::NotFound
            }
            StoreError::Query { .. } | StoreError::Write { .. } => ErrorKind::InvalidInput,
            StoreError::Open { .. } | StoreError::Encode { .. } | StoreError::Close { .. } => {
                ErrorKind::Internal
            }
        };
        MemoError::from_diagnostic(kind, &e)
    }
}

impl DiagnosticError for StoreError {
    fn hint(&self) -> Option<String> {
        match self {
            Self::Forbidden { tool, .. } => Some(match tool {
                ToolName::ReadQuery => {
                    "read-query only runs SELECT statements; use write-query.".to_string()
                }
                ToolName::WriteQuery => {
                    "write-query refuses SELECT statements; use read-query.".to_string()
                }
                _ => format!("{tool} only runs CREATE TABLE; use write-query for other DDL."),
            }),
            Self::TableNotFound { .. } => {
                Some("Call list-tables to see which tables exist.".to_string())
            }
            _ => None,
        }
    }
}
