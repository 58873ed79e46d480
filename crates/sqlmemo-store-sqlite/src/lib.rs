//! # sqlmemo-store-sqlite
//!
//! SQLite adapter for the relational tools.
//! Implements `ToolBackend` with five statement-gated operations over a
//! single connection.

pub mod backend;
pub mod error;
mod row_mapping;

pub use backend::{RowObject, SqliteBackend};
pub use error::StoreError;
