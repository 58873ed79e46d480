//! Statement capabilities granted to each relational tool.
//!
//! A capability is checked against the leading keyword(s) of a statement
//! after trimming whitespace and upper-casing.

use serde::{Deserialize, Serialize};

/// What kind of SQL statement an operation is allowed to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatementCapability {
    /// Only statements starting with `SELECT`.
    ReadOnly,
    /// Anything except statements starting with `SELECT`.
    Mutate,
    /// Only statements starting with `CREATE TABLE`.
    CreateTable,
}

impl StatementCapability {
    /// Returns true when `statement` is permitted under this capability.
    pub fn permits(self, statement: &str) -> bool {
        let normalized = statement.trim().to_uppercase();
        match self {
            Self::ReadOnly => normalized.starts_with("SELECT"),
            Self::Mutate => !normalized.starts_with("SELECT"),
            Self::CreateTable => normalized.starts_with("CREATE TABLE"),
        }
    }

    /// Short description of the rule, used in rejection messages.
    pub fn rule(self) -> &'static str {
        match self {
            Self::ReadOnly => "only SELECT queries are allowed",
            Self::Mutate => "SELECT queries are not allowed",
            Self::CreateTable => "only CREATE TABLE statements are allowed",
        }
    }
}
