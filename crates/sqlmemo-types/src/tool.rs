//! Names of the tools reachable through `tools/call`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::capability::StatementCapability;
use crate::error::MemoError;

/// A tool advertised in the catalog.
///
/// `AppendInsight` is served by the dispatcher itself; the other five are
/// forwarded to the relational backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolName {
    ReadQuery,
    WriteQuery,
    CreateTable,
    ListTables,
    DescribeTable,
    AppendInsight,
}

impl ToolName {
    /// All tools, in catalog order.
    pub const ALL: [ToolName; 6] = [
        ToolName::ReadQuery,
        ToolName::WriteQuery,
        ToolName::CreateTable,
        ToolName::ListTables,
        ToolName::DescribeTable,
        ToolName::AppendInsight,
    ];

    /// Returns the wire name of the tool.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadQuery => "read-query",
            Self::WriteQuery => "write-query",
            Self::CreateTable => "create-table",
            Self::ListTables => "list-tables",
            Self::DescribeTable => "describe-table",
            Self::AppendInsight => "append-insight",
        }
    }

    /// Argument keys looked up (in order) to find the tool's single input.
    pub fn argument_keys(self) -> &'static [&'static str] {
        match self {
            Self::ReadQuery | Self::WriteQuery | Self::CreateTable => &["query"],
            Self::DescribeTable => &["table_name", "query"],
            Self::AppendInsight => &["insight"],
            Self::ListTables => &[],
        }
    }

    /// The statement capability a tool runs under, if it executes caller SQL.
    pub fn capability(self) -> Option<StatementCapability> {
        match self {
            Self::ReadQuery => Some(StatementCapability::ReadOnly),
            Self::WriteQuery => Some(StatementCapability::Mutate),
            Self::CreateTable => Some(StatementCapability::CreateTable),
            _ => None,
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = MemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| MemoError::not_found(format!("unknown call: {s}")))
    }
}
