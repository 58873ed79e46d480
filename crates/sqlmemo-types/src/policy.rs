//! What the dispatcher does when a request cannot be answered normally.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MemoError;

/// Reply policy for failed handlers and unknown methods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Log the failure and send nothing; the caller times out.
    #[default]
    Drop,
    /// Send a JSON-RPC error response correlated by id.
    Reply,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Drop => "drop",
            Self::Reply => "reply",
        })
    }
}

impl FromStr for FailurePolicy {
    type Err = MemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drop" => Ok(Self::Drop),
            "reply" => Ok(Self::Reply),
            other => Err(MemoError::invalid_input(format!(
                "unknown failure policy '{other}' (expected drop or reply)"
            ))),
        }
    }
}
