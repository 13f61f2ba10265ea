//! The closed vocabulary of observable driver calls.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Query text passed to observers for calls that carry no statement.
pub const EMPTY_STATEMENT: &str = "";

/// One observable lifecycle call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    #[serde(rename = "BeginTx")]
    BeginTx,
    #[serde(rename = "PrepareContext")]
    PrepareContext,
    #[serde(rename = "ExecContext")]
    ExecContext,
    #[serde(rename = "Ping")]
    Ping,
    #[serde(rename = "QueryContext")]
    QueryContext,
    #[serde(rename = "Commit")]
    Commit,
    #[serde(rename = "Rollback")]
    Rollback,
    #[serde(rename = "Stmt.Close")]
    StmtClose,
    #[serde(rename = "Stmt.ExecContext")]
    StmtExecContext,
    #[serde(rename = "Stmt.QueryContext")]
    StmtQueryContext,
    #[serde(rename = "LastInsertId")]
    LastInsertId,
    #[serde(rename = "RowsAffected")]
    RowsAffected,
    #[serde(rename = "Next")]
    Next,
}

impl OperationKind {
    /// Number of kinds in the vocabulary.
    pub const COUNT: usize = 13;

    /// Every kind, in declaration order.
    pub const ALL: [OperationKind; Self::COUNT] = [
        Self::BeginTx,
        Self::PrepareContext,
        Self::ExecContext,
        Self::Ping,
        Self::QueryContext,
        Self::Commit,
        Self::Rollback,
        Self::StmtClose,
        Self::StmtExecContext,
        Self::StmtQueryContext,
        Self::LastInsertId,
        Self::RowsAffected,
        Self::Next,
    ];

    /// Canonical name, as reported to observers and used in config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BeginTx => "BeginTx",
            Self::PrepareContext => "PrepareContext",
            Self::ExecContext => "ExecContext",
            Self::Ping => "Ping",
            Self::QueryContext => "QueryContext",
            Self::Commit => "Commit",
            Self::Rollback => "Rollback",
            Self::StmtClose => "Stmt.Close",
            Self::StmtExecContext => "Stmt.ExecContext",
            Self::StmtQueryContext => "Stmt.QueryContext",
            Self::LastInsertId => "LastInsertId",
            Self::RowsAffected => "RowsAffected",
            Self::Next => "Next",
        }
    }

    /// Position in [`OperationKind::ALL`].
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownOperation(s.to_string()))
    }
}
