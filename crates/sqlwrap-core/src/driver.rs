//! The driver boundary: the traits a storage driver implements.
//!
//! The base traits ([`Driver`], [`Conn`], [`Tx`], [`Stmt`], [`ExecResult`],
//! [`Rows`]) cover what every driver must provide. The context-aware calls
//! are optional capabilities, each its own trait, reached through an
//! `as_*` accessor that returns `None` unless the object implements it.
//! Missing capabilities are only an error when a caller actually needs one.
//!
//! # Thread Safety
//! Connections, statements and transactions are `Send + Sync` and take
//! `&self`; implementations that need mutable state use interior
//! mutability. [`Rows`] is a cursor and takes `&mut self` to advance.

use async_trait::async_trait;

use crate::context::Context;
use crate::error::DriverError;
use crate::value::{NamedValue, TxOptions, Value};

/// An optional capability a connection or statement may implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ConnBeginTx,
    ConnPrepare,
    ConnExec,
    ConnPing,
    ConnQuery,
    StmtExec,
    StmtQuery,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnBeginTx => write!(f, "context-aware begin"),
            Self::ConnPrepare => write!(f, "context-aware prepare"),
            Self::ConnExec => write!(f, "context-aware exec"),
            Self::ConnPing => write!(f, "ping"),
            Self::ConnQuery => write!(f, "context-aware query"),
            Self::StmtExec => write!(f, "context-aware statement exec"),
            Self::StmtQuery => write!(f, "context-aware statement query"),
        }
    }
}

impl Capability {
    /// The error reported when this capability is missing.
    pub fn unsupported(self) -> DriverError {
        DriverError::CapabilityUnsupported { capability: self }
    }
}

/// Entry point of a storage driver.
#[async_trait]
pub trait Driver: Send + Sync + 'static {
    /// Open a new connection. `name` is driver-specific (usually a DSN).
    async fn open(&self, name: &str) -> Result<Box<dyn Conn>, DriverError>;
}

/// A connection to the backing store.
#[async_trait]
pub trait Conn: Send + Sync {
    /// Prepare a statement without a context.
    async fn prepare(&self, query: &str) -> Result<Box<dyn Stmt>, DriverError>;

    /// Begin a transaction without a context.
    async fn begin(&self) -> Result<Box<dyn Tx>, DriverError>;

    /// Close the connection.
    async fn close(&self) -> Result<(), DriverError>;

    /// Execute without a context. Optional.
    async fn exec(&self, _query: &str, _args: &[Value]) -> Result<Box<dyn ExecResult>, DriverError> {
        Err(DriverError::MethodUnsupported { method: "Conn::exec" })
    }

    /// Query without a context. Optional.
    async fn query(&self, _query: &str, _args: &[Value]) -> Result<Box<dyn Rows>, DriverError> {
        Err(DriverError::MethodUnsupported { method: "Conn::query" })
    }

    fn as_begin_tx(&self) -> Option<&dyn ConnBeginTx> {
        None
    }

    fn as_prepare(&self) -> Option<&dyn ConnPrepare> {
        None
    }

    fn as_exec(&self) -> Option<&dyn ConnExec> {
        None
    }

    fn as_ping(&self) -> Option<&dyn ConnPing> {
        None
    }

    fn as_query(&self) -> Option<&dyn ConnQuery> {
        None
    }
}

#[async_trait]
pub trait ConnBeginTx: Send + Sync {
    async fn begin_tx(&self, ctx: &Context, opts: TxOptions) -> Result<Box<dyn Tx>, DriverError>;
}

#[async_trait]
pub trait ConnPrepare: Send + Sync {
    async fn prepare_context(&self, ctx: &Context, query: &str) -> Result<Box<dyn Stmt>, DriverError>;
}

#[async_trait]
pub trait ConnExec: Send + Sync {
    async fn exec_context(
        &self,
        ctx: &Context,
        query: &str,
        args: &[NamedValue],
    ) -> Result<Box<dyn ExecResult>, DriverError>;
}

#[async_trait]
pub trait ConnPing: Send + Sync {
    async fn ping(&self, ctx: &Context) -> Result<(), DriverError>;
}

#[async_trait]
pub trait ConnQuery: Send + Sync {
    async fn query_context(
        &self,
        ctx: &Context,
        query: &str,
        args: &[NamedValue],
    ) -> Result<Box<dyn Rows>, DriverError>;
}

/// A transaction in progress.
#[async_trait]
pub trait Tx: Send + Sync {
    async fn commit(&self) -> Result<(), DriverError>;
    async fn rollback(&self) -> Result<(), DriverError>;
}

/// A prepared statement.
#[async_trait]
pub trait Stmt: Send + Sync {
    async fn close(&self) -> Result<(), DriverError>;

    /// Number of placeholders, or `None` if the driver cannot tell.
    fn num_input(&self) -> Option<usize>;

    async fn exec(&self, args: &[Value]) -> Result<Box<dyn ExecResult>, DriverError>;

    async fn query(&self, args: &[Value]) -> Result<Box<dyn Rows>, DriverError>;

    fn as_exec(&self) -> Option<&dyn StmtExec> {
        None
    }

    fn as_query(&self) -> Option<&dyn StmtQuery> {
        None
    }
}

#[async_trait]
pub trait StmtExec: Send + Sync {
    async fn exec_context(
        &self,
        ctx: &Context,
        args: &[NamedValue],
    ) -> Result<Box<dyn ExecResult>, DriverError>;
}

#[async_trait]
pub trait StmtQuery: Send + Sync {
    async fn query_context(&self, ctx: &Context, args: &[NamedValue]) -> Result<Box<dyn Rows>, DriverError>;
}

/// Outcome of an exec call.
pub trait ExecResult: Send + Sync {
    fn last_insert_id(&self) -> Result<i64, DriverError>;
    fn rows_affected(&self) -> Result<i64, DriverError>;
}

/// A forward-only row cursor.
#[async_trait]
pub trait Rows: Send + Sync {
    fn columns(&self) -> Vec<String>;

    async fn close(&mut self) -> Result<(), DriverError>;

    /// Fill `dest` with the next row. Returns [`DriverError::EndOfRows`]
    /// once the cursor is exhausted.
    async fn next(&mut self, dest: &mut [Value]) -> Result<(), DriverError>;
}

// Capability dispatch for callers holding trait objects. Each helper
// resolves the capability first and reports it as unsupported if absent.

impl dyn Conn {
    pub async fn begin_tx(&self, ctx: &Context, opts: TxOptions) -> Result<Box<dyn Tx>, DriverError> {
        let cap = self.as_begin_tx().ok_or_else(|| Capability::ConnBeginTx.unsupported())?;
        cap.begin_tx(ctx, opts).await
    }

    pub async fn prepare_context(&self, ctx: &Context, query: &str) -> Result<Box<dyn Stmt>, DriverError> {
        let cap = self.as_prepare().ok_or_else(|| Capability::ConnPrepare.unsupported())?;
        cap.prepare_context(ctx, query).await
    }

    pub async fn exec_context(
        &self,
        ctx: &Context,
        query: &str,
        args: &[NamedValue],
    ) -> Result<Box<dyn ExecResult>, DriverError> {
        let cap = self.as_exec().ok_or_else(|| Capability::ConnExec.unsupported())?;
        cap.exec_context(ctx, query, args).await
    }

    pub async fn ping(&self, ctx: &Context) -> Result<(), DriverError> {
        let cap = self.as_ping().ok_or_else(|| Capability::ConnPing.unsupported())?;
        cap.ping(ctx).await
    }

    pub async fn query_context(
        &self,
        ctx: &Context,
        query: &str,
        args: &[NamedValue],
    ) -> Result<Box<dyn Rows>, DriverError> {
        let cap = self.as_query().ok_or_else(|| Capability::ConnQuery.unsupported())?;
        cap.query_context(ctx, query, args).await
    }
}

impl dyn Stmt {
    pub async fn exec_context(
        &self,
        ctx: &Context,
        args: &[NamedValue],
    ) -> Result<Box<dyn ExecResult>, DriverError> {
        let cap = self.as_exec().ok_or_else(|| Capability::StmtExec.unsupported())?;
        cap.exec_context(ctx, args).await
    }

    pub async fn query_context(&self, ctx: &Context, args: &[NamedValue]) -> Result<Box<dyn Rows>, DriverError> {
        let cap = self.as_query().ok_or_else(|| Capability::StmtQuery.unsupported())?;
        cap.query_context(ctx, args).await
    }
}
