use async_trait::async_trait;

use crate::context::Context;
use crate::driver::{
    Capability, Conn, ConnBeginTx, ConnExec, ConnPing, ConnPrepare, ConnQuery, ExecResult, Rows,
    Stmt, Tx,
};
use crate::error::DriverError;
use crate::operation::{OperationKind, EMPTY_STATEMENT};
use crate::value::{NamedValue, TxOptions, Value};

use super::{WrappedDriver, WrappedResult, WrappedRows, WrappedStmt, WrappedTx};

/// Connection wrapper. Only the context-aware calls are instrumented; the
/// plain variants fail with [`DriverError::MethodUnsupported`].
///
/// A capability accessor returns `Some` only if the wrapped connection has
/// that capability. Calling a capability method directly on a wrapper whose
/// parent lacks it fails with [`DriverError::CapabilityUnsupported`] and
/// observes nothing.
pub struct WrappedConn {
    driver: WrappedDriver,
    parent: Box<dyn Conn>,
}

impl WrappedConn {
    pub(crate) fn new(driver: WrappedDriver, parent: Box<dyn Conn>) -> Self {
        Self { driver, parent }
    }

    fn missing(capability: Capability) -> DriverError {
        tracing::debug!(%capability, "wrapped connection lacks capability");
        capability.unsupported()
    }
}

#[async_trait]
impl Conn for WrappedConn {
    async fn prepare(&self, _query: &str) -> Result<Box<dyn Stmt>, DriverError> {
        Err(DriverError::MethodUnsupported { method: "Conn::prepare" })
    }

    async fn begin(&self) -> Result<Box<dyn Tx>, DriverError> {
        Err(DriverError::MethodUnsupported { method: "Conn::begin" })
    }

    async fn close(&self) -> Result<(), DriverError> {
        self.parent.close().await
    }

    async fn exec(&self, _query: &str, _args: &[Value]) -> Result<Box<dyn ExecResult>, DriverError> {
        Err(DriverError::MethodUnsupported { method: "Conn::exec" })
    }

    async fn query(&self, _query: &str, _args: &[Value]) -> Result<Box<dyn Rows>, DriverError> {
        Err(DriverError::MethodUnsupported { method: "Conn::query" })
    }

    fn as_begin_tx(&self) -> Option<&dyn ConnBeginTx> {
        self.parent.as_begin_tx().map(|_| self as &dyn ConnBeginTx)
    }

    fn as_prepare(&self) -> Option<&dyn ConnPrepare> {
        self.parent.as_prepare().map(|_| self as &dyn ConnPrepare)
    }

    fn as_exec(&self) -> Option<&dyn ConnExec> {
        self.parent.as_exec().map(|_| self as &dyn ConnExec)
    }

    fn as_ping(&self) -> Option<&dyn ConnPing> {
        self.parent.as_ping().map(|_| self as &dyn ConnPing)
    }

    fn as_query(&self) -> Option<&dyn ConnQuery> {
        self.parent.as_query().map(|_| self as &dyn ConnQuery)
    }
}

#[async_trait]
impl ConnBeginTx for WrappedConn {
    async fn begin_tx(&self, ctx: &Context, opts: TxOptions) -> Result<Box<dyn Tx>, DriverError> {
        let parent = self
            .parent
            .as_begin_tx()
            .ok_or_else(|| Self::missing(Capability::ConnBeginTx))?;

        let (op, ctx) = self
            .driver
            .start_operation(ctx, OperationKind::BeginTx, EMPTY_STATEMENT);
        let result = parent.begin_tx(&ctx, opts).await;
        op.finish_with(&result);

        let tx = result?;
        Ok(Box::new(WrappedTx::new(self.driver.clone(), ctx, tx)))
    }
}

#[async_trait]
impl ConnPrepare for WrappedConn {
    async fn prepare_context(&self, ctx: &Context, query: &str) -> Result<Box<dyn Stmt>, DriverError> {
        let parent = self
            .parent
            .as_prepare()
            .ok_or_else(|| Self::missing(Capability::ConnPrepare))?;

        let (op, ctx) = self
            .driver
            .start_operation(ctx, OperationKind::PrepareContext, query);
        let result = parent.prepare_context(&ctx, query).await;
        op.finish_with(&result);

        let stmt = result?;
        Ok(Box::new(WrappedStmt::new(self.driver.clone(), ctx, query, stmt)))
    }
}

#[async_trait]
impl ConnExec for WrappedConn {
    async fn exec_context(
        &self,
        ctx: &Context,
        query: &str,
        args: &[NamedValue],
    ) -> Result<Box<dyn ExecResult>, DriverError> {
        let parent = self
            .parent
            .as_exec()
            .ok_or_else(|| Self::missing(Capability::ConnExec))?;

        let (op, ctx) = self
            .driver
            .start_operation(ctx, OperationKind::ExecContext, query);
        let result = parent.exec_context(&ctx, query, args).await;
        op.finish_with(&result);

        let res = result?;
        Ok(Box::new(WrappedResult::new(self.driver.clone(), ctx, res)))
    }
}

#[async_trait]
impl ConnPing for WrappedConn {
    async fn ping(&self, ctx: &Context) -> Result<(), DriverError> {
        let parent = self
            .parent
            .as_ping()
            .ok_or_else(|| Self::missing(Capability::ConnPing))?;

        let (op, ctx) = self
            .driver
            .start_operation(ctx, OperationKind::Ping, EMPTY_STATEMENT);
        let result = parent.ping(&ctx).await;
        op.finish_with(&result);
        result
    }
}

#[async_trait]
impl ConnQuery for WrappedConn {
    async fn query_context(
        &self,
        ctx: &Context,
        query: &str,
        args: &[NamedValue],
    ) -> Result<Box<dyn Rows>, DriverError> {
        let parent = self
            .parent
            .as_query()
            .ok_or_else(|| Self::missing(Capability::ConnQuery))?;

        let (op, ctx) = self
            .driver
            .start_operation(ctx, OperationKind::QueryContext, query);
        let result = parent.query_context(&ctx, query, args).await;
        op.finish_with(&result);

        let rows = result?;
        Ok(Box::new(WrappedRows::new(self.driver.clone(), ctx, rows)))
    }
}
