use async_trait::async_trait;

use crate::context::Context;
use crate::driver::{Capability, ExecResult, Rows, Stmt, StmtExec, StmtQuery};
use crate::error::DriverError;
use crate::operation::{OperationKind, EMPTY_STATEMENT};
use crate::value::{NamedValue, Value};

use super::{WrappedDriver, WrappedResult, WrappedRows};

/// Prepared-statement wrapper. Exec and query calls are reported with the
/// query text captured at prepare time.
pub struct WrappedStmt {
    driver: WrappedDriver,
    ctx: Context,
    query: String,
    parent: Box<dyn Stmt>,
}

impl WrappedStmt {
    pub(crate) fn new(driver: WrappedDriver, ctx: Context, query: &str, parent: Box<dyn Stmt>) -> Self {
        Self {
            driver,
            ctx,
            query: query.to_string(),
            parent,
        }
    }

    fn missing(capability: Capability) -> DriverError {
        tracing::debug!(%capability, "wrapped statement lacks capability");
        capability.unsupported()
    }
}

#[async_trait]
impl Stmt for WrappedStmt {
    async fn close(&self) -> Result<(), DriverError> {
        let (op, _) = self
            .driver
            .start_operation(&self.ctx, OperationKind::StmtClose, EMPTY_STATEMENT);
        let result = self.parent.close().await;
        op.finish_with(&result);
        result
    }

    fn num_input(&self) -> Option<usize> {
        self.parent.num_input()
    }

    async fn exec(&self, _args: &[Value]) -> Result<Box<dyn ExecResult>, DriverError> {
        Err(DriverError::MethodUnsupported { method: "Stmt::exec" })
    }

    async fn query(&self, _args: &[Value]) -> Result<Box<dyn Rows>, DriverError> {
        Err(DriverError::MethodUnsupported { method: "Stmt::query" })
    }

    fn as_exec(&self) -> Option<&dyn StmtExec> {
        self.parent.as_exec().map(|_| self as &dyn StmtExec)
    }

    fn as_query(&self) -> Option<&dyn StmtQuery> {
        self.parent.as_query().map(|_| self as &dyn StmtQuery)
    }
}

#[async_trait]
impl StmtExec for WrappedStmt {
    async fn exec_context(
        &self,
        ctx: &Context,
        args: &[NamedValue],
    ) -> Result<Box<dyn ExecResult>, DriverError> {
        let parent = self
            .parent
            .as_exec()
            .ok_or_else(|| Self::missing(Capability::StmtExec))?;

        let (op, ctx) = self
            .driver
            .start_operation(ctx, OperationKind::StmtExecContext, &self.query);
        let result = parent.exec_context(&ctx, args).await;
        op.finish_with(&result);

        let res = result?;
        Ok(Box::new(WrappedResult::new(self.driver.clone(), ctx, res)))
    }
}

#[async_trait]
impl StmtQuery for WrappedStmt {
    async fn query_context(&self, ctx: &Context, args: &[NamedValue]) -> Result<Box<dyn Rows>, DriverError> {
        let parent = self
            .parent
            .as_query()
            .ok_or_else(|| Self::missing(Capability::StmtQuery))?;

        let (op, ctx) = self
            .driver
            .start_operation(ctx, OperationKind::StmtQueryContext, &self.query);
        let result = parent.query_context(&ctx, args).await;
        op.finish_with(&result);

        let rows = result?;
        Ok(Box::new(WrappedRows::new(self.driver.clone(), ctx, rows)))
    }
}
