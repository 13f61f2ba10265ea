use async_trait::async_trait;

use crate::context::Context;
use crate::driver::Rows;
use crate::error::DriverError;
use crate::operation::{OperationKind, EMPTY_STATEMENT};
use crate::value::Value;

use super::WrappedDriver;

/// Row-cursor wrapper. Only `next` is observed, once per advance; the call
/// that reports [`DriverError::EndOfRows`] is observed like any other.
pub struct WrappedRows {
    driver: WrappedDriver,
    ctx: Context,
    parent: Box<dyn Rows>,
}

impl WrappedRows {
    pub(crate) fn new(driver: WrappedDriver, ctx: Context, parent: Box<dyn Rows>) -> Self {
        Self { driver, ctx, parent }
    }
}

#[async_trait]
impl Rows for WrappedRows {
    fn columns(&self) -> Vec<String> {
        self.parent.columns()
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        self.parent.close().await
    }

    async fn next(&mut self, dest: &mut [Value]) -> Result<(), DriverError> {
        let (op, _) = self
            .driver
            .start_operation(&self.ctx, OperationKind::Next, EMPTY_STATEMENT);
        let result = self.parent.next(dest).await;
        op.finish_with(&result);
        result
    }
}
