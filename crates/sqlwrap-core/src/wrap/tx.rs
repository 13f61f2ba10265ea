use async_trait::async_trait;

use crate::context::Context;
use crate::driver::Tx;
use crate::error::DriverError;
use crate::operation::{OperationKind, EMPTY_STATEMENT};

use super::WrappedDriver;

/// Transaction wrapper. Commit and rollback are observed under the context
/// the transaction was begun with.
pub struct WrappedTx {
    driver: WrappedDriver,
    ctx: Context,
    parent: Box<dyn Tx>,
}

impl WrappedTx {
    pub(crate) fn new(driver: WrappedDriver, ctx: Context, parent: Box<dyn Tx>) -> Self {
        Self { driver, ctx, parent }
    }
}

#[async_trait]
impl Tx for WrappedTx {
    async fn commit(&self) -> Result<(), DriverError> {
        let (op, _) = self
            .driver
            .start_operation(&self.ctx, OperationKind::Commit, EMPTY_STATEMENT);
        let result = self.parent.commit().await;
        op.finish_with(&result);
        result
    }

    async fn rollback(&self) -> Result<(), DriverError> {
        let (op, _) = self
            .driver
            .start_operation(&self.ctx, OperationKind::Rollback, EMPTY_STATEMENT);
        let result = self.parent.rollback().await;
        op.finish_with(&result);
        result
    }
}
