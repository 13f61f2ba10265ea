use crate::context::Context;
use crate::driver::ExecResult;
use crate::error::DriverError;
use crate::operation::{OperationKind, EMPTY_STATEMENT};

use super::WrappedDriver;

/// Exec-result wrapper. Each accessor is its own observed operation.
pub struct WrappedResult {
    driver: WrappedDriver,
    ctx: Context,
    parent: Box<dyn ExecResult>,
}

impl WrappedResult {
    pub(crate) fn new(driver: WrappedDriver, ctx: Context, parent: Box<dyn ExecResult>) -> Self {
        Self { driver, ctx, parent }
    }
}

impl ExecResult for WrappedResult {
    fn last_insert_id(&self) -> Result<i64, DriverError> {
        let (op, _) = self
            .driver
            .start_operation(&self.ctx, OperationKind::LastInsertId, EMPTY_STATEMENT);
        let result = self.parent.last_insert_id();
        op.finish_with(&result);
        result
    }

    fn rows_affected(&self) -> Result<i64, DriverError> {
        let (op, _) = self
            .driver
            .start_operation(&self.ctx, OperationKind::RowsAffected, EMPTY_STATEMENT);
        let result = self.parent.rows_affected();
        op.finish_with(&result);
        result
    }
}
