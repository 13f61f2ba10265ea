//! Decorating wrappers around a real driver.
//!
//! ```text
//! WrappedDriver ─open→ WrappedConn ─begin_tx→        WrappedTx
//!                                  ├prepare_context→ WrappedStmt ─exec/query→ WrappedResult / WrappedRows
//!                                  ├exec_context→    WrappedResult
//!                                  └query_context→   WrappedRows
//! ```
//!
//! Every observed call follows the same steps: start the chain, run the
//! real call with the context the chain returned, finish the chain with the
//! outcome, then hand the outcome back unchanged. Only returned sub-objects
//! are wrapped; errors and payloads pass through as-is.

mod conn;
mod result;
mod rows;
mod stmt;
mod tx;

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::Context;
use crate::driver::{Conn, Driver};
use crate::error::DriverError;
use crate::observer::{Observer, ObserverChain, OperationGuard};
use crate::operation::OperationKind;

pub use conn::WrappedConn;
pub use result::WrappedResult;
pub use rows::WrappedRows;
pub use stmt::WrappedStmt;
pub use tx::WrappedTx;

struct DriverInner {
    parent: Arc<dyn Driver>,
    chain: ObserverChain,
}

/// A driver that reports every lifecycle call to its observer chain.
///
/// Cloning is cheap and yields a handle to the same driver and chain.
#[derive(Clone)]
pub struct WrappedDriver {
    inner: Arc<DriverInner>,
}

impl WrappedDriver {
    /// Wrap `driver`. Observers run in the order given, for the lifetime of
    /// the wrapper.
    pub fn new(driver: Arc<dyn Driver>, observers: Vec<Arc<dyn Observer>>) -> Self {
        Self {
            inner: Arc::new(DriverInner {
                parent: driver,
                chain: ObserverChain::new(observers),
            }),
        }
    }

    /// The observer chain attached to this driver.
    pub fn chain(&self) -> &ObserverChain {
        &self.inner.chain
    }

    /// Open a connection and return the concrete wrapper.
    pub async fn open_conn(&self, name: &str) -> Result<WrappedConn, DriverError> {
        let conn = self.inner.parent.open(name).await?;
        Ok(WrappedConn::new(self.clone(), conn))
    }

    pub(crate) fn start_operation(
        &self,
        ctx: &Context,
        kind: OperationKind,
        query: &str,
    ) -> (OperationGuard, Context) {
        self.inner.chain.start_operation(ctx.clone(), kind, query)
    }
}

impl std::fmt::Debug for WrappedDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrappedDriver")
            .field("chain", &self.inner.chain)
            .finish()
    }
}

#[async_trait]
impl Driver for WrappedDriver {
    /// Opening a connection is forwarded but not observed.
    async fn open(&self, name: &str) -> Result<Box<dyn Conn>, DriverError> {
        Ok(Box::new(self.open_conn(name).await?))
    }
}

/// Wrap `driver` with `observers`, returning it as a plain driver.
pub fn wrap_driver(driver: Arc<dyn Driver>, observers: Vec<Arc<dyn Observer>>) -> Arc<dyn Driver> {
    Arc::new(WrappedDriver::new(driver, observers))
}
