//! sqlwrap-core — transparent instrumentation for storage drivers.
//!
//! # Overview
//!
//! SqlWrap decorates an existing [`Driver`] so that every lifecycle call
//! (begin, prepare, exec, query, commit, row advance, ...) is reported to a
//! chain of [`Observer`]s before and after the real work runs. Callers of the
//! wrapped driver see exactly the behavior of the underlying driver: the same
//! payloads, the same error values, the same optional capabilities.
//!
//! The core crate defines:
//!
//! - [`OperationKind`] — the closed vocabulary of observable calls
//! - [`Observer`] / [`Handle`] — the two-phase start/finish protocol
//! - [`OperationFilter`] — observer decorator that silences selected kinds
//! - [`Driver`], [`Conn`], [`Tx`], [`Stmt`], [`ExecResult`], [`Rows`] — the
//!   driver boundary, with optional capability traits
//! - [`WrappedDriver`] and the `wrap` module — the decorating wrappers
//! - [`Context`] — the propagation context threaded through observers
//! - [`DriverError`] — the error type crossing the driver boundary

pub mod context;
pub mod driver;
pub mod error;
pub mod filter;
pub mod observer;
pub mod operation;
pub mod value;
pub mod wrap;

pub use context::{CancelHandle, Context};
pub use driver::{
    Capability, Conn, ConnBeginTx, ConnExec, ConnPing, ConnPrepare, ConnQuery, Driver, ExecResult,
    Rows, Stmt, StmtExec, StmtQuery, Tx,
};
pub use error::{BoxError, ConfigError, DriverError};
pub use filter::{FilterConfig, FilterMode, OperationFilter};
pub use observer::{Handle, NullHandle, Observer, ObserverChain, OperationGuard, NULL_HANDLE};
pub use operation::{OperationKind, EMPTY_STATEMENT};
pub use value::{IsolationLevel, NamedValue, TxOptions, Value};
pub use wrap::{wrap_driver, WrappedDriver};
