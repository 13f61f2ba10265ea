//! # sqlwrap-observability
//!
//! Logging for SqlWrap-instrumented drivers.
//!
//! ## Tracing observer
//! [`TracingObserver`] emits one structured event per observed operation:
//! - `debug` on success, `warn` when slower than the configured threshold
//! - `warn` on failure, with the error message
//! - `trace` for the end-of-rows signal, which is not a failure
//!
//! ## Structured logging
//! [`init_tracing`] installs a `tracing-subscriber` with a global level,
//! per-component overrides, and optional JSON output.

pub mod observer;
pub mod tracing_setup;

pub use observer::{TracingObserver, TracingObserverConfig};
pub use tracing_setup::{init_tracing, LogConfig};
