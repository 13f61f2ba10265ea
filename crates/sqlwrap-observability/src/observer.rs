//! An observer that logs every operation through `tracing`.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use sqlwrap_core::{Context, DriverError, Handle, Observer, OperationKind};

/// Configuration for [`TracingObserver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracingObserverConfig {
    /// Include statement text in events. Off by default: statements may
    /// carry sensitive literals.
    #[serde(default)]
    pub log_queries: bool,
    /// Successful operations slower than this are logged at `warn`.
    #[serde(default = "default_slow_threshold_ms")]
    pub slow_threshold_ms: Option<u64>,
}

fn default_slow_threshold_ms() -> Option<u64> {
    Some(500)
}

impl Default for TracingObserverConfig {
    fn default() -> Self {
        Self {
            log_queries: false,
            slow_threshold_ms: default_slow_threshold_ms(),
        }
    }
}

/// Logs operation outcome and latency.
#[derive(Debug, Clone, Default)]
pub struct TracingObserver {
    config: TracingObserverConfig,
}

impl TracingObserver {
    pub fn new(config: TracingObserverConfig) -> Self {
        Self { config }
    }
}

impl Observer for TracingObserver {
    fn start(&self, ctx: Context, kind: OperationKind, query: &str) -> (Box<dyn Handle>, Context) {
        let handle = TracingHandle {
            kind,
            query: self.config.log_queries.then(|| query.to_string()),
            slow_threshold: self.config.slow_threshold_ms.map(Duration::from_millis),
            started: Instant::now(),
        };
        (Box::new(handle), ctx)
    }
}

struct TracingHandle {
    kind: OperationKind,
    query: Option<String>,
    slow_threshold: Option<Duration>,
    started: Instant,
}

impl Handle for TracingHandle {
    fn finish(self: Box<Self>, err: Option<&DriverError>) {
        let elapsed = self.started.elapsed();
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        let query = self.query.as_deref().unwrap_or_default();

        match err {
            None if self.slow_threshold.is_some_and(|t| elapsed >= t) => {
                tracing::warn!(operation = %self.kind, query, elapsed_ms, "slow operation");
            }
            None => {
                tracing::debug!(operation = %self.kind, query, elapsed_ms, "operation finished");
            }
            Some(e) if e.is_end_of_rows() => {
                tracing::trace!(operation = %self.kind, elapsed_ms, "rows exhausted");
            }
            Some(e) => {
                tracing::warn!(operation = %self.kind, query, elapsed_ms, error = %e, "operation failed");
            }
        }
    }
}
