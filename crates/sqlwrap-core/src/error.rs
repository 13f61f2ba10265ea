//! Error types crossing the driver boundary.

use thiserror::Error;

use crate::driver::Capability;

/// Boxed error produced by an underlying driver implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by drivers and by the decorating wrappers.
///
/// Wrappers never construct [`DriverError::Driver`] or
/// [`DriverError::EndOfRows`] themselves: those come from the wrapped driver
/// and are handed back to the caller as the very same value.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The wrapped object does not implement the capability the call needs.
    #[error("unsupported driver: {capability} is not implemented")]
    CapabilityUnsupported { capability: Capability },

    /// A non-context method was called on a wrapper; only the context
    /// variants are instrumented.
    #[error("unsupported method {method}: use the context variant")]
    MethodUnsupported { method: &'static str },

    /// Row iteration is exhausted.
    #[error("no more rows")]
    EndOfRows,

    /// The call was abandoned (future dropped or panicked) before the
    /// underlying driver returned. Only ever delivered to observers.
    #[error("operation interrupted before completion")]
    Interrupted,

    /// Error raised by the underlying driver.
    #[error("{0}")]
    Driver(#[source] BoxError),

    /// An unexpected error.
    #[error("{0}")]
    Other(String),
}

impl DriverError {
    /// Wrap an arbitrary driver-side error.
    pub fn driver(err: impl Into<BoxError>) -> Self {
        Self::Driver(err.into())
    }

    /// Returns `true` for either of the two "unsupported" sentinels.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Self::CapabilityUnsupported { .. } | Self::MethodUnsupported { .. }
        )
    }

    /// Returns `true` if this is the end-of-rows sentinel.
    pub fn is_end_of_rows(&self) -> bool {
        matches!(self, Self::EndOfRows)
    }
}

/// Errors raised while loading filter configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid filter config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),
}
