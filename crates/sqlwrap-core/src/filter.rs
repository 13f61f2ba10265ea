//! Operation filters: observer decorators that silence selected kinds.
//!
//! ```text
//! start(kind) → [allowed?] ─yes→ next.start(...)
//!                          └─no─→ NullHandle, ctx unchanged
//! ```
//!
//! A denied kind never reaches the wrapped observer, not even its `start`.
//! Filters are observers themselves, so they can wrap other filters.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::error::ConfigError;
use crate::observer::{Handle, Observer, NULL_HANDLE};
use crate::operation::OperationKind;

/// Observer decorator that passes through only allowed operation kinds.
pub struct OperationFilter {
    allowed: [bool; OperationKind::COUNT],
    next: Arc<dyn Observer>,
}

impl OperationFilter {
    /// Pass everything through except `ops`.
    pub fn mask(next: impl Observer + 'static, ops: &[OperationKind]) -> Self {
        let mut allowed = [true; OperationKind::COUNT];
        for op in ops {
            allowed[op.index()] = false;
        }
        Self {
            allowed,
            next: Arc::new(next),
        }
    }

    /// Observe every kind in the vocabulary that is not listed in `ops`.
    /// Equivalent to [`OperationFilter::mask`].
    pub fn exclude(next: impl Observer + 'static, ops: &[OperationKind]) -> Self {
        let allowed = OperationKind::ALL.map(|kind| !ops.contains(&kind));
        Self {
            allowed,
            next: Arc::new(next),
        }
    }

    /// Observe only the kinds listed in `ops`.
    pub fn include(next: impl Observer + 'static, ops: &[OperationKind]) -> Self {
        let mut allowed = [false; OperationKind::COUNT];
        for op in ops {
            allowed[op.index()] = true;
        }
        Self {
            allowed,
            next: Arc::new(next),
        }
    }

    /// Returns `true` if `kind` reaches the wrapped observer.
    pub fn allows(&self, kind: OperationKind) -> bool {
        self.allowed[kind.index()]
    }

    /// The kinds that reach the wrapped observer, in vocabulary order.
    pub fn allowed_kinds(&self) -> Vec<OperationKind> {
        OperationKind::ALL
            .into_iter()
            .filter(|k| self.allows(*k))
            .collect()
    }
}

impl Observer for OperationFilter {
    fn start(&self, ctx: Context, kind: OperationKind, query: &str) -> (Box<dyn Handle>, Context) {
        if !self.allows(kind) {
            return (Box::new(NULL_HANDLE), ctx);
        }
        self.next.start(ctx, kind, query)
    }
}

impl std::fmt::Debug for OperationFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationFilter")
            .field("allowed", &self.allowed_kinds())
            .finish()
    }
}

/// How a [`FilterConfig`] interprets its operation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Observe everything except the listed operations.
    #[default]
    Exclude,
    /// Same as `Exclude`.
    Mask,
    /// Observe only the listed operations.
    Include,
}

/// Declarative filter configuration.
///
/// ```json
/// { "mode": "exclude", "operations": ["Next", "Stmt.Close"] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub mode: FilterMode,
    #[serde(default)]
    pub operations: Vec<OperationKind>,
}

impl FilterConfig {
    /// Parse a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a filter around `next`.
    pub fn build(&self, next: impl Observer + 'static) -> OperationFilter {
        match self.mode {
            FilterMode::Exclude => OperationFilter::exclude(next, &self.operations),
            FilterMode::Mask => OperationFilter::mask(next, &self.operations),
            FilterMode::Include => OperationFilter::include(next, &self.operations),
        }
    }
}
