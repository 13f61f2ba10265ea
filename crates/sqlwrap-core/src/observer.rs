//! The observer protocol: `start` before a driver call, `finish` after it.

use std::sync::Arc;

use crate::context::Context;
use crate::error::DriverError;
use crate::operation::OperationKind;

/// Reacts to the start of an observed driver call.
///
/// `start` runs inline on the calling task, before the real driver call, and
/// must not block indefinitely. It may derive a new context from `ctx`; the
/// returned context is what the next observer in the chain (and finally the
/// driver) receives. Returning `ctx` unchanged is fine.
///
/// # Thread Safety
/// One observer instance serves every call made through a wrapped driver,
/// concurrently if the caller is concurrent. The wrappers add no locking.
pub trait Observer: Send + Sync {
    fn start(&self, ctx: Context, kind: OperationKind, query: &str) -> (Box<dyn Handle>, Context);
}

impl<T: Observer + ?Sized> Observer for Arc<T> {
    fn start(&self, ctx: Context, kind: OperationKind, query: &str) -> (Box<dyn Handle>, Context) {
        (**self).start(ctx, kind, query)
    }
}

impl<T: Observer + ?Sized> Observer for Box<T> {
    fn start(&self, ctx: Context, kind: OperationKind, query: &str) -> (Box<dyn Handle>, Context) {
        (**self).start(ctx, kind, query)
    }
}

/// The completion half of one observed call.
///
/// `finish` consumes the handle, so it runs exactly once. `err` is `None`
/// on success and otherwise borrows the error the caller is about to get.
pub trait Handle: Send {
    fn finish(self: Box<Self>, err: Option<&DriverError>);
}

/// Handle whose `finish` does nothing. Zero-sized, so boxing it is free.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHandle;

/// The shared no-op handle.
pub const NULL_HANDLE: NullHandle = NullHandle;

impl Handle for NullHandle {
    fn finish(self: Box<Self>, _err: Option<&DriverError>) {}
}

/// Every handle started for one call, positionally matching the chain.
///
/// Finishing runs the handles in reverse chain order, so the first observer
/// to start is the last to finish. If the guard is dropped unfinished (the
/// call's future was dropped or the driver panicked) the remaining handles
/// are finished with [`DriverError::Interrupted`].
///
/// The same applies if a handle's own `finish` panics: handles that had not
/// been finished yet are finished with `Interrupted` during unwinding, not
/// with the call's real outcome.
#[must_use = "an operation guard must be finished with the call's outcome"]
pub struct OperationGuard {
    kind: OperationKind,
    handles: Vec<Box<dyn Handle>>,
}

impl OperationGuard {
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Finish every handle with the call's error (`None` on success).
    pub fn finish(mut self, err: Option<&DriverError>) {
        self.finish_all(err);
    }

    /// Finish every handle with the error carried by `result`, if any.
    pub fn finish_with<T>(self, result: &Result<T, DriverError>) {
        self.finish(result.as_ref().err());
    }

    fn finish_all(&mut self, err: Option<&DriverError>) {
        while let Some(handle) = self.handles.pop() {
            handle.finish(err);
        }
    }
}

impl Drop for OperationGuard {
    fn drop(&mut self) {
        if !self.handles.is_empty() {
            tracing::warn!(
                operation = %self.kind,
                pending = self.handles.len(),
                "operation dropped before completion"
            );
            self.finish_all(Some(&DriverError::Interrupted));
        }
    }
}

impl std::fmt::Debug for OperationGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationGuard")
            .field("kind", &self.kind)
            .field("pending", &self.handles.len())
            .finish()
    }
}

/// Ordered, immutable list of observers attached to one wrapped driver.
#[derive(Clone, Default)]
pub struct ObserverChain {
    observers: Arc<[Arc<dyn Observer>]>,
}

impl ObserverChain {
    pub fn new(observers: Vec<Arc<dyn Observer>>) -> Self {
        Self {
            observers: observers.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Call every observer's `start` in chain order, handing each the
    /// context returned by the one before it. Returns the handles and the
    /// context produced by the last observer.
    pub fn start_operation(
        &self,
        mut ctx: Context,
        kind: OperationKind,
        query: &str,
    ) -> (OperationGuard, Context) {
        let mut handles = Vec::with_capacity(self.observers.len());
        for observer in self.observers.iter() {
            let (handle, next) = observer.start(ctx, kind, query);
            handles.push(handle);
            ctx = next;
        }
        (OperationGuard { kind, handles }, ctx)
    }
}

impl std::fmt::Debug for ObserverChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverChain")
            .field("observers", &self.observers.len())
            .finish()
    }
}
