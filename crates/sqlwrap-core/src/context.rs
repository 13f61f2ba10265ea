//! Propagation context threaded through observers and into driver calls.
//!
//! A [`Context`] is an immutable, cheaply clonable chain of entries. Deriving
//! a context (`with_value`, `with_deadline`, `with_cancel`) pushes a new
//! entry in front of the existing ones; the parent is never modified.
//! Deadlines and cancellation are only carried here: nothing in this crate
//! enforces them, that is up to the driver receiving the context.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

enum Entry {
    Value(Arc<dyn Any + Send + Sync>),
    Deadline(Instant),
    Cancel(CancelHandle),
}

struct Node {
    entry: Entry,
    parent: Option<Arc<Node>>,
}

/// Request-scoped values plus deadline and cancellation signalling.
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

impl Context {
    /// The empty root context.
    pub fn background() -> Self {
        Self::default()
    }

    fn push(&self, entry: Entry) -> Self {
        Self {
            head: Some(Arc::new(Node {
                entry,
                parent: self.head.clone(),
            })),
        }
    }

    fn entries(&self) -> impl Iterator<Item = &Entry> {
        std::iter::successors(self.head.as_deref(), |n| n.parent.as_deref()).map(|n| &n.entry)
    }

    /// Derive a context carrying `value`. A later value of the same type
    /// shadows earlier ones.
    pub fn with_value<T: Any + Send + Sync>(&self, value: T) -> Self {
        self.push(Entry::Value(Arc::new(value)))
    }

    /// The most recently attached value of type `T`.
    pub fn value<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.entries().find_map(|e| match e {
            Entry::Value(v) => v.downcast_ref::<T>(),
            _ => None,
        })
    }

    /// Derive a context with a deadline. A derived context can only shorten
    /// the deadline it inherits, never extend it.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        match self.deadline() {
            Some(existing) if existing <= deadline => self.clone(),
            _ => self.push(Entry::Deadline(deadline)),
        }
    }

    /// The earliest deadline in the chain, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.entries()
            .filter_map(|e| match e {
                Entry::Deadline(d) => Some(*d),
                _ => None,
            })
            .min()
    }

    /// Derive a cancellable context and the handle that cancels it.
    pub fn with_cancel(&self) -> (Self, CancelHandle) {
        let handle = CancelHandle::default();
        (self.push(Entry::Cancel(handle.clone())), handle)
    }

    /// Returns `true` if this context or any ancestor has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.entries().any(|e| match e {
            Entry::Cancel(h) => h.is_cancelled(),
            _ => false,
        })
    }

    /// Returns `true` if both values are the same context (not merely equal).
    pub fn same_as(&self, other: &Context) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("entries", &self.entries().count())
            .field("deadline", &self.deadline())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Cancels the context created alongside it by [`Context::with_cancel`].
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
