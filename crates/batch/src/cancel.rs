//! Cooperative cancellation.
//!
//! Cancellation is polled, not signal-driven: long-running batch work checks
//! the token at two boundaries only — before admitting a chunk and before
//! fetching a page. An operation that has already been issued always runs to
//! settlement, success or failure; there is no mid-flight abort at this
//! layer.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A shared run-state flag.
///
/// Clones observe the same underlying flag, so the owning "process" side can
/// keep one clone and hand others to the collector and executor.
///
/// # Examples
///
/// ```
/// use snapops_batch::CancelToken;
///
/// let token = CancelToken::new();
/// let watcher = token.clone();
/// assert!(!watcher.is_cancelled());
/// token.cancel();
/// assert!(watcher.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// A fresh, not-yet-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent; already-issued operations still
    /// settle.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Either the outcome of a run, or the marker that cancellation cut it short.
///
/// Cancellation is deliberately not an error: the caller asked for it.
/// Carrying an explicit variant (instead of an empty result) keeps "ran and
/// produced nothing" distinguishable from "never ran".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Run<T> {
    /// The run went to completion.
    Complete(T),
    /// The token was observed cancelled before the run finished; any
    /// partial results are discarded.
    Cancelled,
}

impl<T> Run<T> {
    /// The completed value, if the run was not cancelled.
    pub fn into_complete(self) -> Option<T> {
        match self {
            Self::Complete(value) => Some(value),
            Self::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Map the completed value, carrying cancellation through.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Run<U> {
        match self {
            Self::Complete(value) => Run::Complete(f(value)),
            Self::Cancelled => Run::Cancelled,
        }
    }
}
