//! Recoverable error types.
//!
//! Contract violations (pushing into a closed queue, a zero-capacity queue)
//! panic instead; these types cover the conditions a caller is expected to
//! handle.

use core::fmt;
use thiserror::Error;

/// Errors reported by `LinkedList` operations that take a node handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ListError {
    /// The handle refers to a node that has been removed from the list.
    #[error("node handle does not refer to a live node in this list")]
    StaleHandle,
}

/// Error returned by `BoundedQueue::try_push`. The rejected item is handed
/// back to the caller.
#[derive(Clone, Copy, PartialEq, Eq, Error)]
pub enum TryPushError<T> {
    #[error("queue is full")]
    Full(T),
    #[error("queue is closed")]
    Closed(T),
}

impl<T> TryPushError<T> {
    /// Recover the item that could not be pushed.
    pub fn into_inner(self) -> T {
        match self {
            TryPushError::Full(t) | TryPushError::Closed(t) => t,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, TryPushError::Closed(_))
    }
}

// Manual impl so `T` need not be `Debug`.
impl<T> fmt::Debug for TryPushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryPushError::Full(_) => f.write_str("Full(..)"),
            TryPushError::Closed(_) => f.write_str("Closed(..)"),
        }
    }
}

/// Error returned by `BoundedQueue::try_pop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TryPopError {
    /// Nothing buffered right now, but the queue is still open.
    #[error("queue is empty")]
    Empty,
    /// Nothing buffered and the queue is closed: no more data will arrive.
    #[error("queue is closed and drained")]
    Closed,
}
