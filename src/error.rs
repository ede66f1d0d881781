//! Error types for heap operations.
//!
//! - [`HeapError`]: returned when a caller violates an operation's
//!   precondition (empty heap, stale handle, increasing a key, melding
//!   incompatible or consumed heaps). Every failure is detected before any
//!   pointer surgery starts, so the heap is left exactly as it was.
//! - [`InvariantError`]: returned by `validate` when a structural invariant
//!   does not hold.

use std::fmt;

/// Broad classification of a [`HeapError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The arguments to the call are unacceptable (stale handle, larger key,
    /// incompatible comparators, unknown heap).
    InvalidArgument,
    /// The heap has no elements.
    EmptyCollection,
    /// The heap was consumed by an earlier meld and no longer accepts input.
    InvalidState,
}

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeapError {
    /// The heap has no elements
    EmptyHeap,
    /// The new key compares greater than the current key
    KeyIncreased,
    /// The handle is no longer valid (element was extracted, deleted or cleared)
    InvalidHandle,
    /// The two heaps order their keys differently
    IncompatibleComparators,
    /// A heap cannot be melded into itself
    SelfMeld,
    /// The heap was consumed by a previous meld
    HeapConsumed,
    /// The heap id was not issued by this container
    UnknownHeap,
}

impl HeapError {
    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            HeapError::EmptyHeap => ErrorKind::EmptyCollection,
            HeapError::HeapConsumed => ErrorKind::InvalidState,
            HeapError::KeyIncreased
            | HeapError::InvalidHandle
            | HeapError::IncompatibleComparators
            | HeapError::SelfMeld
            | HeapError::UnknownHeap => ErrorKind::InvalidArgument,
        }
    }
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::EmptyHeap => write!(f, "heap is empty"),
            HeapError::KeyIncreased => {
                write!(f, "new key compares greater than the current key")
            }
            HeapError::InvalidHandle => {
                write!(f, "handle is no longer valid (element was removed)")
            }
            HeapError::IncompatibleComparators => {
                write!(f, "cannot meld heaps with different comparators")
            }
            HeapError::SelfMeld => write!(f, "cannot meld a heap into itself"),
            HeapError::HeapConsumed => {
                write!(f, "heap was already consumed by a meld")
            }
            HeapError::UnknownHeap => write!(f, "heap id does not belong to this container"),
        }
    }
}

impl std::error::Error for HeapError {}

/// Error returned when a structural heap invariant is violated.
///
/// Carries a human-readable description of the failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(HeapError::EmptyHeap.kind(), ErrorKind::EmptyCollection);
        assert_eq!(HeapError::HeapConsumed.kind(), ErrorKind::InvalidState);
        assert_eq!(HeapError::KeyIncreased.kind(), ErrorKind::InvalidArgument);
        assert_eq!(HeapError::InvalidHandle.kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            HeapError::IncompatibleComparators.kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(HeapError::EmptyHeap.to_string(), "heap is empty");
        assert!(HeapError::HeapConsumed.to_string().contains("consumed"));
        let err = InvariantError::new("size mismatch");
        assert_eq!(err.to_string(), "size mismatch");
        assert_eq!(err.message(), "size mismatch");
    }
}
