//! Error types for pkgview core.

use crate::coalescer::HandlerId;

/// The main error type for pkgview core operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Signal-related error.
    #[error("Signal error: {0}")]
    Signal(#[from] SignalError),
    /// Coalescer-related error.
    #[error("Coalescer error: {0}")]
    Coalescer(#[from] CoalescerError),
}

/// Signal-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignalError {
    /// The connection ID is invalid or has already been disconnected.
    #[error("Invalid or disconnected connection ID")]
    InvalidConnection,
}

/// Errors reported by the [`EventCoalescer`](crate::EventCoalescer).
///
/// Both variants describe unbalanced wiring or teardown, which is a defect
/// in the caller rather than a recoverable condition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoalescerError {
    /// `unregister` was called for a handler with no live wiring.
    #[error("Handler {handler:?} has no registered wiring to remove")]
    NotRegistered {
        /// The handler that was passed to `unregister`.
        handler: HandlerId,
    },
    /// Wirings or pending work remain when the coalescer was expected to be empty.
    #[error("{wirings} wiring(s) still registered and {pending} invocation(s) still pending")]
    Leaked {
        /// Number of wirings that were never removed.
        wirings: usize,
        /// Number of pending invocations that were never flushed or cancelled.
        pending: usize,
    },
}

/// A specialized Result type for pkgview core operations.
pub type Result<T> = std::result::Result<T, Error>;
