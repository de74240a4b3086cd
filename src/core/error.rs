//! Error types for queue and scheduler operations.

use std::fmt;

use thiserror::Error;

use crate::core::task::TaskId;

/// Errors produced by `BoundedBlockingQueue` operations that do not hand a value back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// Capacity must be greater than zero.
    #[error("invalid capacity: {0} (must be greater than 0)")]
    InvalidCapacity(usize),
    /// The queue was closed and has no elements left.
    #[error("queue closed")]
    Closed,
    /// A non-blocking take found no element.
    #[error("queue empty")]
    Empty,
    /// A bounded wait elapsed before the operation could proceed.
    #[error("operation timed out")]
    Timeout,
    /// The async runtime cancelled the wait before it could run.
    #[error("wait cancelled by the runtime")]
    Cancelled,
}

/// Returned by a blocking `put` when the queue is closed; carries the rejected value.
#[derive(PartialEq, Eq)]
pub struct PutError<T>(pub T);

impl<T> PutError<T> {
    /// Recover the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for PutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PutError { .. }")
    }
}

impl<T> fmt::Display for PutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "put on a closed queue")
    }
}

impl<T> std::error::Error for PutError<T> {}

/// Returned by `try_put` and `put_timeout`; carries the rejected value.
#[derive(PartialEq, Eq)]
pub enum TryPutError<T> {
    /// The queue is at capacity.
    Full(T),
    /// The queue stayed full until the timeout elapsed.
    Timeout(T),
    /// The queue is closed.
    Closed(T),
}

impl<T> TryPutError<T> {
    /// Recover the value that could not be inserted.
    pub fn into_inner(self) -> T {
        match self {
            Self::Full(v) | Self::Timeout(v) | Self::Closed(v) => v,
        }
    }

    /// Whether the failure was caused by closure rather than a full queue.
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed(_))
    }
}

impl<T> fmt::Debug for TryPutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full(_) => f.write_str("Full(..)"),
            Self::Timeout(_) => f.write_str("Timeout(..)"),
            Self::Closed(_) => f.write_str("Closed(..)"),
        }
    }
}

impl<T> fmt::Display for TryPutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full(_) => write!(f, "queue full"),
            Self::Timeout(_) => write!(f, "operation timed out"),
            Self::Closed(_) => write!(f, "queue closed"),
        }
    }
}

impl<T> std::error::Error for TryPutError<T> {}

impl<T> From<PutError<T>> for TryPutError<T> {
    fn from(err: PutError<T>) -> Self {
        Self::Closed(err.0)
    }
}

/// Errors produced by the timer scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// The scheduler has been shut down and accepts no more tasks.
    #[error("scheduler has been shut down")]
    Shutdown,
    /// The worker thread could not be started.
    #[error("failed to spawn scheduler worker: {0}")]
    Spawn(String),
    /// Configuration validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Why a scheduled action did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The action panicked; holds the panic message when it was a string.
    Panicked(String),
    /// The action returned an error.
    Failed(String),
}

/// A scheduled action that panicked or returned an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("task {task_id} failed: {kind}")]
pub struct TaskFailure {
    /// Identifier returned when the task was scheduled.
    pub task_id: TaskId,
    /// What went wrong.
    pub kind: FailureKind,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Panicked(msg) => write!(f, "panicked: {msg}"),
            Self::Failed(msg) => write!(f, "error: {msg}"),
        }
    }
}

/// Result type for scheduled actions and application-level callers.
pub type AppResult<T> = Result<T, anyhow::Error>;
