//! Failure sinks for scheduled actions.
//!
//! The scheduler worker never dies from a bad task; it hands each failure to a
//! sink and moves on.

use std::any::Any;
use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::error::{FailureKind, TaskFailure};

/// Receives failures reported by the scheduler worker.
pub trait FailureSink: Send + Sync {
    /// Record one failed task.
    fn report(&self, failure: TaskFailure);
}

/// Default sink: logs each failure at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingFailureSink;

impl FailureSink for TracingFailureSink {
    fn report(&self, failure: TaskFailure) {
        tracing::error!(task_id = failure.task_id, reason = %failure.kind, "scheduled task failed");
    }
}

/// In-memory sink for testing and dev. Keeps the most recent failures.
#[derive(Debug, Clone)]
pub struct InMemoryFailureSink {
    failures: Arc<Mutex<VecDeque<TaskFailure>>>,
    max_failures: usize,
}

impl InMemoryFailureSink {
    /// Create a sink that retains at most `max_failures` entries.
    #[must_use]
    pub fn new(max_failures: usize) -> Self {
        Self {
            failures: Arc::new(Mutex::new(VecDeque::with_capacity(max_failures.min(1024)))),
            max_failures,
        }
    }

    /// Snapshot of the recorded failures, oldest first.
    #[must_use]
    pub fn failures(&self) -> Vec<TaskFailure> {
        self.failures.lock().iter().cloned().collect()
    }

    /// Number of failures currently retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.lock().len()
    }

    /// Whether no failure has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.lock().is_empty()
    }
}

impl FailureSink for InMemoryFailureSink {
    fn report(&self, failure: TaskFailure) {
        let mut failures = self.failures.lock();
        if self.max_failures == 0 {
            return;
        }
        if failures.len() >= self.max_failures {
            failures.pop_front();
        }
        failures.push_back(failure);
    }
}

/// Extract a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Build a failure from a caught panic payload.
pub(crate) fn panicked(task_id: u64, payload: &(dyn Any + Send)) -> TaskFailure {
    TaskFailure {
        task_id,
        kind: FailureKind::Panicked(panic_message(payload)),
    }
}

/// Build a failure from an error returned by the action.
pub(crate) fn failed(task_id: u64, err: &anyhow::Error) -> TaskFailure {
    TaskFailure {
        task_id,
        kind: FailureKind::Failed(format!("{err:#}")),
    }
}
