//! Scheduler statistics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Point-in-time view of a scheduler's activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerStats {
    /// Tasks accepted by `schedule`.
    pub scheduled: u64,
    /// Tasks whose action ran to completion.
    pub executed: u64,
    /// Tasks whose action panicked or returned an error.
    pub failed: u64,
    /// Tasks removed by `cancel` before firing.
    pub cancelled: u64,
    /// Tasks dropped unfired by shutdown.
    pub discarded: u64,
    /// Tasks currently waiting to fire.
    pub pending: u64,
}

/// Lock-free counters behind `SchedulerStats`.
#[derive(Debug, Default)]
pub(crate) struct SchedulerCounters {
    pub scheduled: AtomicU64,
    pub executed: AtomicU64,
    pub failed: AtomicU64,
    pub cancelled: AtomicU64,
    pub discarded: AtomicU64,
}

impl SchedulerCounters {
    pub fn snapshot(&self, pending: usize) -> SchedulerStats {
        SchedulerStats {
            scheduled: self.scheduled.load(Ordering::Relaxed),
            executed: self.executed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            pending: pending as u64,
        }
    }

    pub fn bump(counter: &AtomicU64, by: u64) {
        counter.fetch_add(by, Ordering::Relaxed);
    }
}
