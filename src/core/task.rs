//! Scheduled task representation and heap ordering.

use std::cmp::Ordering;
use std::fmt;
use std::time::Instant;

use crate::core::error::AppResult;

/// Identifier assigned to each scheduled task, unique per scheduler.
pub type TaskId = u64;

/// Boxed one-shot action executed by the scheduler worker.
pub type Action = Box<dyn FnOnce() -> AppResult<()> + Send + 'static>;

/// A deferred action and the instant it becomes eligible to run.
pub struct ScheduledTask {
    /// Identifier handed back to the caller of `schedule`.
    pub id: TaskId,
    /// Absolute fire time on the monotonic clock.
    pub fire_at: Instant,
    action: Action,
}

impl ScheduledTask {
    /// Create a task from an already boxed action.
    pub fn new(id: TaskId, fire_at: Instant, action: Action) -> Self {
        Self { id, fire_at, action }
    }

    /// Whether the task may run at `now`.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        self.fire_at <= now
    }

    /// Consume the task and run its action.
    ///
    /// # Errors
    ///
    /// Returns whatever error the action itself returned.
    pub fn run(self) -> AppResult<()> {
        (self.action)()
    }
}

impl fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledTask")
            .field("id", &self.id)
            .field("fire_at", &self.fire_at)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ScheduledTask {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTask {
    /// Reversed so that `BinaryHeap` (a max-heap) pops the soonest task first.
    /// Equal fire times pop in scheduling order.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at
            .cmp(&self.fire_at)
            .then_with(|| other.id.cmp(&self.id))
    }
}
