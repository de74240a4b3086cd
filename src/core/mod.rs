//! Core queue and scheduler implementations.

pub mod blocking_queue;
pub mod error;
pub mod failure;
pub mod scheduler;
pub mod stats;
pub mod task;

pub use blocking_queue::BoundedBlockingQueue;
pub use error::{AppResult, FailureKind, PutError, QueueError, SchedulerError, TaskFailure, TryPutError};
pub use failure::{FailureSink, InMemoryFailureSink, TracingFailureSink};
pub use scheduler::TimerScheduler;
pub use stats::SchedulerStats;
pub use task::{Action, ScheduledTask, TaskId};
