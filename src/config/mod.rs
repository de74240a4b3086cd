//! Configuration models for queues and schedulers.

pub mod queue;
pub mod scheduler;

pub use queue::QueueConfig;
pub use scheduler::SchedulerConfig;
