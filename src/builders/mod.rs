//! Builders to construct queues and schedulers from configuration.

pub mod scheduler_builder;

pub use scheduler_builder::{build_queue, SchedulerBuilder};
