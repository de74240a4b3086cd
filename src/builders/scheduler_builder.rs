//! Build queues and schedulers from configuration.

use std::sync::Arc;

use crate::config::{QueueConfig, SchedulerConfig};
use crate::core::{BoundedBlockingQueue, FailureSink, QueueError, SchedulerError, TimerScheduler, TracingFailureSink};

/// Build an empty queue from configuration.
///
/// # Errors
///
/// Returns `QueueError::InvalidCapacity` for a zero capacity.
pub fn build_queue<T>(cfg: &QueueConfig) -> Result<BoundedBlockingQueue<T>, QueueError> {
    BoundedBlockingQueue::new(cfg.capacity)
}

/// Assembles a [`TimerScheduler`] from a config and a failure sink.
///
/// ```
/// use parking_timer::builders::SchedulerBuilder;
///
/// let scheduler = SchedulerBuilder::new()
///     .thread_name("billing-timer")
///     .build()?;
/// scheduler.shutdown();
/// # Ok::<(), parking_timer::core::SchedulerError>(())
/// ```
pub struct SchedulerBuilder {
    config: SchedulerConfig,
    failures: Arc<dyn FailureSink>,
}

impl Default for SchedulerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulerBuilder {
    /// Builder with default config and a `tracing` failure sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::default(),
            failures: Arc::new(TracingFailureSink),
        }
    }

    /// Replace the whole config.
    #[must_use]
    pub fn config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Name the worker thread.
    #[must_use]
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.config = self.config.with_thread_name(name);
        self
    }

    /// Set the worker stack size.
    #[must_use]
    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.config = self.config.with_stack_size(bytes);
        self
    }

    /// Send task failures to `sink`.
    #[must_use]
    pub fn failure_sink(mut self, sink: Arc<dyn FailureSink>) -> Self {
        self.failures = sink;
        self
    }

    /// Validate the config and start the scheduler.
    ///
    /// # Errors
    ///
    /// `SchedulerError::InvalidConfig` or `SchedulerError::Spawn`.
    pub fn build(self) -> Result<TimerScheduler, SchedulerError> {
        TimerScheduler::with_config(self.config, self.failures)
    }
}
