//! # Parking Timer
//!
//! Two classic concurrency structures built from scratch on `parking_lot`'s mutex
//! and condition variable.
//!
//! ## Key Features
//!
//! - **Bounded Blocking Queue**: fixed-capacity ring buffer; `put` applies
//!   backpressure when full, `take` blocks when empty
//! - **Timer Scheduler**: one dedicated worker thread that sleeps exactly until the
//!   soonest task is due and re-plans whenever an earlier task arrives
//! - **No polling**: every wait is a predicate-checked `Condvar` wait
//! - **Failure isolation**: a panicking or failing action is reported, never fatal
//!
//! ## BoundedBlockingQueue - Producer/Consumer Hand-off
//!
//! ```rust
//! use parking_timer::core::BoundedBlockingQueue;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let queue = Arc::new(BoundedBlockingQueue::new(2)?);
//! queue.put(1)?;
//! queue.put(2)?;
//!
//! // Blocks until a slot frees up.
//! let producer = {
//!     let queue = Arc::clone(&queue);
//!     thread::spawn(move || queue.put(3))
//! };
//!
//! assert_eq!(queue.take()?, 1);
//! producer.join().unwrap()?;
//! assert_eq!(queue.take()?, 2);
//! assert_eq!(queue.take()?, 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## TimerScheduler - Deferred One-shot Actions
//!
//! ```rust
//! use parking_timer::core::TimerScheduler;
//! use parking_timer::Mutex;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let scheduler = TimerScheduler::new()?;
//! let log = Arc::new(Mutex::new(Vec::new()));
//!
//! for (label, delay_ms) in [("A", 60), ("B", 90), ("C", 30)] {
//!     let log = Arc::clone(&log);
//!     scheduler.schedule_millis(delay_ms, move || log.lock().push(label))?;
//! }
//!
//! std::thread::sleep(Duration::from_millis(300));
//! scheduler.shutdown();
//! assert_eq!(*log.lock(), vec!["C", "A", "B"]);
//! # Ok::<(), parking_timer::core::SchedulerError>(())
//! ```
//!
//! For complete examples, see:
//! - `tests/blocking_queue_test.rs` - producer/consumer integration tests
//! - `tests/scheduler_test.rs` - ordering, responsiveness and failure isolation

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Builders to construct queues and schedulers from configuration.
pub mod builders;
/// Condition variable wrapper.
pub mod condvar;
/// Configuration models for queues and schedulers.
pub mod config;
/// Blocking queue, timer scheduler, and their error types.
pub mod core;
/// Mutex re-exports.
pub mod mutex;
/// Shared utilities.
pub mod util;

pub use condvar::{Condvar, WaitTimeoutResult};
pub use mutex::{Mutex, MutexGuard};
