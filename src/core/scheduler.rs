//! Single-worker timer scheduler driven by a min-heap of fire times.
//!
//! One dedicated OS thread owns execution. It sleeps on a `Condvar`, either
//! indefinitely when nothing is pending or until the soonest fire time, and every
//! `schedule` call wakes it so an earlier task shortens the current wait.
//!
//! # Design Principles
//!
//! - **No polling**: the worker only wakes on notification or on the head's deadline
//! - **Actions run unlocked**: a slow action never blocks `schedule` callers
//! - **Isolated failures**: panics and errors go to a `FailureSink`, the worker lives on
//!
//! # Example
//!
//! ```
//! use parking_timer::core::TimerScheduler;
//! use std::sync::mpsc;
//! use std::time::Duration;
//!
//! let scheduler = TimerScheduler::new()?;
//! let (tx, rx) = mpsc::channel();
//! scheduler.schedule(Duration::from_millis(10), move || tx.send("fired").unwrap())?;
//!
//! assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), "fired");
//! scheduler.shutdown();
//! # Ok::<(), parking_timer::core::SchedulerError>(())
//! ```

use std::collections::BinaryHeap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};

use crate::config::SchedulerConfig;
use crate::core::error::{AppResult, SchedulerError};
use crate::core::failure::{self, FailureSink, TracingFailureSink};
use crate::core::stats::{SchedulerCounters, SchedulerStats};
use crate::core::task::{Action, ScheduledTask, TaskId};
use crate::util::clock::{delay_from_millis, fire_time, remaining};
use crate::{Condvar, Mutex};

/// Heap and lifecycle flag, guarded by the scheduler mutex.
struct State {
    pending: BinaryHeap<ScheduledTask>,
    next_id: TaskId,
    shutdown: bool,
}

/// State shared between the scheduler handle and its worker thread.
struct Shared {
    state: Mutex<State>,
    wakeup: Condvar,
    counters: SchedulerCounters,
    failures: Arc<dyn FailureSink>,
}

/// Runs deferred one-shot actions on a single dedicated worker thread.
///
/// Tasks fire in non-decreasing fire-time order; tasks with equal fire times fire
/// in the order they were scheduled. A task never runs before its fire time.
pub struct TimerScheduler {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
    thread_name: String,
}

impl TimerScheduler {
    /// Start a scheduler with the default config, logging failures via `tracing`.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::Spawn` if the worker thread cannot be started.
    pub fn new() -> Result<Self, SchedulerError> {
        Self::with_config(SchedulerConfig::default(), Arc::new(TracingFailureSink))
    }

    /// Start a scheduler with an explicit config and failure sink.
    ///
    /// # Errors
    ///
    /// - `SchedulerError::InvalidConfig` if the config fails validation
    /// - `SchedulerError::Spawn` if the worker thread cannot be started
    pub fn with_config(
        config: SchedulerConfig,
        failures: Arc<dyn FailureSink>,
    ) -> Result<Self, SchedulerError> {
        config.validate().map_err(SchedulerError::InvalidConfig)?;

        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                pending: BinaryHeap::new(),
                next_id: 0,
                shutdown: false,
            }),
            wakeup: Condvar::new(),
            counters: SchedulerCounters::default(),
            failures,
        });

        let mut builder = thread::Builder::new().name(config.thread_name.clone());
        if let Some(stack_size) = config.stack_size {
            builder = builder.stack_size(stack_size);
        }
        let worker_shared = Arc::clone(&shared);
        let handle = builder
            .spawn(move || worker_loop(&worker_shared))
            .map_err(|e| SchedulerError::Spawn(e.to_string()))?;

        info!(thread = %config.thread_name, "timer scheduler started");

        Ok(Self {
            shared,
            worker: Mutex::new(Some(handle)),
            thread_name: config.thread_name,
        })
    }

    /// Run `action` once, `delay` from now. Returns immediately.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::Shutdown` after [`shutdown`](Self::shutdown).
    pub fn schedule<F>(&self, delay: Duration, action: F) -> Result<TaskId, SchedulerError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.schedule_fallible(delay, move || {
            action();
            Ok(())
        })
    }

    /// Run `action` once, `delay_ms` milliseconds from now.
    ///
    /// Zero or negative delays mean "as soon as possible".
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::Shutdown` after [`shutdown`](Self::shutdown).
    pub fn schedule_millis<F>(&self, delay_ms: i64, action: F) -> Result<TaskId, SchedulerError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.schedule(delay_from_millis(delay_ms), action)
    }

    /// Like [`schedule`](Self::schedule), for actions that can fail.
    ///
    /// An `Err` returned by the action is reported to the failure sink.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::Shutdown` after [`shutdown`](Self::shutdown).
    pub fn schedule_fallible<F>(&self, delay: Duration, action: F) -> Result<TaskId, SchedulerError>
    where
        F: FnOnce() -> AppResult<()> + Send + 'static,
    {
        let fire_at = fire_time(Instant::now(), delay);
        self.enqueue(fire_at, Box::new(action))
    }

    /// Run `action` once at the absolute instant `at`. Past instants fire at once.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::Shutdown` after [`shutdown`](Self::shutdown).
    pub fn schedule_at<F>(&self, at: Instant, action: F) -> Result<TaskId, SchedulerError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.enqueue(
            at,
            Box::new(move || {
                action();
                Ok(())
            }),
        )
    }

    /// Remove a task that has not fired yet.
    ///
    /// Returns `false` if the task already fired, was already cancelled, or was
    /// never scheduled here.
    pub fn cancel(&self, id: TaskId) -> bool {
        let cancelled: Vec<ScheduledTask> = {
            let mut state = self.shared.state.lock();
            if !state.pending.iter().any(|task| task.id == id) {
                return false;
            }
            let (cancelled, keep): (Vec<ScheduledTask>, Vec<ScheduledTask>) = std::mem::take(&mut state.pending)
                .into_vec()
                .into_iter()
                .partition(|task| task.id == id);
            state.pending = BinaryHeap::from(keep);
            cancelled
        };

        // Dropped outside the lock: a closure's destructor may call back into us.
        let removed = !cancelled.is_empty();
        drop(cancelled);
        if removed {
            SchedulerCounters::bump(&self.shared.counters.cancelled, 1);
            // The head may have changed; let the worker recompute its wait.
            self.shared.wakeup.notify_one();
            debug!(task_id = id, "scheduled task cancelled");
        }
        removed
    }

    /// Number of tasks waiting to fire.
    pub fn pending_len(&self) -> usize {
        self.shared.state.lock().pending.len()
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_shutdown(&self) -> bool {
        self.shared.state.lock().shutdown
    }

    /// Current statistics.
    pub fn stats(&self) -> SchedulerStats {
        let pending = self.pending_len();
        self.shared.counters.snapshot(pending)
    }

    /// Stop the worker and discard unfired tasks. Returns how many were discarded.
    ///
    /// Waits for a currently running action to finish. Safe to call more than once
    /// and from inside an action (the worker is then left to exit on its own).
    pub fn shutdown(&self) -> usize {
        let discarded = signal_shutdown(&self.shared);

        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            if handle.thread().id() == thread::current().id() {
                debug!("shutdown requested from the worker thread; not joining");
            } else if handle.join().is_err() {
                warn!(thread = %self.thread_name, "timer worker panicked");
            }
            info!(discarded, "timer scheduler shut down");
        }
        discarded
    }

    fn enqueue(&self, fire_at: Instant, action: Action) -> Result<TaskId, SchedulerError> {
        let id = {
            let mut state = self.shared.state.lock();
            if state.shutdown {
                return Err(SchedulerError::Shutdown);
            }
            let id = state.next_id;
            state.next_id += 1;
            state.pending.push(ScheduledTask::new(id, fire_at, action));
            id
        };

        SchedulerCounters::bump(&self.shared.counters.scheduled, 1);
        // Always signal: the new task may be due before the one the worker waits on.
        self.shared.wakeup.notify_one();
        trace!(
            task_id = id,
            delay_ms = remaining(fire_at, Instant::now()).as_millis(),
            "task scheduled"
        );
        Ok(id)
    }
}

impl Drop for TimerScheduler {
    fn drop(&mut self) {
        // Signal only; joining here could hang on a long-running action.
        // Call shutdown() for a graceful stop.
        let already_stopped = self.shared.state.lock().shutdown;
        if !already_stopped {
            let discarded = signal_shutdown(&self.shared);
            debug!(discarded, "TimerScheduler dropped without explicit shutdown - worker will be detached");
        }
    }
}

impl fmt::Debug for TimerScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("TimerScheduler")
            .field("thread_name", &self.thread_name)
            .field("pending", &state.pending.len())
            .field("shutdown", &state.shutdown)
            .finish()
    }
}

/// Mark the scheduler shut down, wake the worker and drop pending tasks.
fn signal_shutdown(shared: &Shared) -> usize {
    let dropped = {
        let mut state = shared.state.lock();
        if state.shutdown {
            return 0;
        }
        state.shutdown = true;
        std::mem::take(&mut state.pending)
    };
    shared.wakeup.notify_all();

    // Dropped outside the lock: a closure's destructor may call back into us.
    let discarded = dropped.len();
    drop(dropped);
    SchedulerCounters::bump(&shared.counters.discarded, discarded as u64);
    discarded
}

fn worker_loop(shared: &Shared) {
    debug!("timer worker started");
    while let Some(task) = next_due_task(shared) {
        execute(shared, task);
    }
    debug!("timer worker exiting");
}

/// What the worker should do next, decided from the state at one instant.
enum Step {
    /// Shutdown was requested.
    Stop,
    /// Nothing is due: sleep until notified, or until the deadline if one is set.
    Wait(Option<Instant>),
    /// This task is due and has been removed from the heap.
    Run(ScheduledTask),
}

/// Pop the soonest task and hand it out only if it is due at `now`.
///
/// A task that is not due yet goes straight back into the heap, and its fire
/// time becomes the wait deadline. Nothing is ever handed out early.
fn poll_due(state: &mut State, now: Instant) -> Step {
    if state.shutdown {
        return Step::Stop;
    }
    let Some(task) = state.pending.pop() else {
        return Step::Wait(None);
    };
    if task.is_due(now) {
        return Step::Run(task);
    }
    let deadline = task.fire_at;
    state.pending.push(task);
    Step::Wait(Some(deadline))
}

/// Block until the soonest task is due and return it, or `None` on shutdown.
fn next_due_task(shared: &Shared) -> Option<ScheduledTask> {
    let mut state = shared.state.lock();
    loop {
        let now = Instant::now();
        match poll_due(&mut state, now) {
            Step::Stop => return None,
            Step::Run(task) => return Some(task),
            Step::Wait(None) => {
                trace!("no pending tasks; waiting for schedule");
                shared.wakeup.wait(&mut state);
            }
            Step::Wait(Some(deadline)) => {
                trace!(wait_ms = remaining(deadline, now).as_millis(), "waiting for next task");
                // Woken by timeout or by a new/cancelled task: re-read the head either way.
                shared.wakeup.wait_until(&mut state, deadline);
            }
        }
    }
}

/// Run one task with the scheduler lock released, containing any failure.
fn execute(shared: &Shared, task: ScheduledTask) {
    let task_id = task.id;
    let late_by = Instant::now().saturating_duration_since(task.fire_at);
    debug!(task_id, late_ms = late_by.as_millis(), "executing scheduled task");

    let outcome = panic::catch_unwind(AssertUnwindSafe(move || task.run()));
    let failure = match outcome {
        Ok(Ok(())) => {
            SchedulerCounters::bump(&shared.counters.executed, 1);
            return;
        }
        Ok(Err(err)) => failure::failed(task_id, &err),
        Err(payload) => failure::panicked(task_id, payload.as_ref()),
    };

    SchedulerCounters::bump(&shared.counters.failed, 1);
    let sink = &shared.failures;
    if panic::catch_unwind(AssertUnwindSafe(|| sink.report(failure))).is_err() {
        warn!(task_id, "failure sink panicked while reporting");
    }
}
