//! Condition variable used by the blocking queue and the timer scheduler.
//!
//! A thin wrapper over `parking_lot::Condvar` exposing the untimed and timed waits
//! the crate builds on. Callers are expected to wrap every wait in a loop that
//! re-checks the guarded predicate.

use std::time::Instant;

use crate::MutexGuard;

pub use parking_lot::WaitTimeoutResult;

/// A condition variable.
///
/// Condition variables represent the ability to block a thread such that
/// it consumes no CPU time while waiting for an event to occur. Unlike
/// `std::sync::Condvar`, this type does not implement poisoning.
///
/// # Examples
///
/// ```
/// use parking_timer::{Condvar, Mutex};
/// use std::sync::Arc;
/// use std::thread;
///
/// let pair = Arc::new((Mutex::new(false), Condvar::new()));
/// let pair2 = Arc::clone(&pair);
///
/// thread::spawn(move || {
///     let (lock, cvar) = &*pair2;
///     *lock.lock() = true;
///     cvar.notify_one();
/// });
///
/// let (lock, cvar) = &*pair;
/// let mut started = lock.lock();
/// while !*started {
///     cvar.wait(&mut started);
/// }
/// ```
#[derive(Debug, Default)]
pub struct Condvar {
    inner: parking_lot::Condvar,
}

impl Condvar {
    /// Creates a new condition variable.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: parking_lot::Condvar::new(),
        }
    }

    /// Blocks the current thread until this condition variable receives a notification.
    ///
    /// The mutex behind `guard` is released while blocked and re-acquired before
    /// returning. Spurious wakeups are possible.
    #[inline]
    pub fn wait<T>(&self, guard: &mut MutexGuard<'_, T>) {
        self.inner.wait(guard);
    }

    /// Blocks until notified or until `deadline` is reached.
    ///
    /// # Examples
    ///
    /// ```
    /// use parking_timer::{Condvar, Mutex};
    /// use std::time::{Duration, Instant};
    ///
    /// let lock = Mutex::new(());
    /// let cvar = Condvar::new();
    /// let mut guard = lock.lock();
    /// let result = cvar.wait_until(&mut guard, Instant::now() + Duration::from_millis(5));
    /// assert!(result.timed_out());
    /// ```
    #[inline]
    pub fn wait_until<T>(&self, guard: &mut MutexGuard<'_, T>, deadline: Instant) -> WaitTimeoutResult {
        self.inner.wait_until(guard, deadline)
    }

    /// Wakes up one blocked thread. Returns whether a thread was woken.
    ///
    /// Calls to `notify_one` are not buffered in any way.
    #[inline]
    #[allow(clippy::must_use_candidate)]
    pub fn notify_one(&self) -> bool {
        self.inner.notify_one()
    }

    /// Wakes up all blocked threads. Returns the number of threads woken.
    #[inline]
    #[allow(clippy::must_use_candidate)]
    pub fn notify_all(&self) -> usize {
        self.inner.notify_all()
    }
}
