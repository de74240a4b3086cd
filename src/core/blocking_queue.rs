//! Fixed-capacity blocking queue built on one mutex and two condition variables.
//!
//! Producers block in [`BoundedBlockingQueue::put`] while the queue is full and
//! consumers block in [`BoundedBlockingQueue::take`] while it is empty. Every wait
//! is a predicate loop, so spurious wakeups and several waiters released by one
//! notification are both harmless.
//!
//! # Example
//!
//! ```
//! use parking_timer::core::BoundedBlockingQueue;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let queue = Arc::new(BoundedBlockingQueue::new(2)?);
//! let producer = {
//!     let queue = Arc::clone(&queue);
//!     thread::spawn(move || {
//!         for i in 0..5 {
//!             queue.put(i).unwrap();
//!         }
//!     })
//! };
//!
//! let received: Vec<i32> = (0..5).map(|_| queue.take().unwrap()).collect();
//! producer.join().unwrap();
//! assert_eq!(received, vec![0, 1, 2, 3, 4]);
//! # Ok::<(), parking_timer::core::QueueError>(())
//! ```

use std::fmt;
#[cfg(feature = "tokio-runtime")]
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(feature = "tokio-runtime")]
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::core::error::{PutError, QueueError, TryPutError};
use crate::util::clock::deadline_after;
use crate::{Condvar, Mutex, MutexGuard};

/// Circular buffer state. Only ever touched while holding the queue mutex.
struct Ring<T> {
    buffer: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    count: usize,
    closed: bool,
}

impl<T> Ring<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: (0..capacity).map(|_| None).collect(),
            head: 0,
            tail: 0,
            count: 0,
            closed: false,
        }
    }

    fn capacity(&self) -> usize {
        self.buffer.len()
    }

    fn is_full(&self) -> bool {
        self.count == self.buffer.len()
    }

    /// Caller must have checked `!is_full()`.
    fn push(&mut self, value: T) {
        debug_assert!(!self.is_full(), "push on a full ring");
        debug_assert!(self.buffer[self.tail].is_none(), "tail slot occupied");
        self.buffer[self.tail] = Some(value);
        self.tail = (self.tail + 1) % self.capacity();
        self.count += 1;
        debug_assert_eq!(self.tail, (self.head + self.count) % self.capacity());
    }

    /// Returns `None` only when the ring is empty.
    fn pop(&mut self) -> Option<T> {
        if self.count == 0 {
            return None;
        }
        let value = self.buffer[self.head].take();
        debug_assert!(value.is_some(), "head slot empty while count > 0");
        self.head = (self.head + 1) % self.capacity();
        self.count -= 1;
        value
    }
}

/// A bounded FIFO queue whose `put` blocks while full and `take` blocks while empty.
///
/// Share it between threads with `Arc`. Elements are delivered in the order their
/// `put` calls acquired the lock.
pub struct BoundedBlockingQueue<T> {
    ring: Mutex<Ring<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
}

impl<T> BoundedBlockingQueue<T> {
    /// Create an empty queue holding at most `capacity` elements.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::InvalidCapacity` when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, QueueError> {
        if capacity == 0 {
            return Err(QueueError::InvalidCapacity(capacity));
        }
        debug!(capacity, "bounded blocking queue created");
        Ok(Self {
            ring: Mutex::new(Ring::with_capacity(capacity)),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
        })
    }

    /// Insert `value` at the tail, blocking while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns the value inside `PutError` if the queue is, or becomes, closed
    /// before room is available. Nothing is ever dropped.
    pub fn put(&self, value: T) -> Result<(), PutError<T>> {
        let mut ring = self.ring.lock();
        while ring.is_full() && !ring.closed {
            self.not_full.wait(&mut ring);
        }
        if ring.closed {
            return Err(PutError(value));
        }
        self.push_and_signal(&mut ring, value);
        Ok(())
    }

    /// Remove and return the head element, blocking while the queue is empty.
    ///
    /// After `close`, remaining elements are still handed out in order.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::Closed` once the queue is closed and drained.
    pub fn take(&self) -> Result<T, QueueError> {
        let mut ring = self.ring.lock();
        while ring.count == 0 && !ring.closed {
            self.not_empty.wait(&mut ring);
        }
        self.pop_and_signal(&mut ring).ok_or(QueueError::Closed)
    }

    /// Insert without blocking.
    ///
    /// # Errors
    ///
    /// `TryPutError::Full` when at capacity, `TryPutError::Closed` when closed.
    pub fn try_put(&self, value: T) -> Result<(), TryPutError<T>> {
        let mut ring = self.ring.lock();
        if ring.closed {
            return Err(TryPutError::Closed(value));
        }
        if ring.is_full() {
            return Err(TryPutError::Full(value));
        }
        self.push_and_signal(&mut ring, value);
        Ok(())
    }

    /// Remove the head element without blocking.
    ///
    /// # Errors
    ///
    /// `QueueError::Empty` when there is nothing to take, `QueueError::Closed`
    /// when closed and drained.
    pub fn try_take(&self) -> Result<T, QueueError> {
        let mut ring = self.ring.lock();
        match self.pop_and_signal(&mut ring) {
            Some(value) => Ok(value),
            None if ring.closed => Err(QueueError::Closed),
            None => Err(QueueError::Empty),
        }
    }

    /// Like [`put`](Self::put), but gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// `TryPutError::Timeout` if the queue stayed full, `TryPutError::Closed` if it
    /// was closed. Both hand the value back.
    pub fn put_timeout(&self, value: T, timeout: Duration) -> Result<(), TryPutError<T>> {
        let Some(deadline) = deadline_after(timeout) else {
            return self.put(value).map_err(TryPutError::from);
        };

        let mut ring = self.ring.lock();
        while ring.is_full() && !ring.closed {
            if Instant::now() >= deadline {
                return Err(TryPutError::Timeout(value));
            }
            self.not_full.wait_until(&mut ring, deadline);
        }
        if ring.closed {
            return Err(TryPutError::Closed(value));
        }
        self.push_and_signal(&mut ring, value);
        Ok(())
    }

    /// Like [`take`](Self::take), but gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// `QueueError::Timeout` if nothing arrived in time, `QueueError::Closed` if the
    /// queue is closed and drained.
    pub fn take_timeout(&self, timeout: Duration) -> Result<T, QueueError> {
        let Some(deadline) = deadline_after(timeout) else {
            return self.take();
        };

        let mut ring = self.ring.lock();
        while ring.count == 0 && !ring.closed {
            if Instant::now() >= deadline {
                return Err(QueueError::Timeout);
            }
            self.not_empty.wait_until(&mut ring, deadline);
        }
        self.pop_and_signal(&mut ring).ok_or(QueueError::Closed)
    }

    /// Close the queue and release every blocked producer and consumer.
    ///
    /// Blocked `put` calls return their value; `take` keeps draining what is left.
    /// Closing twice is a no-op.
    pub fn close(&self) {
        let mut ring = self.ring.lock();
        if ring.closed {
            return;
        }
        ring.closed = true;
        let remaining = ring.count;
        drop(ring);

        let producers = self.not_full.notify_all();
        let consumers = self.not_empty.notify_all();
        debug!(remaining, producers, consumers, "bounded blocking queue closed");
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.ring.lock().closed
    }

    /// Number of elements currently queued.
    pub fn len(&self) -> usize {
        self.ring.lock().count
    }

    /// Whether the queue holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the queue is at capacity.
    pub fn is_full(&self) -> bool {
        self.ring.lock().is_full()
    }

    /// Fixed capacity given at construction.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    fn push_and_signal(&self, ring: &mut MutexGuard<'_, Ring<T>>, value: T) {
        ring.push(value);
        self.not_empty.notify_one();
    }

    fn pop_and_signal(&self, ring: &mut MutexGuard<'_, Ring<T>>) -> Option<T> {
        let value = ring.pop()?;
        self.not_full.notify_one();
        Some(value)
    }
}

#[cfg(feature = "tokio-runtime")]
impl<T: Send + 'static> BoundedBlockingQueue<T> {
    /// Take from async code without blocking the runtime.
    ///
    /// The blocking wait runs on tokio's blocking pool but never removes an
    /// element itself: it only waits until one is available, and the element is
    /// taken inside the future's own poll. Dropping the future (a `timeout`, a
    /// losing `select!` branch, an aborted task) therefore never loses data; the
    /// abandoned wait is released and other consumers are woken.
    ///
    /// Async producers should use [`try_put`](Self::try_put) or `put` inside their
    /// own `spawn_blocking`.
    ///
    /// # Errors
    ///
    /// Same as [`take`](Self::take), plus `QueueError::Cancelled` if the runtime
    /// cancelled the blocking wait while shutting down.
    pub async fn take_async(self: &Arc<Self>) -> Result<T, QueueError> {
        loop {
            match self.try_take() {
                Err(QueueError::Empty) => {}
                taken => return taken,
            }

            let registration = AsyncWait::new(self);
            let queue = Arc::clone(self);
            let abandoned = Arc::clone(&registration.abandoned);
            let waited = tokio::task::spawn_blocking(move || queue.wait_until_ready(&abandoned)).await;
            registration.disarm();

            match waited {
                Ok(()) => {}
                Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
                Err(_) => return Err(QueueError::Cancelled),
            }
        }
    }
}

#[cfg(feature = "tokio-runtime")]
impl<T> BoundedBlockingQueue<T> {
    /// Block until the queue has an element or is closed, without taking anything.
    ///
    /// Also returns once `abandoned` is set by a dropped async waiter.
    fn wait_until_ready(&self, abandoned: &AtomicBool) {
        let mut ring = self.ring.lock();
        while ring.count == 0 && !ring.closed && !abandoned.load(Ordering::Relaxed) {
            self.not_empty.wait(&mut ring);
        }
    }
}

/// Registration of one in-flight `take_async` wait.
///
/// Dropped while still armed (the future was cancelled), it marks the wait as
/// abandoned and wakes every consumer. That releases the blocking-pool thread
/// and passes on any `put` notification the abandoned waiter may have absorbed.
#[cfg(feature = "tokio-runtime")]
struct AsyncWait<T> {
    queue: Arc<BoundedBlockingQueue<T>>,
    abandoned: Arc<AtomicBool>,
    armed: bool,
}

#[cfg(feature = "tokio-runtime")]
impl<T> AsyncWait<T> {
    fn new(queue: &Arc<BoundedBlockingQueue<T>>) -> Self {
        Self {
            queue: Arc::clone(queue),
            abandoned: Arc::new(AtomicBool::new(false)),
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

#[cfg(feature = "tokio-runtime")]
impl<T> Drop for AsyncWait<T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        {
            // Set under the queue lock so the waiter cannot miss it between its
            // predicate check and its wait.
            let _ring = self.queue.ring.lock();
            self.abandoned.store(true, Ordering::Relaxed);
        }
        let woken = self.queue.not_empty.notify_all();
        debug!(woken, "async take abandoned");
    }
}

impl<T> fmt::Debug for BoundedBlockingQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ring = self.ring.lock();
        f.debug_struct("BoundedBlockingQueue")
            .field("capacity", &self.capacity)
            .field("len", &ring.count)
            .field("head", &ring.head)
            .field("tail", &ring.tail)
            .field("closed", &ring.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_zero_capacity_rejected() {
        let result = BoundedBlockingQueue::<u8>::new(0);
        assert_eq!(result.unwrap_err(), QueueError::InvalidCapacity(0));
    }

    #[test]
    fn test_fifo_single_thread() {
        let q = BoundedBlockingQueue::new(4).unwrap();
        for v in ["a", "b", "c", "d"] {
            q.put(v).unwrap();
        }
        assert!(q.is_full());
        let out: Vec<&str> = (0..4).map(|_| q.take().unwrap()).collect();
        assert_eq!(out, vec!["a", "b", "c", "d"]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_indices_wrap_around() {
        let q = BoundedBlockingQueue::new(3).unwrap();
        for round in 0..10 {
            q.put(round * 2).unwrap();
            q.put(round * 2 + 1).unwrap();
            assert_eq!(q.take().unwrap(), round * 2);
            assert_eq!(q.take().unwrap(), round * 2 + 1);
        }
        let ring = q.ring.lock();
        assert_eq!(ring.count, 0);
        assert_eq!(ring.head, ring.tail);
        assert_eq!(ring.head, 20 % 3);
    }

    #[test]
    fn test_try_put_full_returns_value() {
        let q = BoundedBlockingQueue::new(1).unwrap();
        q.try_put(1).unwrap();
        match q.try_put(2) {
            Err(TryPutError::Full(v)) => assert_eq!(v, 2),
            other => panic!("expected Full, got {other:?}"),
        }
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_try_take_empty() {
        let q = BoundedBlockingQueue::<u8>::new(1).unwrap();
        assert_eq!(q.try_take(), Err(QueueError::Empty));
    }

    #[test]
    fn test_take_timeout_elapses() {
        let q = BoundedBlockingQueue::<u8>::new(1).unwrap();
        let start = Instant::now();
        assert_eq!(q.take_timeout(Duration::from_millis(30)), Err(QueueError::Timeout));
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_put_timeout_elapses_and_returns_value() {
        let q = BoundedBlockingQueue::new(1).unwrap();
        q.put(1).unwrap();
        match q.put_timeout(2, Duration::from_millis(20)) {
            Err(TryPutError::Timeout(v)) => assert_eq!(v, 2),
            other => panic!("expected Timeout, got {other:?}"),
        }
        assert_eq!(q.take().unwrap(), 1);
    }

    #[test]
    fn test_close_releases_blocked_taker() {
        let q = Arc::new(BoundedBlockingQueue::<u32>::new(1).unwrap());
        let q2 = Arc::clone(&q);
        let taker = thread::spawn(move || q2.take());

        thread::sleep(Duration::from_millis(20));
        q.close();

        assert_eq!(taker.join().unwrap(), Err(QueueError::Closed));
    }

    #[test]
    fn test_close_releases_blocked_putter_with_value() {
        let q = Arc::new(BoundedBlockingQueue::new(1).unwrap());
        q.put(String::from("first")).unwrap();

        let q2 = Arc::clone(&q);
        let putter = thread::spawn(move || q2.put(String::from("second")));

        thread::sleep(Duration::from_millis(20));
        q.close();

        let err = putter.join().unwrap().unwrap_err();
        assert_eq!(err.into_inner(), "second");
        // Invariants intact: the element put before closing is still there.
        assert_eq!(q.len(), 1);
        assert_eq!(q.take().unwrap(), "first");
        assert_eq!(q.take(), Err(QueueError::Closed));
    }

    #[test]
    fn test_put_after_close_fails() {
        let q = BoundedBlockingQueue::new(2).unwrap();
        q.close();
        q.close();
        assert!(q.is_closed());
        assert_eq!(q.put(5).unwrap_err().into_inner(), 5);
        assert!(q.try_put(6).unwrap_err().is_closed());
        assert_eq!(q.try_take(), Err(QueueError::Closed));
    }

    #[cfg(feature = "tokio-runtime")]
    #[test]
    fn test_abandoned_async_wait_releases_waiter_without_taking() {
        let q = Arc::new(BoundedBlockingQueue::<u32>::new(1).unwrap());
        let registration = AsyncWait::new(&q);
        let abandoned = Arc::clone(&registration.abandoned);

        let q2 = Arc::clone(&q);
        let waiter = thread::spawn(move || q2.wait_until_ready(&abandoned));

        thread::sleep(Duration::from_millis(20));
        drop(registration);
        waiter.join().unwrap();

        q.put(3).unwrap();
        assert_eq!(q.try_take(), Ok(3));
    }

    #[cfg(feature = "tokio-runtime")]
    #[test]
    fn test_ready_wait_leaves_element_in_place() {
        let q = BoundedBlockingQueue::new(2).unwrap();
        q.put('a').unwrap();
        q.wait_until_ready(&AtomicBool::new(false));
        assert_eq!(q.len(), 1);
        assert_eq!(q.take(), Ok('a'));
    }

    #[test]
    fn test_debug_output() {
        let q = BoundedBlockingQueue::new(2).unwrap();
        q.put(1).unwrap();
        let debug = format!("{q:?}");
        assert!(debug.contains("capacity: 2"));
        assert!(debug.contains("len: 1"));
    }
}
