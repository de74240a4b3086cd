//! Mutex used to guard queue and scheduler state.
//!
//! Re-exports `parking_lot`'s mutex: no poisoning, so a panicking scheduled action
//! can never leave the scheduler's heap behind a poisoned lock.
//!
//! ```
//! use parking_timer::Mutex;
//! use std::collections::VecDeque;
//!
//! let slots = Mutex::new(VecDeque::with_capacity(2));
//! slots.lock().push_back(1);
//! slots.lock().push_back(2);
//! assert_eq!(slots.lock().pop_front(), Some(1));
//! ```

pub use parking_lot::{Mutex, MutexGuard};
