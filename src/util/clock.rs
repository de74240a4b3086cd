//! Monotonic clock helpers for deadlines and fire times.

use std::time::{Duration, Instant};

/// Deadline `timeout` from now, or `None` if it does not fit in an `Instant`.
#[must_use]
pub fn deadline_after(timeout: Duration) -> Option<Instant> {
    Instant::now().checked_add(timeout)
}

/// Convert a signed millisecond delay into a `Duration`.
///
/// Zero and negative delays mean "as soon as possible" and map to `Duration::ZERO`.
#[must_use]
pub fn delay_from_millis(delay_ms: i64) -> Duration {
    u64::try_from(delay_ms).map_or(Duration::ZERO, Duration::from_millis)
}

/// Upper bound on a fire-time delay. Longer delays are clamped to it.
pub const MAX_DELAY: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

/// Absolute fire time `delay` after `now`, clamped to [`MAX_DELAY`].
///
/// Never panics: if even the clamped delay overflows the platform `Instant`,
/// the delay is halved until it fits. Only a zero delay yields `now`.
#[must_use]
pub fn fire_time(now: Instant, delay: Duration) -> Instant {
    let mut delay = delay.min(MAX_DELAY);
    loop {
        if let Some(at) = now.checked_add(delay) {
            return at;
        }
        delay /= 2;
    }
}

/// Time left until `deadline`, zero if it has passed.
#[must_use]
pub fn remaining(deadline: Instant, now: Instant) -> Duration {
    deadline.saturating_duration_since(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_and_zero_delays_are_immediate() {
        assert_eq!(delay_from_millis(-250), Duration::ZERO);
        assert_eq!(delay_from_millis(0), Duration::ZERO);
        assert_eq!(delay_from_millis(1500), Duration::from_millis(1500));
    }

    #[test]
    fn test_deadline_after_overflow() {
        assert!(deadline_after(Duration::from_millis(10)).is_some());
        assert!(deadline_after(Duration::MAX).is_none());
    }

    #[test]
    fn test_fire_time_saturates() {
        let now = Instant::now();
        assert_eq!(fire_time(now, Duration::from_millis(5)), now + Duration::from_millis(5));
        assert!(fire_time(now, Duration::MAX) > now);
    }

    #[test]
    fn test_fire_time_clamps_huge_delays() {
        let now = Instant::now();
        let clamped = fire_time(now, Duration::MAX);
        assert!(clamped <= now + MAX_DELAY);
        assert_eq!(clamped, fire_time(now, MAX_DELAY + Duration::from_secs(1)));
        assert_eq!(fire_time(now, Duration::ZERO), now);
    }

    #[test]
    fn test_remaining() {
        let now = Instant::now();
        let later = now + Duration::from_millis(40);
        assert_eq!(remaining(later, now), Duration::from_millis(40));
        assert_eq!(remaining(now, later), Duration::ZERO);
    }
}
