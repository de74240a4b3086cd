//! Tests for utility functions

use parking_timer::util::{deadline_after, delay_from_millis, fire_time, init_tracing, remaining};
use std::time::{Duration, Instant};

#[test]
fn test_delay_from_millis() {
    assert_eq!(delay_from_millis(i64::MIN), Duration::ZERO);
    assert_eq!(delay_from_millis(50), Duration::from_millis(50));
}

#[test]
fn test_fire_time_and_remaining() {
    let now = Instant::now();
    let at = fire_time(now, Duration::from_millis(250));
    assert_eq!(remaining(at, now), Duration::from_millis(250));
}

#[test]
fn test_deadline_after_is_in_future() {
    let before = Instant::now();
    let deadline = deadline_after(Duration::from_secs(1)).unwrap();
    assert!(deadline > before);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}
