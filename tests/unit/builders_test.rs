//! Tests for builders

use parking_timer::builders::{build_queue, SchedulerBuilder};
use parking_timer::config::{QueueConfig, SchedulerConfig};
use parking_timer::core::{QueueError, SchedulerError};
use std::sync::mpsc;
use std::time::Duration;

#[test]
fn test_build_queue_from_config() {
    let queue = build_queue::<u8>(&QueueConfig::new().with_capacity(3)).unwrap();
    assert_eq!(queue.capacity(), 3);
    assert!(queue.is_empty());
}

#[test]
fn test_build_queue_rejects_zero_capacity() {
    let err = build_queue::<u8>(&QueueConfig { capacity: 0 }).unwrap_err();
    assert_eq!(err, QueueError::InvalidCapacity(0));
}

#[test]
fn test_builder_names_worker_thread() {
    let scheduler = SchedulerBuilder::new()
        .thread_name("named-timer")
        .stack_size(128 * 1024)
        .build()
        .unwrap();
    let (tx, rx) = mpsc::channel();

    scheduler
        .schedule(Duration::ZERO, move || {
            tx.send(std::thread::current().name().map(str::to_owned)).unwrap();
        })
        .unwrap();

    assert_eq!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap().as_deref(),
        Some("named-timer")
    );
    scheduler.shutdown();
}

#[test]
fn test_builder_rejects_invalid_config() {
    let result = SchedulerBuilder::new()
        .config(SchedulerConfig::new().with_stack_size(1))
        .build();
    assert!(matches!(result, Err(SchedulerError::InvalidConfig(_))));
}
