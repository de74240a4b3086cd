//! Tests for configuration validation

use parking_timer::config::{QueueConfig, SchedulerConfig};

#[test]
fn test_queue_config_validation() {
    assert!(QueueConfig::new().with_capacity(16).validate().is_ok());
    assert!(QueueConfig::new().with_capacity(0).validate().is_err());
}

#[test]
fn test_queue_config_from_json() {
    let cfg = QueueConfig::from_json_str(r#"{ "capacity": 32 }"#).unwrap();
    assert_eq!(cfg.capacity, 32);
}

#[test]
fn test_queue_config_from_json_rejects_zero() {
    let err = QueueConfig::from_json_str(r#"{ "capacity": 0 }"#).unwrap_err();
    assert!(err.contains("capacity"));
}

#[test]
fn test_queue_config_from_json_rejects_garbage() {
    let err = QueueConfig::from_json_str("capacity = 3").unwrap_err();
    assert!(err.starts_with("parse error"));
}

#[test]
fn test_scheduler_config_defaults() {
    let cfg = SchedulerConfig::default();
    assert_eq!(cfg.thread_name, "timer-worker");
    assert_eq!(cfg.stack_size, None);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_scheduler_config_invalid_thread_name() {
    assert!(SchedulerConfig::new().with_thread_name("  ").validate().is_err());
    assert!(SchedulerConfig::new().with_thread_name("a\0b").validate().is_err());
}

#[test]
fn test_scheduler_config_invalid_stack_size() {
    let cfg = SchedulerConfig::new().with_stack_size(1024);
    assert!(cfg.validate().is_err());

    let cfg = SchedulerConfig::new().with_stack_size(256 * 1024);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_scheduler_config_from_json_partial() {
    let cfg = SchedulerConfig::from_json_str(r#"{ "thread_name": "reports" }"#).unwrap();
    assert_eq!(cfg.thread_name, "reports");
    assert_eq!(cfg.stack_size, None);
}

#[test]
fn test_scheduler_config_roundtrip_json() {
    let cfg = SchedulerConfig::new()
        .with_thread_name("io-timer")
        .with_stack_size(64 * 1024);
    let json = serde_json::to_string(&cfg).unwrap();
    assert_eq!(SchedulerConfig::from_json_str(&json).unwrap(), cfg);
}
