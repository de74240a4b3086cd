//! Tests for error types

use parking_timer::core::{FailureKind, PutError, QueueError, SchedulerError, TaskFailure, TryPutError};

#[test]
fn test_queue_error_display() {
    assert_eq!(QueueError::Empty.to_string(), "queue empty");
    assert_eq!(QueueError::Closed.to_string(), "queue closed");
}

#[test]
fn test_scheduler_error_display() {
    assert_eq!(SchedulerError::Shutdown.to_string(), "scheduler has been shut down");
    assert_eq!(
        SchedulerError::InvalidConfig("thread_name must not be empty".into()).to_string(),
        "invalid configuration: thread_name must not be empty"
    );
}

#[test]
fn test_put_errors_hand_back_value() {
    let err: TryPutError<Vec<u8>> = TryPutError::Timeout(vec![1, 2]);
    assert_eq!(err.to_string(), "operation timed out");
    assert_eq!(err.into_inner(), vec![1, 2]);

    let closed = PutError(vec![3]);
    assert_eq!(closed.into_inner(), vec![3]);
}

#[test]
fn test_errors_convert_to_anyhow() {
    let err: anyhow::Error = QueueError::Timeout.into();
    assert_eq!(err.to_string(), "operation timed out");

    let err: anyhow::Error = TaskFailure {
        task_id: 1,
        kind: FailureKind::Failed("bad input".into()),
    }
    .into();
    assert_eq!(err.to_string(), "task 1 failed: error: bad input");
}
