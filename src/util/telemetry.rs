//! Telemetry helpers for structured logging.

/// Install a default env-filtered `tracing` subscriber unless one is already set.
///
/// Scheduler and queue events are emitted at `debug`; task failures at `error`.
/// Use `RUST_LOG=parking_timer=debug` to see the worker's state transitions.
pub fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_thread_names(true)
        .try_init();
}
