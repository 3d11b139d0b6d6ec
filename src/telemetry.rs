//! Logging setup.
//!
//! The crate itself only emits `tracing` events. Embedding services call one of these
//! once at startup to get them on the console, filtered by `RUST_LOG`.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Install a console subscriber. Fails if a global subscriber is already set.
pub fn init_telemetry() -> Result<(), TryInitError> {
    let fmt_layer = tracing_subscriber::fmt::layer();
    let env_filter = EnvFilter::from_default_env();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
}

/// Like [`init_telemetry`], but writes through the test harness so output is captured
/// per test. Safe to call from every test.
pub fn init_test_telemetry() {
    let fmt_layer = tracing_subscriber::fmt::layer().with_test_writer();
    let env_filter = EnvFilter::from_default_env();

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
