#![allow(dead_code)]

pub mod fixtures;
pub mod visit_log;

use tracing_subscriber::EnvFilter;

/// Route the library's events to the test output, filtered by `RUST_LOG`.
/// Safe to call from every test, only the first call installs a subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
