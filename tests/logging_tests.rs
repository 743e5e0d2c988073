//! Unit tests for the logging functionality in the `si4703-rs` crate.

use si4703_rs::logging::{init_logger_with_default, log_info, DEFAULT_LOG_FILTER};
use si4703_rs::util::{log_registers, LogThrottle};

/// Tests that the default filter installs a logger that enables crate info records.
#[test]
fn test_init_logger_with_default() {
    init_logger_with_default(DEFAULT_LOG_FILTER);
    log_info("Tuned to 97.3 MHz");
    log_registers("Wrote registers", &[0x4001, 0x0062, 0x1000, 0x0011, 0x0000, 0x8100]);
    if std::env::var_os("RUST_LOG").is_none() {
        assert!(log::log_enabled!(target: "si4703_rs", log::Level::Info));
    }
}

/// Tests that the throttle caps messages within one window.
#[test]
fn test_throttle_caps_window() {
    let mut throttle = LogThrottle::new(60_000, 3);
    let allowed = (0..10).filter(|_| throttle.allow()).count();
    assert_eq!(allowed, 3);
    assert_eq!(throttle.suppressed(), 7);
}
