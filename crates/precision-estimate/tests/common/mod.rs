//! Shared utilities for integration tests

#![allow(dead_code)]

pub use approx::{assert_abs_diff_eq, assert_relative_eq};

use std::sync::Once;

/// Two-sided 95% normal critical value
pub const Z95: f64 = 1.959_963_984_540_054;

/// Relative tolerance for counts recovered by root search
pub const COUNT_RTOL: f64 = 1e-3;

static INIT: Once = Once::new();

/// Route `tracing` output to the test writer, filtered by `RUST_LOG`
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub const RATE_METHODS: [&str; 4] = ["score", "vs", "exact", "wald"];

pub const PROPORTION_METHODS: [&str; 4] = ["wilson", "agresti-coull", "exact", "wald"];
