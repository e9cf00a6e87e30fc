//! Core numerics for sample size and precision calculations
//!
//! This crate provides the building blocks shared by the estimators in
//! `precision-estimate`:
//!
//! - **Errors**: a single [`Error`] type and [`Result`] alias
//! - **Validation**: argument checks and the [`Solve`] direction
//! - **Distributions**: normal, Student-t, gamma and beta quantiles on top of `statrs`
//! - **Root finding**: Brent's method over a bounded bracket
//! - **Batches**: elementwise broadcasting of vector inputs
//!
//! # Example
//!
//! ```rust
//! use precision_core::root::{brent, SolverConfig};
//!
//! // Smallest n with 1/sqrt(n) <= 0.1
//! let result = brent(|n| Ok(1.0 / n.sqrt() - 0.1), &SolverConfig::default()).unwrap();
//! assert!((result.root - 100.0).abs() < 1e-2);
//! ```

pub mod batch;
pub mod error;
pub mod level;
pub mod math;
pub mod root;
pub mod validation;

pub use batch::{broadcast_len, execute_batch, Column, ExecutionStrategy};
pub use error::{Error, Result};
pub use level::ConfidenceLevel;
pub use math::distributions;
pub use root::{brent, RootResult, SolverConfig, DEFAULT_TOLERANCE};
pub use validation::{Solve, Validator};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
