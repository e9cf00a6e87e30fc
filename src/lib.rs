//! # Precision Stats
//!
//! Sample size and confidence-interval width calculations for a mean, a
//! rate and a proportion.
//!
//! ## Crates
//!
//! - [`precision_core`]: error types, confidence levels, distribution quantiles, the
//!   Brent root finder and batch execution
//! - [`precision_estimate`]: the interval methods for each statistic and their
//!   builders
//!
//! ## Quick Start
//!
//! ```rust
//! use precision_stats::prelude::*;
//!
//! // Events needed for a score interval of width 2 around a rate of 2.5
//! let result = RatePrecision::new(2.5).with_conf_width(2.0).estimate().unwrap();
//! assert!(result.x > 0.0);
//!
//! // An unknown method falls back to Wilson with a warning
//! let result = ProportionPrecision::new(0.2)
//!     .with_n(100.0)
//!     .with_method("bogus")
//!     .estimate()
//!     .unwrap();
//! assert_eq!(result.resolved_method, ProportionMethod::Wilson);
//! assert_eq!(result.warnings.len(), 1);
//! ```

pub use precision_core;
pub use precision_estimate;

pub use precision_estimate::{
    estimate_for_mean, estimate_for_proportion, estimate_for_rate, ConfidenceInterval,
    ConfidenceLevel, Error, EstimationWarning, ExecutionStrategy, MeanBatch, MeanEstimate,
    MeanPrecision, MethodRegistry, ProportionBatch, ProportionEstimate, ProportionMethod,
    ProportionPrecision, RateBatch, RateEstimate, RateMethod, RatePrecision, Result,
    SolverConfig, DEFAULT_TOLERANCE,
};

/// Prelude for common imports
pub mod prelude {
    pub use precision_estimate::prelude::*;
}
