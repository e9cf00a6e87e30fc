//! Sample size and precision for means, rates and proportions
//!
//! Every calculation takes a point estimate plus exactly one of
//!
//! - the count (sample size `n`, or number of events `x` for a rate), giving
//!   the confidence-interval width, or
//! - the full interval width, giving the count.
//!
//! # Methods
//!
//! | Statistic | Methods (default first) |
//! |-----------|-------------------------|
//! | mean | t-based |
//! | rate | score, vs, exact, wald |
//! | proportion | wilson, agresti-coull (`ac`), exact, wald |
//!
//! Method names may be abbreviated to any unambiguous prefix. Unknown or
//! multiple names fall back to the default and record an
//! [`EstimationWarning`] on the result instead of failing. Intervals that
//! leave the natural domain of the statistic are reported unchanged with a
//! warning.
//!
//! # Examples
//!
//! ```rust
//! use precision_estimate::{MeanPrecision, ProportionPrecision};
//!
//! // Width of the 95% CI around a mean with n = 20
//! let mean = MeanPrecision::new(5.0, 2.5).with_n(20.0).estimate().unwrap();
//! assert!((mean.conf_width - 2.34).abs() < 0.01);
//!
//! // Sample size for a Wilson interval of width 0.1 around p = 0.2
//! let prop = ProportionPrecision::new(0.2).with_conf_width(0.1).estimate().unwrap();
//! assert!(prop.n > 200.0 && prop.n < 300.0);
//! ```

pub mod api;
mod batch;
pub mod formula;
pub mod mean;
pub mod proportion;
pub mod rate;
pub mod registry;
mod types;
mod warning;

// Re-exports
pub use api::{estimate_for_mean, estimate_for_proportion, estimate_for_rate};
pub use formula::{Interval, WidthFormula};
pub use mean::{MeanBatch, MeanEstimate, MeanFormula, MeanPrecision};
pub use precision_core::{
    ConfidenceLevel, Error, ExecutionStrategy, Result, Solve, SolverConfig, DEFAULT_TOLERANCE,
};
pub use proportion::{
    ProportionBatch, ProportionEstimate, ProportionFormula, ProportionMethod, ProportionPrecision,
};
pub use rate::{RateBatch, RateEstimate, RateFormula, RateMethod, RatePrecision};
pub use registry::{resolve_method, MethodRegistry, Resolution};
pub use types::ConfidenceInterval;
pub use warning::{EstimationWarning, ResolutionIssue};

/// Convenience re-exports
pub mod prelude {
    pub use crate::{
        ConfidenceLevel, Error, EstimationWarning, ExecutionStrategy, MeanBatch, MeanPrecision,
        MethodRegistry, ProportionBatch, ProportionMethod, ProportionPrecision, RateBatch,
        RateMethod, RatePrecision, Result,
    };
}
