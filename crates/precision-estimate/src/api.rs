//! Function-style entry points
//!
//! Thin wrappers over the builders for callers that prefer passing every
//! option at once. Pass `None` for the quantity to solve for.

use crate::mean::{MeanEstimate, MeanPrecision};
use crate::proportion::{ProportionEstimate, ProportionPrecision};
use crate::rate::{RateEstimate, RatePrecision};
use precision_core::Result;

/// Default confidence level
pub const DEFAULT_CONF_LEVEL: f64 = 0.95;

/// Default rate method
pub const DEFAULT_RATE_METHOD: &str = "score";

/// Default proportion method
pub const DEFAULT_PROPORTION_METHOD: &str = "wilson";

/// Width for a given sample size, or sample size for a given width, of the
/// interval around a mean
///
/// # Example
/// ```rust
/// use precision_estimate::api::{estimate_for_mean, DEFAULT_CONF_LEVEL};
/// use precision_estimate::DEFAULT_TOLERANCE;
///
/// let r = estimate_for_mean(5.0, 2.5, None, Some(2.34), DEFAULT_CONF_LEVEL, DEFAULT_TOLERANCE)
///     .unwrap();
/// assert!((r.n - 20.0).abs() < 0.1);
/// ```
pub fn estimate_for_mean(
    mu: f64,
    sd: f64,
    n: Option<f64>,
    conf_width: Option<f64>,
    conf_level: f64,
    tol: f64,
) -> Result<MeanEstimate> {
    let mut builder = MeanPrecision::new(mu, sd)
        .with_conf_level(conf_level)
        .with_tolerance(tol);
    if let Some(n) = n {
        builder = builder.with_n(n);
    }
    if let Some(conf_width) = conf_width {
        builder = builder.with_conf_width(conf_width);
    }
    builder.estimate()
}

/// Width for a given number of events, or number of events for a given
/// width, of the interval around a rate
pub fn estimate_for_rate(
    r: f64,
    x: Option<f64>,
    conf_width: Option<f64>,
    conf_level: f64,
    method: &str,
    tol: f64,
) -> Result<RateEstimate> {
    let mut builder = RatePrecision::new(r)
        .with_conf_level(conf_level)
        .with_method(method)
        .with_tolerance(tol);
    if let Some(x) = x {
        builder = builder.with_x(x);
    }
    if let Some(conf_width) = conf_width {
        builder = builder.with_conf_width(conf_width);
    }
    builder.estimate()
}

/// Width for a given sample size, or sample size for a given width, of the
/// interval around a proportion
pub fn estimate_for_proportion(
    p: f64,
    n: Option<f64>,
    conf_width: Option<f64>,
    conf_level: f64,
    method: &str,
    tol: f64,
) -> Result<ProportionEstimate> {
    let mut builder = ProportionPrecision::new(p)
        .with_conf_level(conf_level)
        .with_method(method)
        .with_tolerance(tol);
    if let Some(n) = n {
        builder = builder.with_n(n);
    }
    if let Some(conf_width) = conf_width {
        builder = builder.with_conf_width(conf_width);
    }
    builder.estimate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use precision_core::{ConfidenceLevel, DEFAULT_TOLERANCE};

    #[test]
    fn test_defaults_agree_with_builders() {
        assert_eq!(DEFAULT_CONF_LEVEL, ConfidenceLevel::default().value());

        let f = estimate_for_proportion(
            0.2,
            Some(100.0),
            None,
            DEFAULT_CONF_LEVEL,
            DEFAULT_PROPORTION_METHOD,
            DEFAULT_TOLERANCE,
        )
        .unwrap();
        let b = ProportionPrecision::new(0.2).with_n(100.0).estimate().unwrap();
        assert_eq!(f, b);

        let f = estimate_for_rate(
            2.5,
            Some(20.0),
            None,
            DEFAULT_CONF_LEVEL,
            DEFAULT_RATE_METHOD,
            DEFAULT_TOLERANCE,
        )
        .unwrap();
        let b = RatePrecision::new(2.5).with_x(20.0).estimate().unwrap();
        assert_eq!(f, b);
    }

    #[test]
    fn test_both_unknowns_supplied() {
        assert!(estimate_for_mean(5.0, 2.5, Some(20.0), Some(2.0), 0.95, DEFAULT_TOLERANCE).is_err());
        assert!(estimate_for_rate(2.5, None, None, 0.95, "score", DEFAULT_TOLERANCE).is_err());
    }

    #[test]
    fn test_bad_tolerance() {
        assert!(estimate_for_mean(5.0, 2.5, None, Some(2.34), 0.95, -1.0).is_err());
    }
}
