//! Width formulas and the count solver shared by all statistics
//!
//! A [`WidthFormula`] maps a count (sample size or number of events) to an
//! interval. Formulas hold the estimate and critical values they need and
//! are plain functions of the count, so the same code serves a single
//! evaluation and every objective call of the root search.

use precision_core::{brent, Error, Result, Solve, SolverConfig};
use tracing::debug;

/// An interval evaluated at one count
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Centre-adjusted estimate, for methods that re-centre
    pub adjusted: Option<f64>,
    /// Half of the full width
    pub half_width: f64,
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
}

impl Interval {
    /// Interval of the given half-width around `centre`
    pub fn symmetric(centre: f64, half_width: f64, adjusted: Option<f64>) -> Self {
        Self {
            adjusted,
            half_width,
            lower: centre - half_width,
            upper: centre + half_width,
        }
    }

    /// Interval re-centred on `adjusted` with separately computed bounds
    ///
    /// For formulas whose `centre ± half_width` form cancels badly near the
    /// edge of the parameter space.
    pub fn adjusted_bounds(adjusted: f64, half_width: f64, lower: f64, upper: f64) -> Self {
        Self {
            adjusted: Some(adjusted),
            half_width,
            lower,
            upper,
        }
    }

    /// Interval from explicit bounds
    pub fn from_bounds(lower: f64, upper: f64) -> Self {
        Self {
            adjusted: None,
            half_width: (upper - lower) / 2.0,
            lower,
            upper,
        }
    }

    /// Full confidence-interval width
    pub fn conf_width(&self) -> f64 {
        2.0 * self.half_width
    }
}

/// Confidence-interval width as a function of the count
///
/// Implementations must be strictly decreasing in the count; the root
/// search depends on it.
pub trait WidthFormula {
    /// Interval at `count`
    fn interval(&self, count: f64) -> Result<Interval>;

    /// Count giving a full width of `conf_width`, when it has a closed form
    fn count_for_width(&self, _conf_width: f64) -> Option<f64> {
        None
    }

    /// Smallest count the formula is defined for
    fn min_count(&self) -> f64 {
        1.0
    }
}

/// Solve the formula in the requested direction, returning the count and
/// the interval at that count
pub fn solve<F: WidthFormula>(
    formula: &F,
    solve: Solve,
    config: &SolverConfig,
) -> Result<(f64, Interval)> {
    match solve {
        Solve::ForWidth { count } => Ok((count, formula.interval(count)?)),
        Solve::ForCount { conf_width } => {
            let count = match formula.count_for_width(conf_width) {
                Some(count) if count.is_finite() && count > 0.0 => {
                    debug!(count, conf_width, "Closed-form count");
                    count
                }
                Some(count) => {
                    // Same report as a failed root search over the bracket
                    debug!(count, conf_width, "Closed form has no positive count");
                    let lower = config.lower.max(formula.min_count());
                    return Err(Error::RootNotBracketed {
                        lower,
                        upper: config.upper,
                        f_lower: formula.interval(lower)?.conf_width() - conf_width,
                        f_upper: formula.interval(config.upper)?.conf_width() - conf_width,
                    });
                }
                None => {
                    let bracketed = config
                        .with_bracket(config.lower.max(formula.min_count()), config.upper);
                    let root = brent(
                        |count| Ok(formula.interval(count)?.conf_width() - conf_width),
                        &bracketed,
                    )?;
                    debug!(
                        count = root.root,
                        conf_width,
                        iterations = root.iterations,
                        "Root search for count"
                    );
                    root.root
                }
            };
            Ok((count, formula.interval(count)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct InverseSqrt;

    impl WidthFormula for InverseSqrt {
        fn interval(&self, count: f64) -> Result<Interval> {
            Ok(Interval::symmetric(0.0, 1.0 / count.sqrt(), None))
        }
    }

    struct InverseSqrtClosed;

    impl WidthFormula for InverseSqrtClosed {
        fn interval(&self, count: f64) -> Result<Interval> {
            InverseSqrt.interval(count)
        }

        fn count_for_width(&self, conf_width: f64) -> Option<f64> {
            Some((2.0 / conf_width).powi(2))
        }
    }

    #[test]
    fn test_interval_shapes() {
        let i = Interval::symmetric(1.0, 0.5, Some(1.0));
        assert_eq!(i.lower, 0.5);
        assert_eq!(i.upper, 1.5);
        assert_eq!(i.conf_width(), 1.0);

        let i = Interval::from_bounds(0.25, 0.75);
        assert_eq!(i.half_width, 0.25);
        assert_eq!(i.conf_width(), 0.5);
    }

    #[test]
    fn test_solve_for_width() {
        let (count, interval) = solve(
            &InverseSqrt,
            Solve::ForWidth { count: 100.0 },
            &SolverConfig::default(),
        )
        .unwrap();
        assert_eq!(count, 100.0);
        assert_relative_eq!(interval.conf_width(), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_root_search_matches_closed_form() {
        let target = Solve::ForCount { conf_width: 0.2 };
        let config = SolverConfig::default();
        let (searched, _) = solve(&InverseSqrt, target, &config).unwrap();
        let (closed, _) = solve(&InverseSqrtClosed, target, &config).unwrap();
        assert_relative_eq!(closed, 100.0, epsilon = 1e-9);
        assert!((searched - closed).abs() < 1e-2);
    }

    struct Flat;

    impl WidthFormula for Flat {
        fn interval(&self, _count: f64) -> Result<Interval> {
            Ok(Interval::symmetric(0.0, 0.0, None))
        }

        fn count_for_width(&self, _conf_width: f64) -> Option<f64> {
            Some(0.0)
        }
    }

    #[test]
    fn test_closed_form_without_count_is_not_bracketed() {
        let err = solve(
            &Flat,
            Solve::ForCount { conf_width: 0.1 },
            &SolverConfig::default(),
        )
        .unwrap_err();
        match err {
            Error::RootNotBracketed {
                lower,
                upper,
                f_lower,
                f_upper,
            } => {
                assert_eq!(lower, 1.0);
                assert_eq!(upper, 1e7);
                assert_eq!(f_lower, -0.1);
                assert_eq!(f_upper, -0.1);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_unattainable_width() {
        let err = solve(
            &InverseSqrt,
            Solve::ForCount { conf_width: 10.0 },
            &SolverConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::RootNotBracketed { .. }));
    }
}
