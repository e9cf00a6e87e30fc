//! Bracketed scalar root finding
//!
//! Brent's method (zeroin): inverse quadratic interpolation and secant steps
//! guarded by bisection, so the bracket shrinks on every iteration. The
//! solver is used to invert confidence-interval width formulas with respect
//! to the sample size, and to invert CDFs that have no closed-form quantile.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Default root-finding tolerance, `EPSILON^0.25` (about four significant digits)
pub const DEFAULT_TOLERANCE: f64 = 1.220_703_125e-4;

/// Default lower end of the sample-size bracket
pub const DEFAULT_LOWER: f64 = 1.0;

/// Default upper end of the sample-size bracket
pub const DEFAULT_UPPER: f64 = 1e7;

/// Default iteration budget
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Configuration for [`brent`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Absolute tolerance on the root
    pub tolerance: f64,
    /// Lower end of the bracket
    pub lower: f64,
    /// Upper end of the bracket
    pub upper: f64,
    /// Maximum number of iterations
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            lower: DEFAULT_LOWER,
            upper: DEFAULT_UPPER,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Set the absolute tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the search bracket
    pub fn with_bracket(mut self, lower: f64, upper: f64) -> Self {
        self.lower = lower;
        self.upper = upper;
        self
    }

    /// Set the iteration budget
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(Error::not_positive("tolerance", self.tolerance));
        }
        if !(self.lower.is_finite() && self.upper.is_finite() && self.lower < self.upper) {
            return Err(Error::InvalidArgument(format!(
                "bracket [{}, {}] must be finite with lower < upper",
                self.lower, self.upper
            )));
        }
        Ok(())
    }
}

/// Result from a root search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootResult {
    /// The root found
    pub root: f64,
    /// Function value at the root
    pub function_value: f64,
    /// Number of iterations used
    pub iterations: usize,
}

/// Find a root of `f` inside `[config.lower, config.upper]`
///
/// `f` must change sign over the bracket; otherwise
/// [`Error::RootNotBracketed`] is returned rather than searching outside it.
/// Errors from `f` itself are propagated.
pub fn brent<F>(mut f: F, config: &SolverConfig) -> Result<RootResult>
where
    F: FnMut(f64) -> Result<f64>,
{
    config.validate()?;

    let mut eval = |x: f64| -> Result<f64> {
        let fx = f(x)?;
        if fx.is_nan() {
            return Err(Error::Computation(format!("objective is NaN at {x}")));
        }
        Ok(fx)
    };

    let mut a = config.lower;
    let mut b = config.upper;
    let mut fa = eval(a)?;
    let mut fb = eval(b)?;

    if fa == 0.0 {
        return Ok(RootResult {
            root: a,
            function_value: fa,
            iterations: 0,
        });
    }
    if fb == 0.0 {
        return Ok(RootResult {
            root: b,
            function_value: fb,
            iterations: 0,
        });
    }
    if fa.signum() == fb.signum() {
        return Err(Error::RootNotBracketed {
            lower: a,
            upper: b,
            f_lower: fa,
            f_upper: fb,
        });
    }

    let mut c = a;
    let mut fc = fa;

    for iteration in 1..=config.max_iterations {
        let prev_step = b - a;

        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol_act = 2.0 * f64::EPSILON * b.abs() + config.tolerance / 2.0;
        let mut new_step = (c - b) / 2.0;

        if new_step.abs() <= tol_act || fb == 0.0 {
            debug!(root = b, iterations = iteration, "Brent search converged");
            return Ok(RootResult {
                root: b,
                function_value: fb,
                iterations: iteration,
            });
        }

        // Interpolate only if the previous step was large enough and in the right direction
        if prev_step.abs() >= tol_act && fa.abs() > fb.abs() {
            let cb = c - b;
            let (mut p, mut q);
            if a == c {
                // Secant
                let t1 = fb / fa;
                p = cb * t1;
                q = 1.0 - t1;
            } else {
                // Inverse quadratic interpolation
                let qa = fa / fc;
                let t1 = fb / fc;
                let t2 = fb / fa;
                p = t2 * (cb * qa * (qa - t1) - (b - a) * (t1 - 1.0));
                q = (qa - 1.0) * (t1 - 1.0) * (t2 - 1.0);
            }
            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }

            if p < 0.75 * cb * q - (tol_act * q).abs() / 2.0 && p < (prev_step * q / 2.0).abs() {
                new_step = p / q;
            }
        }

        if new_step.abs() < tol_act {
            new_step = if new_step > 0.0 { tol_act } else { -tol_act };
        }

        a = b;
        fa = fb;
        b += new_step;
        fb = eval(b)?;
        trace!(iteration, x = b, fx = fb, "Brent step");

        if (fb > 0.0 && fc > 0.0) || (fb < 0.0 && fc < 0.0) {
            c = a;
            fc = fa;
        }
    }

    Err(Error::ConvergenceFailure {
        iterations: config.max_iterations,
        estimate: b,
    })
}
