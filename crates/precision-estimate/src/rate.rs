//! Precision of a rate
//!
//! A rate `r` is a number of events `x` per exposure time `x / r`. Four
//! interval methods are available:
//!
//! | Method | Centre | Half-width |
//! |--------|--------|------------|
//! | score (default) | `r + z²r/(2x)` | `z r sqrt(1/x + z²/(4x²))` |
//! | vs | `r (1 + z²/(4x))` | `z r / sqrt(x)` |
//! | exact | `r` | half the distance between the gamma quantiles |
//! | wald | `r` | `z r / sqrt(x)` |
//!
//! wald and vs invert in closed form; score and exact use the root finder.

use crate::batch::{known_column, run};
use crate::formula::{solve, Interval, WidthFormula};
use crate::registry::{resolve_method, MethodRegistry, Resolution};
use crate::types::ConfidenceInterval;
use crate::warning::EstimationWarning;
use precision_core::{
    distributions::{gamma, normal},
    Column, ConfidenceLevel, ExecutionStrategy, Result, SolverConfig, Validator,
};
use serde::Serialize;
use std::fmt;
use tracing::instrument;

/// Note attached to results whose interval is centred on `radj`
pub const RATE_NOTE: &str = "radj is the adjusted rate, from which the CI is calculated.";

/// Interval methods for a rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RateMethod {
    /// Score interval
    Score,
    /// Variance-stabilizing interval
    VarianceStabilizing,
    /// Exact interval from gamma quantiles
    Exact,
    /// Wald interval
    Wald,
}

impl MethodRegistry for RateMethod {
    const STATISTIC: &'static str = "rate";
    const DEFAULT: Self = RateMethod::Score;
    const CHOICES: &'static [(&'static str, Self)] = &[
        ("score", RateMethod::Score),
        ("vs", RateMethod::VarianceStabilizing),
        ("exact", RateMethod::Exact),
        ("wald", RateMethod::Wald),
    ];

    fn name(self) -> &'static str {
        match self {
            RateMethod::Score => "score",
            RateMethod::VarianceStabilizing => "vs",
            RateMethod::Exact => "exact",
            RateMethod::Wald => "wald",
        }
    }

    fn label(self) -> &'static str {
        match self {
            RateMethod::Score => "score",
            RateMethod::VarianceStabilizing => "variance stabilizing",
            RateMethod::Exact => "exact",
            RateMethod::Wald => "Wald",
        }
    }

    fn adjusts_estimate(self) -> bool {
        matches!(self, RateMethod::Score | RateMethod::VarianceStabilizing)
    }
}

/// Width formula for one rate method
#[derive(Debug, Clone, Copy)]
pub struct RateFormula {
    method: RateMethod,
    r: f64,
    z: f64,
    tail: f64,
}

impl RateFormula {
    pub fn new(method: RateMethod, r: f64, level: ConfidenceLevel) -> Result<Self> {
        Ok(Self {
            method,
            r,
            z: normal::critical(level)?,
            tail: level.tail_probability(),
        })
    }
}

impl WidthFormula for RateFormula {
    fn interval(&self, x: f64) -> Result<Interval> {
        let (r, z) = (self.r, self.z);
        let z2 = z * z;
        let interval = match self.method {
            RateMethod::Wald => Interval::symmetric(r, z * r / x.sqrt(), None),
            RateMethod::VarianceStabilizing => {
                let radj = r * (1.0 + z2 / (4.0 * x));
                Interval::symmetric(radj, z * r / x.sqrt(), Some(radj))
            }
            RateMethod::Score => {
                let radj = r + z2 * r / (2.0 * x);
                let root = z * (x + z2 / 4.0).sqrt();
                // Rationalised lower bound keeps its precision for small x
                let lwr = r * x / (x + z2 / 2.0 + root);
                let upr = r * (x + z2 / 2.0 + root) / x;
                Interval::adjusted_bounds(radj, r * root / x, lwr, upr)
            }
            RateMethod::Exact => {
                let time = x / r;
                let lwr = gamma::quantile(self.tail, x)? / time;
                let upr = gamma::quantile(1.0 - self.tail, x + 1.0)? / time;
                Interval::from_bounds(lwr, upr)
            }
        };
        Ok(interval)
    }

    fn count_for_width(&self, conf_width: f64) -> Option<f64> {
        match self.method {
            RateMethod::Wald | RateMethod::VarianceStabilizing => {
                Some((2.0 * self.z * self.r / conf_width).powi(2))
            }
            RateMethod::Score | RateMethod::Exact => None,
        }
    }
}

/// Result of a rate precision calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateEstimate {
    pub r: f64,
    /// Adjusted rate the interval is centred on (score and vs only)
    pub radj: Option<f64>,
    /// Number of events
    pub x: f64,
    /// Exposure time, `x / r`
    pub time: f64,
    pub conf_width: f64,
    pub conf_level: f64,
    pub lwr: f64,
    pub upr: f64,
    pub note: Option<&'static str>,
    pub method: String,
    pub resolved_method: RateMethod,
    pub warnings: Vec<EstimationWarning>,
}

impl RateEstimate {
    /// Half of the interval width
    pub fn precision(&self) -> f64 {
        self.conf_width / 2.0
    }

    /// The interval as a standalone value, centred on `radj` when present
    pub fn interval(&self) -> ConfidenceInterval {
        let centre = self.radj.unwrap_or(self.r);
        ConfidenceInterval::new(self.lwr, self.upr, centre, self.conf_level)
    }
}

impl fmt::Display for RateEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "     {}", self.method)?;
        writeln!(f)?;
        write!(f, "     r = {}", self.r)?;
        if let Some(radj) = self.radj {
            write!(f, ", radj = {radj:.4}")?;
        }
        writeln!(
            f,
            ", x = {:.4}, time = {:.4}, conf_width = {:.4}, conf_level = {}",
            self.x, self.time, self.conf_width, self.conf_level
        )?;
        write!(f, "     lwr = {:.4}, upr = {:.4}", self.lwr, self.upr)?;
        if let Some(note) = self.note {
            write!(f, "\n\nNOTE: {note}")?;
        }
        Ok(())
    }
}

/// Builder for a rate precision calculation
///
/// # Example
/// ```rust
/// use precision_estimate::RatePrecision;
///
/// let wald = RatePrecision::new(2.5).with_x(20.0).with_method("wald").estimate().unwrap();
/// let vs = RatePrecision::new(2.5).with_x(20.0).with_method("vs").estimate().unwrap();
/// assert!((wald.conf_width - vs.conf_width).abs() < 1e-12);
/// assert!(vs.lwr > wald.lwr);
/// ```
#[derive(Debug, Clone)]
pub struct RatePrecision {
    r: f64,
    x: Option<f64>,
    conf_width: Option<f64>,
    conf_level: f64,
    methods: Vec<String>,
    solver: SolverConfig,
}

impl RatePrecision {
    /// Start a calculation for rate `r`
    pub fn new(r: f64) -> Self {
        Self {
            r,
            x: None,
            conf_width: None,
            conf_level: ConfidenceLevel::NINETY_FIVE.value(),
            methods: Vec::new(),
            solver: SolverConfig::default(),
        }
    }

    /// Known number of events; the width will be computed
    pub fn with_x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    /// Desired full interval width; the number of events will be computed
    pub fn with_conf_width(mut self, conf_width: f64) -> Self {
        self.conf_width = Some(conf_width);
        self
    }

    /// Set the confidence level
    pub fn with_conf_level(mut self, conf_level: f64) -> Self {
        self.conf_level = conf_level;
        self
    }

    /// Choose the interval method by (possibly abbreviated) name
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.methods = vec![method.into()];
        self
    }

    /// Supply several method names; more than one falls back to the default
    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = methods.into_iter().map(Into::into).collect();
        self
    }

    /// Set the root-finding tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.solver = self.solver.with_tolerance(tolerance);
        self
    }

    /// Replace the solver configuration
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Run the calculation
    #[instrument(level = "debug", skip(self), fields(r = self.r))]
    pub fn estimate(&self) -> Result<RateEstimate> {
        let resolution = resolve_method::<RateMethod, _>(&self.methods);
        estimate_rate(
            self.r,
            self.x,
            self.conf_width,
            self.conf_level,
            &resolution,
            &self.solver,
        )
    }
}

/// Elementwise rate calculation over vectors of inputs
///
/// Inputs of length one are broadcast. Each element gets its own `Result`,
/// so a failed root search does not discard the other elements.
#[derive(Debug, Clone)]
pub struct RateBatch {
    r: Vec<f64>,
    x: Option<Vec<f64>>,
    conf_width: Option<Vec<f64>>,
    conf_level: Vec<f64>,
    methods: Vec<String>,
    solver: SolverConfig,
    strategy: ExecutionStrategy,
}

impl RateBatch {
    pub fn new(r: Vec<f64>) -> Self {
        Self {
            r,
            x: None,
            conf_width: None,
            conf_level: vec![ConfidenceLevel::NINETY_FIVE.value()],
            methods: Vec::new(),
            solver: SolverConfig::default(),
            strategy: ExecutionStrategy::default(),
        }
    }

    pub fn with_x(mut self, x: Vec<f64>) -> Self {
        self.x = Some(x);
        self
    }

    pub fn with_conf_width(mut self, conf_width: Vec<f64>) -> Self {
        self.conf_width = Some(conf_width);
        self
    }

    pub fn with_conf_level(mut self, conf_level: Vec<f64>) -> Self {
        self.conf_level = conf_level;
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.methods = vec![method.into()];
        self
    }

    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = methods.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.solver = self.solver.with_tolerance(tolerance);
        self
    }

    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Run the calculation for every element
    #[instrument(level = "debug", skip(self), fields(len = self.r.len()))]
    pub fn estimate(&self) -> Result<Vec<Result<RateEstimate>>> {
        let (known, given) =
            known_column("x", self.x.as_deref(), self.conf_width.as_deref())?;
        let resolution = resolve_method::<RateMethod, _>(&self.methods);
        let columns = [
            Column::new("r", &self.r),
            given,
            Column::new("conf_level", &self.conf_level),
        ];

        run(&columns, self.strategy, |i| {
            let (x, conf_width) = known.split(columns[1].at(i));
            estimate_rate(
                columns[0].at(i),
                x,
                conf_width,
                columns[2].at(i),
                &resolution,
                &self.solver,
            )
        })
    }
}

pub(crate) fn estimate_rate(
    r: f64,
    x: Option<f64>,
    conf_width: Option<f64>,
    conf_level: f64,
    resolution: &Resolution<RateMethod>,
    solver: &SolverConfig,
) -> Result<RateEstimate> {
    let level = ConfidenceLevel::new(conf_level)?;
    Validator::non_negative("r", r)?;
    Validator::positive("tol", solver.tolerance)?;
    let target = Validator::solve_target("x", x, conf_width)?;

    let method = resolution.method;
    let formula = RateFormula::new(method, r, level)?;
    let (x, interval) = solve(&formula, target, solver)?;

    let mut warnings: Vec<EstimationWarning> = resolution.warning.iter().cloned().collect();
    if method == RateMethod::VarianceStabilizing && r == 0.0 {
        let w = EstimationWarning::degenerate(
            "the variance stabilizing interval is degenerate when r = 0; \
             consider the score or exact method",
        );
        w.emit();
        warnings.push(w);
    }
    if interval.lower < 0.0 {
        let w = EstimationWarning::degenerate(format!(
            "the lower end of the confidence interval is negative ({:.4}); \
             consider the score or exact method",
            interval.lower
        ));
        w.emit();
        warnings.push(w);
    }

    Ok(RateEstimate {
        r,
        radj: interval.adjusted,
        x,
        time: x / r,
        conf_width: interval.conf_width(),
        conf_level,
        lwr: interval.lower,
        upr: interval.upper,
        note: method.adjusts_estimate().then_some(RATE_NOTE),
        method: method.description(),
        resolved_method: method,
        warnings,
    })
}
