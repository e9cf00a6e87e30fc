//! Precision of a mean
//!
//! The interval is the usual t-based one, `mu ± t(1-α, n-1) * sd / sqrt(n)`.
//! Because the degrees of freedom move with `n`, the width has no closed-form
//! inverse and the sample size is always found by root search.

use crate::batch::{known_column, run};
use crate::formula::{solve, Interval, WidthFormula};
use crate::types::ConfidenceInterval;
use crate::warning::EstimationWarning;
use precision_core::{
    distributions::students_t, Column, ConfidenceLevel, Error, ExecutionStrategy, Result, Solve,
    SolverConfig, Validator,
};
use serde::Serialize;
use std::fmt;
use tracing::instrument;

/// Description stored on mean results
pub const MEAN_DESCRIPTION: &str = "precision for a mean";

/// t-based width formula for a mean
#[derive(Debug, Clone, Copy)]
pub struct MeanFormula {
    mu: f64,
    sd: f64,
    level: ConfidenceLevel,
}

impl MeanFormula {
    pub fn new(mu: f64, sd: f64, level: ConfidenceLevel) -> Self {
        Self { mu, sd, level }
    }
}

impl WidthFormula for MeanFormula {
    fn interval(&self, n: f64) -> Result<Interval> {
        let t = students_t::critical(self.level, n - 1.0)?;
        Ok(Interval::symmetric(self.mu, t * self.sd / n.sqrt(), None))
    }

    fn min_count(&self) -> f64 {
        2.0
    }
}

/// Result of a mean precision calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeanEstimate {
    pub mu: f64,
    pub sd: f64,
    pub n: f64,
    pub conf_width: f64,
    pub conf_level: f64,
    pub lwr: f64,
    pub upr: f64,
    pub method: &'static str,
    pub warnings: Vec<EstimationWarning>,
}

impl MeanEstimate {
    /// Half of the interval width
    pub fn precision(&self) -> f64 {
        self.conf_width / 2.0
    }

    /// The interval as a standalone value
    pub fn interval(&self) -> ConfidenceInterval {
        ConfidenceInterval::new(self.lwr, self.upr, self.mu, self.conf_level)
    }
}

impl fmt::Display for MeanEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "     {}", self.method)?;
        writeln!(f)?;
        writeln!(
            f,
            "     mu = {}, sd = {}, n = {:.4}, conf_width = {:.4}, conf_level = {}",
            self.mu, self.sd, self.n, self.conf_width, self.conf_level
        )?;
        write!(f, "     lwr = {:.4}, upr = {:.4}", self.lwr, self.upr)
    }
}

/// Builder for a mean precision calculation
///
/// Supply exactly one of the sample size and the interval width.
///
/// # Example
/// ```rust
/// use precision_estimate::MeanPrecision;
///
/// let result = MeanPrecision::new(5.0, 2.5).with_n(20.0).estimate().unwrap();
/// assert!((result.conf_width - 2.34).abs() < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct MeanPrecision {
    mu: f64,
    sd: f64,
    n: Option<f64>,
    conf_width: Option<f64>,
    conf_level: f64,
    solver: SolverConfig,
}

impl MeanPrecision {
    /// Start a calculation for mean `mu` with standard deviation `sd`
    pub fn new(mu: f64, sd: f64) -> Self {
        Self {
            mu,
            sd,
            n: None,
            conf_width: None,
            conf_level: ConfidenceLevel::NINETY_FIVE.value(),
            solver: SolverConfig::default(),
        }
    }

    /// Known sample size; the width will be computed
    pub fn with_n(mut self, n: f64) -> Self {
        self.n = Some(n);
        self
    }

    /// Desired full interval width; the sample size will be computed
    pub fn with_conf_width(mut self, conf_width: f64) -> Self {
        self.conf_width = Some(conf_width);
        self
    }

    /// Set the confidence level
    pub fn with_conf_level(mut self, conf_level: f64) -> Self {
        self.conf_level = conf_level;
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
    #[instrument(level = "debug", skip(self), fields(mu = self.mu, sd = self.sd))]
    pub fn estimate(&self) -> Result<MeanEstimate> {
        estimate_mean(
            self.mu,
            self.sd,
            self.n,
            self.conf_width,
            self.conf_level,
            &self.solver,
        )
    }
}

/// Elementwise mean calculation over vectors of inputs
///
/// Inputs of length one are broadcast; each element gets its own `Result`.
#[derive(Debug, Clone)]
pub struct MeanBatch {
    mu: Vec<f64>,
    sd: Vec<f64>,
    n: Option<Vec<f64>>,
    conf_width: Option<Vec<f64>>,
    conf_level: Vec<f64>,
    solver: SolverConfig,
    strategy: ExecutionStrategy,
}

impl MeanBatch {
    pub fn new(mu: Vec<f64>, sd: Vec<f64>) -> Self {
        Self {
            mu,
            sd,
            n: None,
            conf_width: None,
            conf_level: vec![ConfidenceLevel::NINETY_FIVE.value()],
            solver: SolverConfig::default(),
            strategy: ExecutionStrategy::default(),
        }
    }

    pub fn with_n(mut self, n: Vec<f64>) -> Self {
        self.n = Some(n);
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

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.solver = self.solver.with_tolerance(tolerance);
        self
    }

    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Run the calculation for every element
    #[instrument(level = "debug", skip(self), fields(len = self.mu.len()))]
    pub fn estimate(&self) -> Result<Vec<Result<MeanEstimate>>> {
        let (known, given) =
            known_column("n", self.n.as_deref(), self.conf_width.as_deref())?;
        let columns = [
            Column::new("mu", &self.mu),
            Column::new("sd", &self.sd),
            given,
            Column::new("conf_level", &self.conf_level),
        ];

        run(&columns, self.strategy, |i| {
            let (n, conf_width) = known.split(columns[2].at(i));
            estimate_mean(
                columns[0].at(i),
                columns[1].at(i),
                n,
                conf_width,
                columns[3].at(i),
                &self.solver,
            )
        })
    }
}

pub(crate) fn estimate_mean(
    mu: f64,
    sd: f64,
    n: Option<f64>,
    conf_width: Option<f64>,
    conf_level: f64,
    solver: &SolverConfig,
) -> Result<MeanEstimate> {
    let level = ConfidenceLevel::new(conf_level)?;
    Validator::finite("mu", mu)?;
    Validator::positive("sd", sd)?;
    Validator::positive("tol", solver.tolerance)?;
    let target = Validator::solve_target("n", n, conf_width)?;
    if let Solve::ForWidth { count } = target {
        if count <= 1.0 {
            return Err(Error::InvalidArgument(format!(
                "n = {count} must be greater than 1"
            )));
        }
    }

    let formula = MeanFormula::new(mu, sd, level);
    let (n, interval) = solve(&formula, target, solver)?;

    Ok(MeanEstimate {
        mu,
        sd,
        n,
        conf_width: interval.conf_width(),
        conf_level,
        lwr: interval.lower,
        upr: interval.upper,
        method: MEAN_DESCRIPTION,
        warnings: Vec::new(),
    })
}
