//! Precision of a proportion
//!
//! Methods: Wilson (default), Agresti-Coull (alias `ac`), exact
//! (Clopper-Pearson) and Wald. Only Wald inverts in closed form.
//!
//! Wald and Agresti-Coull bounds can leave [0, 1]. They are reported as
//! computed, together with a warning, and never clamped.

use crate::batch::{known_column, run};
use crate::formula::{solve, Interval, WidthFormula};
use crate::registry::{resolve_method, MethodRegistry, Resolution};
use crate::types::ConfidenceInterval;
use crate::warning::EstimationWarning;
use precision_core::{
    distributions::{beta, normal},
    Column, ConfidenceLevel, ExecutionStrategy, Result, SolverConfig, Validator,
};
use serde::Serialize;
use std::fmt;
use tracing::instrument;

/// Note attached to results whose interval is centred on `padj`
pub const PROPORTION_NOTE: &str =
    "padj is the adjusted proportion, from which the CI is calculated.";

/// Interval methods for a proportion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProportionMethod {
    Wilson,
    AgrestiCoull,
    /// Clopper-Pearson interval from beta quantiles
    Exact,
    Wald,
}

impl MethodRegistry for ProportionMethod {
    const STATISTIC: &'static str = "proportion";
    const DEFAULT: Self = ProportionMethod::Wilson;
    const CHOICES: &'static [(&'static str, Self)] = &[
        ("wilson", ProportionMethod::Wilson),
        ("agresti-coull", ProportionMethod::AgrestiCoull),
        ("exact", ProportionMethod::Exact),
        ("wald", ProportionMethod::Wald),
        ("ac", ProportionMethod::AgrestiCoull),
    ];

    fn name(self) -> &'static str {
        match self {
            ProportionMethod::Wilson => "wilson",
            ProportionMethod::AgrestiCoull => "agresti-coull",
            ProportionMethod::Exact => "exact",
            ProportionMethod::Wald => "wald",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ProportionMethod::Wilson => "Wilson",
            ProportionMethod::AgrestiCoull => "Agresti-Coull",
            ProportionMethod::Exact => "exact",
            ProportionMethod::Wald => "Wald",
        }
    }

    fn adjusts_estimate(self) -> bool {
        matches!(self, ProportionMethod::Wilson | ProportionMethod::AgrestiCoull)
    }
}

/// Width formula for one proportion method
#[derive(Debug, Clone, Copy)]
pub struct ProportionFormula {
    method: ProportionMethod,
    p: f64,
    z: f64,
    tail: f64,
}

impl ProportionFormula {
    pub fn new(method: ProportionMethod, p: f64, level: ConfidenceLevel) -> Result<Self> {
        Ok(Self {
            method,
            p,
            z: normal::critical(level)?,
            tail: level.tail_probability(),
        })
    }
}

impl WidthFormula for ProportionFormula {
    fn interval(&self, n: f64) -> Result<Interval> {
        let (p, z) = (self.p, self.z);
        let z2 = z * z;
        let interval = match self.method {
            ProportionMethod::Wald => {
                Interval::symmetric(p, z * (p * (1.0 - p) / n).sqrt(), None)
            }
            ProportionMethod::AgrestiCoull => {
                let n_tilde = n + z2;
                let padj = (p * n + z2 / 2.0) / n_tilde;
                let half = z * (padj * (1.0 - padj) / n_tilde).sqrt();
                Interval::symmetric(padj, half, Some(padj))
            }
            ProportionMethod::Wilson => {
                let (x, q) = (n * p, n * (1.0 - p));
                let root = z * (x * (1.0 - p) + z2 / 4.0).sqrt();
                let padj = (x + z2 / 2.0) / (n + z2);
                // Rationalised bounds are exactly 0 at p = 0 and 1 at p = 1
                let lwr = x * p / (x + z2 / 2.0 + root);
                let upr = 1.0 - q * (1.0 - p) / (q + z2 / 2.0 + root);
                Interval::adjusted_bounds(padj, root / (n + z2), lwr, upr)
            }
            ProportionMethod::Exact => {
                let x = p * n;
                let lwr = if x == 0.0 {
                    0.0
                } else {
                    beta::quantile(self.tail, x, n - x + 1.0)?
                };
                let upr = if x >= n {
                    1.0
                } else {
                    beta::quantile(1.0 - self.tail, x + 1.0, n - x)?
                };
                Interval::from_bounds(lwr, upr)
            }
        };
        Ok(interval)
    }

    fn count_for_width(&self, conf_width: f64) -> Option<f64> {
        match self.method {
            ProportionMethod::Wald => {
                let half = conf_width / 2.0;
                Some(self.z * self.z * self.p * (1.0 - self.p) / (half * half))
            }
            _ => None,
        }
    }
}

/// Result of a proportion precision calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProportionEstimate {
    pub p: f64,
    /// Adjusted proportion the interval is centred on (Wilson and
    /// Agresti-Coull only)
    pub padj: Option<f64>,
    pub n: f64,
    pub conf_width: f64,
    pub conf_level: f64,
    pub lwr: f64,
    pub upr: f64,
    pub note: Option<&'static str>,
    pub method: String,
    pub resolved_method: ProportionMethod,
    pub warnings: Vec<EstimationWarning>,
}

impl ProportionEstimate {
    /// Half of the interval width
    pub fn precision(&self) -> f64 {
        self.conf_width / 2.0
    }

    /// The interval as a standalone value, centred on `padj` when present
    pub fn interval(&self) -> ConfidenceInterval {
        let centre = self.padj.unwrap_or(self.p);
        ConfidenceInterval::new(self.lwr, self.upr, centre, self.conf_level)
    }
}

impl fmt::Display for ProportionEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "     {}", self.method)?;
        writeln!(f)?;
        write!(f, "     p = {}", self.p)?;
        if let Some(padj) = self.padj {
            write!(f, ", padj = {padj:.4}")?;
        }
        writeln!(
            f,
            ", n = {:.4}, conf_width = {:.4}, conf_level = {}",
            self.n, self.conf_width, self.conf_level
        )?;
        write!(f, "     lwr = {:.4}, upr = {:.4}", self.lwr, self.upr)?;
        if let Some(note) = self.note {
            write!(f, "\n\nNOTE: {note}")?;
        }
        Ok(())
    }
}

/// Builder for a proportion precision calculation
///
/// # Example
/// ```rust
/// use precision_estimate::ProportionPrecision;
///
/// let result = ProportionPrecision::new(0.2).with_n(100.0).estimate().unwrap();
/// assert!(result.padj.unwrap() > 0.2);
/// assert!(result.lwr > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct ProportionPrecision {
    p: f64,
    n: Option<f64>,
    conf_width: Option<f64>,
    conf_level: f64,
    methods: Vec<String>,
    solver: SolverConfig,
}

impl ProportionPrecision {
    /// Start a calculation for proportion `p`
    pub fn new(p: f64) -> Self {
        Self {
            p,
            n: None,
            conf_width: None,
            conf_level: ConfidenceLevel::NINETY_FIVE.value(),
            methods: Vec::new(),
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
    #[instrument(level = "debug", skip(self), fields(p = self.p))]
    pub fn estimate(&self) -> Result<ProportionEstimate> {
        let resolution = resolve_method::<ProportionMethod, _>(&self.methods);
        estimate_proportion(
            self.p,
            self.n,
            self.conf_width,
            self.conf_level,
            &resolution,
            &self.solver,
        )
    }
}

/// Elementwise proportion calculation over vectors of inputs
///
/// # Example
/// ```rust
/// use precision_estimate::ProportionBatch;
///
/// let results = ProportionBatch::new(vec![0.2, 0.4])
///     .with_n(vec![100.0, 200.0])
///     .estimate()
///     .unwrap();
/// assert_eq!(results.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ProportionBatch {
    p: Vec<f64>,
    n: Option<Vec<f64>>,
    conf_width: Option<Vec<f64>>,
    conf_level: Vec<f64>,
    methods: Vec<String>,
    solver: SolverConfig,
    strategy: ExecutionStrategy,
}

impl ProportionBatch {
    pub fn new(p: Vec<f64>) -> Self {
        Self {
            p,
            n: None,
            conf_width: None,
            conf_level: vec![ConfidenceLevel::NINETY_FIVE.value()],
            methods: Vec::new(),
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
    #[instrument(level = "debug", skip(self), fields(len = self.p.len()))]
    pub fn estimate(&self) -> Result<Vec<Result<ProportionEstimate>>> {
        let (known, given) =
            known_column("n", self.n.as_deref(), self.conf_width.as_deref())?;
        let resolution = resolve_method::<ProportionMethod, _>(&self.methods);
        let columns = [
            Column::new("p", &self.p),
            given,
            Column::new("conf_level", &self.conf_level),
        ];

        run(&columns, self.strategy, |i| {
            let (n, conf_width) = known.split(columns[1].at(i));
            estimate_proportion(
                columns[0].at(i),
                n,
                conf_width,
                columns[2].at(i),
                &resolution,
                &self.solver,
            )
        })
    }
}

pub(crate) fn estimate_proportion(
    p: f64,
    n: Option<f64>,
    conf_width: Option<f64>,
    conf_level: f64,
    resolution: &Resolution<ProportionMethod>,
    solver: &SolverConfig,
) -> Result<ProportionEstimate> {
    let level = ConfidenceLevel::new(conf_level)?;
    Validator::proportion("p", p)?;
    Validator::positive("tol", solver.tolerance)?;
    let target = Validator::solve_target("n", n, conf_width)?;

    let method = resolution.method;
    let formula = ProportionFormula::new(method, p, level)?;
    let (n, interval) = solve(&formula, target, solver)?;

    let mut warnings: Vec<EstimationWarning> = resolution.warning.iter().cloned().collect();
    if interval.lower < 0.0 || interval.upper > 1.0 {
        let w = EstimationWarning::degenerate(format!(
            "the confidence interval [{:.4}, {:.4}] extends beyond [0, 1]; \
             consider the wilson or exact method",
            interval.lower, interval.upper
        ));
        w.emit();
        warnings.push(w);
    }

    Ok(ProportionEstimate {
        p,
        padj: interval.adjusted,
        n,
        conf_width: interval.conf_width(),
        conf_level,
        lwr: interval.lower,
        upr: interval.upper,
        note: method.adjusts_estimate().then_some(PROPORTION_NOTE),
        method: method.description(),
        resolved_method: method,
        warnings,
    })
}
