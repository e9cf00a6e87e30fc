//! Quantile functions backed by `statrs`
//!
//! Normal and Student-t quantiles come straight from `statrs`. Gamma and
//! beta quantiles are computed by inverting the `statrs` CDFs with
//! [`brent`](crate::root::brent), which keeps their accuracy independent of
//! the generic inverse the library falls back to for those families.

/// Distribution-related mathematical functions
pub mod distributions {
    use crate::root::{brent, SolverConfig};
    use crate::{ConfidenceLevel, Error, Result};

    const QUANTILE_TOLERANCE: f64 = 1e-13;
    const QUANTILE_MAX_ITERATIONS: usize = 500;

    fn check_probability(p: f64) -> Result<()> {
        if p > 0.0 && p < 1.0 {
            Ok(())
        } else {
            Err(Error::invalid_probability("p", p))
        }
    }

    /// Standard normal distribution utilities
    pub mod normal {
        use super::*;
        use statrs::distribution::{ContinuousCDF, Normal};

        /// Quantile function of the standard normal distribution
        pub fn quantile(p: f64) -> Result<f64> {
            check_probability(p)?;
            let normal =
                Normal::new(0.0, 1.0).map_err(|e| Error::distribution("Normal(0, 1)", e))?;
            Ok(normal.inverse_cdf(p))
        }

        /// Two-sided critical value `z` for the given confidence level
        pub fn critical(level: ConfidenceLevel) -> Result<f64> {
            quantile(1.0 - level.tail_probability())
        }

    }

    /// Student's t distribution utilities
    pub mod students_t {
        use super::*;
        use statrs::distribution::{ContinuousCDF, StudentsT};

        /// Quantile function of the standard t distribution with `df` degrees of freedom
        pub fn quantile(p: f64, df: f64) -> Result<f64> {
            check_probability(p)?;
            let t = StudentsT::new(0.0, 1.0, df)
                .map_err(|e| Error::distribution(&format!("StudentsT(df = {df})"), e))?;
            Ok(t.inverse_cdf(p))
        }

        /// Two-sided critical value for the given confidence level
        pub fn critical(level: ConfidenceLevel, df: f64) -> Result<f64> {
            quantile(1.0 - level.tail_probability(), df)
        }

    }

    /// Gamma distribution (unit rate) utilities
    pub mod gamma {
        use super::*;
        use statrs::distribution::{ContinuousCDF, Gamma};

        /// Quantile function of the Gamma(`shape`, 1) distribution
        ///
        /// A shape of zero is the point mass at zero, so its quantile is 0.
        pub fn quantile(p: f64, shape: f64) -> Result<f64> {
            check_probability(p)?;
            if shape == 0.0 {
                return Ok(0.0);
            }
            let dist = Gamma::new(shape, 1.0)
                .map_err(|e| Error::distribution(&format!("Gamma(shape = {shape})"), e))?;

            // Grow the upper end until it covers p
            let mut upper = shape.max(1.0) * 2.0;
            while dist.cdf(upper) < p {
                upper *= 2.0;
                if !upper.is_finite() {
                    return Err(Error::Computation(format!(
                        "gamma quantile bracket overflow for shape {shape}"
                    )));
                }
            }

            let config = SolverConfig::default()
                .with_bracket(0.0, upper)
                .with_tolerance(QUANTILE_TOLERANCE)
                .with_max_iterations(QUANTILE_MAX_ITERATIONS);
            brent(|x| Ok(dist.cdf(x) - p), &config).map(|r| r.root)
        }

        #[cfg(test)]
        mod tests {
            use super::*;
            use approx::assert_abs_diff_eq;

            #[test]
            fn test_gamma_quantile() {
                // Exponential(1): quantile is -ln(1 - p)
                assert_abs_diff_eq!(
                    quantile(0.5, 1.0).unwrap(),
                    std::f64::consts::LN_2,
                    epsilon = 1e-9
                );
                // Reference values for the Poisson exact interval with x = 20
                assert_abs_diff_eq!(quantile(0.025, 20.0).unwrap(), 12.21652, epsilon = 1e-4);
                assert_abs_diff_eq!(quantile(0.975, 21.0).unwrap(), 30.88838, epsilon = 1e-4);
            }

            #[test]
            fn test_zero_shape() {
                assert_eq!(quantile(0.025, 0.0).unwrap(), 0.0);
            }
        }
    }

    /// Beta distribution utilities
    pub mod beta {
        use super::*;
        use statrs::distribution::{Beta, ContinuousCDF};

        /// Quantile function of the Beta(`a`, `b`) distribution
        ///
        /// `a == 0` is the point mass at 0 and `b == 0` the point mass at 1.
        pub fn quantile(p: f64, a: f64, b: f64) -> Result<f64> {
            check_probability(p)?;
            if a == 0.0 {
                return Ok(0.0);
            }
            if b == 0.0 {
                return Ok(1.0);
            }
            let dist = Beta::new(a, b)
                .map_err(|e| Error::distribution(&format!("Beta({a}, {b})"), e))?;

            let config = SolverConfig::default()
                .with_bracket(0.0, 1.0)
                .with_tolerance(QUANTILE_TOLERANCE)
                .with_max_iterations(QUANTILE_MAX_ITERATIONS);
            brent(|x| Ok(dist.cdf(x) - p), &config).map(|r| r.root)
        }

    }
}
