//! Error types for precision and sample size calculations
//!
//! Provides a unified error type for all precision-stats crates.

use thiserror::Error;

/// Core error type for precision calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Argument outside its admissible domain, or an inconsistent set of arguments
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The target value is not attained anywhere inside the search bracket
    #[error(
        "Root not bracketed: f({lower}) = {f_lower} and f({upper}) = {f_upper} have the same sign"
    )]
    RootNotBracketed {
        lower: f64,
        upper: f64,
        f_lower: f64,
        f_upper: f64,
    },

    /// The root search used up its iteration budget
    #[error("Root search did not converge after {iterations} iterations (last estimate {estimate})")]
    ConvergenceFailure { iterations: usize, estimate: f64 },

    /// Elementwise inputs whose lengths cannot be paired
    #[error("Length mismatch: {name} has length {actual}, expected 1 or {expected}")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Distribution construction or evaluation failed
    #[error("Distribution error: {0}")]
    Distribution(String),

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for a probability-like value outside (0, 1)
    pub fn invalid_probability(name: &str, value: f64) -> Self {
        Self::InvalidArgument(format!("{name} = {value} must be in (0, 1)"))
    }

    /// Create an error for a value that must be finite and strictly positive
    pub fn not_positive(name: &str, value: f64) -> Self {
        Self::InvalidArgument(format!("{name} = {value} must be finite and positive"))
    }

    /// Create an error for a call that does not leave exactly one of the
    /// count and the width unknown
    pub fn one_unknown(count_name: &str) -> Self {
        Self::InvalidArgument(format!(
            "exactly one of {count_name} and conf_width must be supplied"
        ))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(name: &str) -> Self {
        Self::InvalidArgument(format!("{name} contains NaN or infinite values"))
    }

    /// Wrap a statrs error
    pub fn distribution(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Distribution(format!("{context}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidArgument("conf_level must be in (0, 1)".to_string());
        assert_eq!(err.to_string(), "Invalid argument: conf_level must be in (0, 1)");

        let err = Error::ConvergenceFailure {
            iterations: 10,
            estimate: 2.5,
        };
        assert_eq!(
            err.to_string(),
            "Root search did not converge after 10 iterations (last estimate 2.5)"
        );

        let err = Error::LengthMismatch {
            name: "n",
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "Length mismatch: n has length 2, expected 1 or 3");
    }

    #[test]
    fn test_root_not_bracketed_display() {
        let err = Error::RootNotBracketed {
            lower: 1.0,
            upper: 10.0,
            f_lower: 0.5,
            f_upper: 0.25,
        };
        let msg = err.to_string();
        assert!(msg.contains("f(1)"));
        assert!(msg.contains("f(10)"));
        assert!(msg.contains("same sign"));
    }

    #[test]
    fn test_error_helper_functions() {
        let err = Error::invalid_probability("conf_level", 1.5);
        assert_eq!(
            err.to_string(),
            "Invalid argument: conf_level = 1.5 must be in (0, 1)"
        );

        let err = Error::not_positive("sd", -1.0);
        assert_eq!(err.to_string(), "Invalid argument: sd = -1 must be finite and positive");

        let err = Error::non_finite("p");
        assert_eq!(err.to_string(), "Invalid argument: p contains NaN or infinite values");

        let err = Error::distribution("Beta(0, 1)", "shape must be positive");
        assert_eq!(
            err.to_string(),
            "Distribution error: Beta(0, 1): shape must be positive"
        );
    }

    #[test]
    fn test_error_patterns() {
        fn validate_probability(p: f64) -> Result<()> {
            if !(p > 0.0 && p < 1.0) {
                return Err(Error::invalid_probability("p", p));
            }
            Ok(())
        }

        assert!(validate_probability(0.5).is_ok());
        assert!(validate_probability(1.0).is_err());
        assert!(validate_probability(f64::NAN).is_err());
    }
}
