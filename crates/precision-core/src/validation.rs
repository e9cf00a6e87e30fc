//! Input validation and solve-direction selection
//!
//! All checks are pure and run before any numeric work. Validation stops at
//! the first violation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Which of the two dual quantities a call solves for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Solve {
    /// The count is known; compute the interval width
    ForWidth { count: f64 },
    /// The full interval width is known; compute the count
    ForCount { conf_width: f64 },
}

/// Validation utility for estimation inputs
pub struct Validator;

impl Validator {
    /// Require a probability-like value in the open interval (0, 1)
    pub fn probability(name: &str, value: f64) -> Result<()> {
        if value > 0.0 && value < 1.0 {
            Ok(())
        } else {
            Err(Error::invalid_probability(name, value))
        }
    }

    /// Require a proportion in the closed interval [0, 1]
    pub fn proportion(name: &str, value: f64) -> Result<()> {
        if (0.0..=1.0).contains(&value) {
            Ok(())
        } else {
            Err(Error::InvalidArgument(format!(
                "{name} = {value} must be in [0, 1]"
            )))
        }
    }

    /// Require a finite, strictly positive value
    pub fn positive(name: &str, value: f64) -> Result<()> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(Error::not_positive(name, value))
        }
    }

    /// Require a finite, non-negative value
    pub fn non_negative(name: &str, value: f64) -> Result<()> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(Error::InvalidArgument(format!(
                "{name} = {value} must be finite and non-negative"
            )))
        }
    }

    /// Require a finite value
    pub fn finite(name: &str, value: f64) -> Result<()> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(Error::non_finite(name))
        }
    }

    /// Require exactly one of the count and the width to be unset
    pub fn exactly_one_unknown(
        count_name: &str,
        count_given: bool,
        width_given: bool,
    ) -> Result<()> {
        match (count_given, width_given) {
            (true, false) | (false, true) => Ok(()),
            _ => Err(Error::one_unknown(count_name)),
        }
    }

    /// Decide the solve direction from the optional count and width
    pub fn solve_target(
        count_name: &str,
        count: Option<f64>,
        conf_width: Option<f64>,
    ) -> Result<Solve> {
        Self::exactly_one_unknown(count_name, count.is_some(), conf_width.is_some())?;
        match (count, conf_width) {
            (Some(count), _) => {
                Self::positive(count_name, count)?;
                Ok(Solve::ForWidth { count })
            }
            (None, conf_width) => {
                let conf_width = conf_width.ok_or_else(|| Error::one_unknown(count_name))?;
                Self::positive("conf_width", conf_width)?;
                Ok(Solve::ForCount { conf_width })
            }
        }
    }
}
