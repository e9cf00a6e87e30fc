//! Non-fatal diagnostics attached to estimation results
//!
//! Warnings never change the returned numbers. Each one is stored on the
//! result it concerns and logged through `tracing` when raised.

use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Why a requested method name could not be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResolutionIssue {
    /// More than one method name was supplied
    MultipleMethods,
    /// The name matched no method, or more than one
    NoMatch,
}

/// A recoverable problem detected while estimating
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EstimationWarning {
    /// The method name was replaced by the statistic's default
    MethodResolution {
        requested: Vec<String>,
        fallback: &'static str,
        issue: ResolutionIssue,
    },
    /// An interval bound lies outside the statistic's natural domain, or the
    /// interval collapsed to a point
    DegenerateInterval { detail: String },
}

impl EstimationWarning {
    pub(crate) fn degenerate(detail: impl Into<String>) -> Self {
        Self::DegenerateInterval {
            detail: detail.into(),
        }
    }

    /// Log the warning
    pub(crate) fn emit(&self) {
        warn!("{}", self);
    }
}

impl fmt::Display for EstimationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MethodResolution {
                requested,
                fallback,
                issue: ResolutionIssue::MultipleMethods,
            } => write!(
                f,
                "more than one method was chosen ({}); '{}' will be used",
                requested.join(", "),
                fallback
            ),
            Self::MethodResolution {
                requested,
                fallback,
                issue: ResolutionIssue::NoMatch,
            } => write!(
                f,
                "method '{}' is not available; '{}' will be used",
                requested.join(", "),
                fallback
            ),
            Self::DegenerateInterval { detail } => f.write_str(detail),
        }
    }
}
