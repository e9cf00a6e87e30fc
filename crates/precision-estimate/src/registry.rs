//! Method registry and name resolution
//!
//! Each statistic has a fixed, ordered set of method names and a default.
//! Resolution is case-sensitive: an exact name wins, otherwise a prefix that
//! selects a single method. Anything else falls back to the default with a
//! warning; resolution never fails.

use crate::warning::{EstimationWarning, ResolutionIssue};
use std::fmt;
use tracing::debug;

/// A family of interchangeable interval formulas for one statistic
pub trait MethodRegistry: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Statistic the methods belong to, used in descriptions
    const STATISTIC: &'static str;

    /// Method used when none (or an unusable name) is given
    const DEFAULT: Self;

    /// Accepted names in preference order; several names may map to one method
    const CHOICES: &'static [(&'static str, Self)];

    /// Canonical name of the method
    fn name(self) -> &'static str;

    /// Human-readable label used in result descriptions
    fn label(self) -> &'static str;

    /// Whether the method re-centres the interval on an adjusted estimate
    fn adjusts_estimate(self) -> bool;

    /// Description stored on results, e.g.
    /// `precision for a proportion with Wilson confidence interval`
    fn description(self) -> String {
        format!(
            "precision for a {} with {} confidence interval",
            Self::STATISTIC,
            self.label()
        )
    }
}

/// Outcome of resolving user-supplied method names
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<M> {
    pub method: M,
    pub warning: Option<EstimationWarning>,
}

fn match_one<M: MethodRegistry>(requested: &str) -> Option<M> {
    if let Some((_, method)) = M::CHOICES.iter().find(|(name, _)| *name == requested) {
        return Some(*method);
    }

    let mut matched: Option<M> = None;
    for (name, method) in M::CHOICES {
        if name.starts_with(requested) {
            match matched {
                Some(existing) if existing != *method => return None,
                _ => matched = Some(*method),
            }
        }
    }
    matched
}

/// Resolve the requested method names against the registry of `M`
///
/// No names selects the default silently.
pub fn resolve_method<M, S>(requested: &[S]) -> Resolution<M>
where
    M: MethodRegistry,
    S: AsRef<str>,
{
    let fallback = |issue| {
        let warning = EstimationWarning::MethodResolution {
            requested: requested.iter().map(|s| s.as_ref().to_string()).collect(),
            fallback: M::DEFAULT.name(),
            issue,
        };
        warning.emit();
        Resolution {
            method: M::DEFAULT,
            warning: Some(warning),
        }
    };

    match requested {
        [] => Resolution {
            method: M::DEFAULT,
            warning: None,
        },
        [single] => match match_one::<M>(single.as_ref()) {
            Some(method) => {
                debug!(statistic = M::STATISTIC, method = method.name(), "Resolved method");
                Resolution {
                    method,
                    warning: None,
                }
            }
            None => fallback(ResolutionIssue::NoMatch),
        },
        _ => fallback(ResolutionIssue::MultipleMethods),
    }
}
