//! Shared plumbing for the elementwise batch estimators

use precision_core::{
    broadcast_len, execute_batch, Column, Error, ExecutionStrategy, Result, Validator,
};
use tracing::debug;

/// Which of the two dual quantities the batch supplies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Known {
    Count,
    Width,
}

impl Known {
    /// Split one element's known value into `(count, conf_width)`
    pub(crate) fn split(self, value: f64) -> (Option<f64>, Option<f64>) {
        match self {
            Known::Count => (Some(value), None),
            Known::Width => (None, Some(value)),
        }
    }
}

/// Pick the supplied column out of the count and width inputs
pub(crate) fn known_column<'a>(
    count_name: &'static str,
    count: Option<&'a [f64]>,
    conf_width: Option<&'a [f64]>,
) -> Result<(Known, Column<'a>)> {
    Validator::exactly_one_unknown(count_name, count.is_some(), conf_width.is_some())?;
    match (count, conf_width) {
        (Some(count), _) => Ok((Known::Count, Column::new(count_name, count))),
        (None, width) => {
            let width = width.ok_or_else(|| Error::one_unknown(count_name))?;
            Ok((Known::Width, Column::new("conf_width", width)))
        }
    }
}

/// Broadcast the columns and run `f` once per element
pub(crate) fn run<T, F>(
    columns: &[Column<'_>],
    strategy: ExecutionStrategy,
    f: F,
) -> Result<Vec<Result<T>>>
where
    F: Fn(usize) -> Result<T> + Sync + Send,
    T: Send,
{
    let len = broadcast_len(columns)?;
    debug!(len, ?strategy, "Running batch");
    let results = execute_batch(strategy, len, f);
    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        debug!(failed, len, "Batch finished with failed elements");
    }
    Ok(results)
}
