//! Elementwise batch processing
//!
//! Vector inputs are paired positionally. Every input must either have the
//! common length or length one, in which case it is broadcast; any other
//! shape is rejected with [`Error::LengthMismatch`] instead of being
//! recycled. Elements are processed independently and results come back in
//! input order.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// How batch elements are executed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStrategy {
    /// One element after another on the calling thread
    #[default]
    Sequential,
    /// Elements spread over the rayon thread pool (falls back to sequential
    /// when the `parallel` feature is disabled)
    Parallel,
}

/// A named elementwise input column
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    name: &'static str,
    values: &'a [f64],
}

impl<'a> Column<'a> {
    /// Wrap a slice of inputs under a name used in error messages
    pub fn new(name: &'static str, values: &'a [f64]) -> Self {
        Self { name, values }
    }

    /// Column name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of values supplied
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the column is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at position `i`, broadcasting a length-one column
    pub fn at(&self, i: usize) -> f64 {
        if self.values.len() == 1 {
            self.values[0]
        } else {
            self.values[i]
        }
    }
}

/// Common length of a set of columns
///
/// Empty columns are rejected; a column of length one broadcasts.
pub fn broadcast_len(columns: &[Column<'_>]) -> Result<usize> {
    if let Some(empty) = columns.iter().find(|c| c.is_empty()) {
        return Err(Error::InvalidArgument(format!("{} is empty", empty.name)));
    }

    let len = columns.iter().map(Column::len).max().unwrap_or(0);
    for column in columns {
        if column.len() != 1 && column.len() != len {
            return Err(Error::LengthMismatch {
                name: column.name,
                expected: len,
                actual: column.len(),
            });
        }
    }
    Ok(len)
}

/// Map `f` over `0..count`, preserving order
pub fn execute_batch<F, R>(strategy: ExecutionStrategy, count: usize, f: F) -> Vec<R>
where
    F: Fn(usize) -> R + Sync + Send,
    R: Send,
{
    match strategy {
        ExecutionStrategy::Sequential => (0..count).map(f).collect(),
        ExecutionStrategy::Parallel => execute_parallel(count, f),
    }
}

#[cfg(feature = "parallel")]
fn execute_parallel<F, R>(count: usize, f: F) -> Vec<R>
where
    F: Fn(usize) -> R + Sync + Send,
    R: Send,
{
    use rayon::prelude::*;

    (0..count).into_par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
fn execute_parallel<F, R>(count: usize, f: F) -> Vec<R>
where
    F: Fn(usize) -> R + Sync + Send,
    R: Send,
{
    (0..count).map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_lengths() {
        let p = [0.2, 0.4];
        let n = [100.0, 200.0];
        let len = broadcast_len(&[Column::new("p", &p), Column::new("n", &n)]).unwrap();
        assert_eq!(len, 2);
    }

    #[test]
    fn test_scalar_broadcast() {
        let p = [0.2];
        let n = [100.0, 200.0, 300.0];
        let cols = [Column::new("p", &p), Column::new("n", &n)];
        assert_eq!(broadcast_len(&cols).unwrap(), 3);
        assert_eq!(cols[0].at(2), 0.2);
        assert_eq!(cols[1].at(2), 300.0);
    }

    #[test]
    fn test_mismatch_is_an_error() {
        let p = [0.2, 0.4];
        let n = [100.0, 200.0, 300.0];
        let err = broadcast_len(&[Column::new("p", &p), Column::new("n", &n)]).unwrap_err();
        assert_eq!(
            err,
            Error::LengthMismatch {
                name: "p",
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_empty_column() {
        let p: [f64; 0] = [];
        let n = [10.0];
        assert!(broadcast_len(&[Column::new("p", &p), Column::new("n", &n)]).is_err());
    }

    #[test]
    fn test_execute_batch_preserves_order() {
        let seq = execute_batch(ExecutionStrategy::Sequential, 100, |i| i * 2);
        let par = execute_batch(ExecutionStrategy::Parallel, 100, |i| i * 2);
        assert_eq!(seq, par);
        assert_eq!(seq[99], 198);
    }
}
