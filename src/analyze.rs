//! Error analysis between a candidate result and its ground truth.
//!
//! Compares two equally-shaped matrices and reports the Euclidean norm of
//! the difference, that norm relative to the ground truth's own norm, and
//! the coordinate of the single worst-offending element. Accumulation is
//! always performed in f64, the widest supported kind, regardless of the
//! buffers' element type.

use serde::{Deserialize, Serialize};

use crate::error::{MedirError, Result};
use crate::matrix::{MatrixBuf, Scalar};

/// Default advisory relative-error tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-13;

/// Immutable error statistics for one benchmark run.
///
/// `rel_err` is NaN when the goal matrix has zero Euclidean norm — the
/// relative error is undefined in that case and is reported as such, never
/// as a silently finite number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Euclidean norm of the elementwise difference.
    pub abs_err: f64,
    /// `abs_err` normalized by the goal's Euclidean norm; NaN if undefined.
    pub rel_err: f64,
    /// Largest elementwise absolute difference.
    pub max_err: f64,
    /// `(row, col)` of the first maximum in column-major order, or `None`
    /// when no element differs.
    pub max_location: Option<(usize, usize)>,
}

impl ErrorReport {
    /// Whether the relative error is undefined (zero-norm goal matrix).
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.rel_err.is_nan()
    }

    /// Whether the relative error exceeds `tolerance`.
    ///
    /// Advisory only — the orchestrator reports it and still completes the
    /// run. False for a degenerate (NaN) relative error; degeneracy is
    /// reported separately.
    #[must_use]
    pub fn exceeds(&self, tolerance: f64) -> bool {
        self.rel_err > tolerance
    }
}

/// Compare `test` against the ground-truth `goal`.
///
/// Traversal is column-major (outer loop over columns, inner over rows);
/// ties for the maximum absolute difference keep the first element
/// encountered. The two buffers may carry different leading dimensions.
///
/// # Errors
///
/// Returns [`MedirError::ShapeMismatch`] when the buffers do not share
/// identical row/column dimensions.
pub fn compute_error<T: Scalar>(
    test: &MatrixBuf<T>,
    goal: &MatrixBuf<T>,
) -> Result<ErrorReport> {
    if test.shape() != goal.shape() {
        let (tr, tc) = test.shape();
        let (gr, gc) = goal.shape();
        return Err(MedirError::ShapeMismatch {
            expected: format!("{gr}x{gc}"),
            actual: format!("{tr}x{tc}"),
        });
    }
    let (m, n) = test.shape();

    let mut diff_sq = 0.0f64;
    let mut goal_sq = 0.0f64;
    let mut max_err = 0.0f64;
    let mut max_location = None;

    for j in 0..n {
        for i in 0..m {
            let t = test.get(i, j).to_f64();
            let g = goal.get(i, j).to_f64();
            let err = (t - g).abs();
            if err > max_err {
                max_err = err;
                max_location = Some((i, j));
            }
            diff_sq += err * err;
            goal_sq += g * g;
        }
    }

    let abs_err = diff_sq.sqrt();
    let rel_err = if goal_sq == 0.0 {
        f64::NAN
    } else {
        abs_err / goal_sq.sqrt()
    };

    Ok(ErrorReport {
        abs_err,
        rel_err,
        max_err,
        max_location,
    })
}
