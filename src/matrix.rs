//! Column-major matrix buffers and the closed scalar set.
//!
//! [`MatrixBuf`] is the storage unit every pipeline stage exchanges: a
//! contiguous column-major 2-D array with an explicit leading dimension
//! (stride between columns) that is padded up to the alignment boundary,
//! so the row count and the stride may differ. Padding elements stay zero
//! and are never read by the analyzer.
//!
//! [`Scalar`] fixes the supported element kinds at compile time — the
//! reduced/full precision pairing is a generic substitution over {f32,
//! f64}, not runtime polymorphism.

use std::fmt;
use std::ops::AddAssign;

use num_traits::Float;

use crate::aligned::{AlignedBuf, ALIGNMENT};
use crate::error::{MedirError, Result};

/// Closed set of matrix element types supported by the harness.
///
/// Conversions between members route through f64, the widest kind:
/// widening f32 -> f64 is exact, narrowing f64 -> f32 rounds to nearest
/// per the target type's rules.
pub trait Scalar:
    Float + AddAssign + Send + Sync + fmt::Debug + fmt::Display + 'static
{
    /// Short type name used in diagnostics ("f32", "f64").
    const NAME: &'static str;

    /// Convert from the widest supported kind.
    fn from_f64(v: f64) -> Self;

    /// Convert to the widest supported kind.
    fn to_f64(self) -> f64;
}

impl Scalar for f32 {
    const NAME: &'static str = "f32";

    #[inline]
    #[allow(clippy::cast_possible_truncation)] // rounding narrow is the contract
    fn from_f64(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Scalar for f64 {
    const NAME: &'static str = "f64";

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}

/// Exclusively-owned column-major matrix with aligned, padded storage.
///
/// Element `(i, j)` lives at flat index `i + j * ld`. The leading
/// dimension `ld` is the row count rounded up so each column starts on an
/// [`ALIGNMENT`]-byte boundary.
///
/// # Examples
///
/// ```
/// use medir::MatrixBuf;
///
/// let mut m = MatrixBuf::<f32>::new(3, 2).unwrap();
/// assert_eq!((m.rows(), m.cols()), (3, 2));
/// assert!(m.ld() >= m.rows());
/// m.set(2, 1, 7.0);
/// assert_eq!(m.get(2, 1), 7.0);
/// ```
#[derive(Debug)]
pub struct MatrixBuf<T: Scalar> {
    buf: AlignedBuf<T>,
    rows: usize,
    cols: usize,
    ld: usize,
}

impl<T: Scalar> MatrixBuf<T> {
    /// Allocate a zeroed `rows x cols` matrix.
    ///
    /// # Errors
    ///
    /// Returns [`MedirError::InvalidDimension`] for a zero dimension and
    /// [`MedirError::AllocationFailed`] if the allocator cannot satisfy
    /// the request. Nothing is allocated on the error paths.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 {
            return Err(MedirError::InvalidDimension {
                name: "rows",
                value: rows,
            });
        }
        if cols == 0 {
            return Err(MedirError::InvalidDimension {
                name: "cols",
                value: cols,
            });
        }
        let per_boundary = ALIGNMENT / std::mem::size_of::<T>();
        let ld = rows.div_ceil(per_boundary) * per_boundary;
        let buf = AlignedBuf::new(ld.checked_mul(cols).ok_or(
            MedirError::AllocationFailed {
                bytes: usize::MAX,
                align: ALIGNMENT,
            },
        )?)?;
        Ok(Self {
            buf,
            rows,
            cols,
            ld,
        })
    }

    /// Row count.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column count.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Leading dimension: stride in elements between successive columns.
    #[must_use]
    pub fn ld(&self) -> usize {
        self.ld
    }

    /// Shape as `(rows, cols)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Element at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics on out-of-bounds indices.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> T {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        self.buf.as_slice()[row + col * self.ld]
    }

    /// Set element at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics on out-of-bounds indices.
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        self.buf.as_mut_slice()[row + col * self.ld] = value;
    }

    /// Full padded storage (`ld * cols` elements), column-major.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        self.buf.as_slice()
    }

    /// Mutable full padded storage.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.buf.as_mut_slice()
    }
}
