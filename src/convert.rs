//! Precision conversion with isolated timing.
//!
//! The converter copies a matrix between the reduced and full
//! representations and charges the elapsed wall-clock time of each
//! fork-join copy to its own accumulator. Conversion cost is deliberately
//! reported separately from kernel time, so the overhead of
//! reduced-precision round-tripping stays visible next to the kernel's
//! own speed.

use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::error::{MedirError, Result};
use crate::matrix::{MatrixBuf, Scalar};

/// Element-wise precision converter with a running "conversion" clock.
///
/// # Examples
///
/// ```
/// use medir::{convert::Converter, generate::fill_random, MatrixBuf};
///
/// let mut lo = MatrixBuf::<f32>::new(4, 4).unwrap();
/// fill_random(&mut lo, 9);
/// let mut hi = MatrixBuf::<f64>::new(4, 4).unwrap();
///
/// let mut conv = Converter::new();
/// conv.widen(&lo, &mut hi).unwrap();
/// assert_eq!(hi.get(2, 3), f64::from(lo.get(2, 3)));
/// assert!(conv.elapsed_secs() >= 0.0);
/// ```
#[derive(Debug, Default)]
pub struct Converter {
    elapsed: Duration,
}

impl Converter {
    /// New converter with a zeroed accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `src` into `dst`, widening each element.
    ///
    /// Exact whenever the destination kind strictly dominates the source
    /// (f32 -> f64).
    ///
    /// # Errors
    ///
    /// Returns [`MedirError::ShapeMismatch`] when the two buffers do not
    /// have identical row/column dimensions.
    pub fn widen<L: Scalar, H: Scalar>(
        &mut self,
        src: &MatrixBuf<L>,
        dst: &mut MatrixBuf<H>,
    ) -> Result<()> {
        self.transfer(src, dst)
    }

    /// Copy `src` into `dst`, narrowing each element.
    ///
    /// Rounds to nearest per the destination type's conversion rules
    /// (f64 -> f32).
    ///
    /// # Errors
    ///
    /// Returns [`MedirError::ShapeMismatch`] when the two buffers do not
    /// have identical row/column dimensions.
    pub fn narrow<H: Scalar, L: Scalar>(
        &mut self,
        src: &MatrixBuf<H>,
        dst: &mut MatrixBuf<L>,
    ) -> Result<()> {
        self.transfer(src, dst)
    }

    /// Total wall-clock seconds spent converting so far.
    ///
    /// Read once at report time; includes thread-pool dispatch overhead
    /// because the span wraps the whole fork-join region.
    #[must_use]
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    fn transfer<S: Scalar, D: Scalar>(
        &mut self,
        src: &MatrixBuf<S>,
        dst: &mut MatrixBuf<D>,
    ) -> Result<()> {
        if src.shape() != dst.shape() {
            let (sr, sc) = src.shape();
            let (dr, dc) = dst.shape();
            return Err(MedirError::ShapeMismatch {
                expected: format!("{sr}x{sc}"),
                actual: format!("{dr}x{dc}"),
            });
        }
        let rows = src.rows();
        let src_ld = src.ld();
        let dst_ld = dst.ld();

        let start = Instant::now();
        dst.as_mut_slice()
            .par_chunks_mut(dst_ld)
            .zip(src.as_slice().par_chunks(src_ld))
            .for_each(|(d, s)| {
                for i in 0..rows {
                    d[i] = D::from_f64(s[i].to_f64());
                }
            });
        self.elapsed += start.elapsed();
        Ok(())
    }
}
