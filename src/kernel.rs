//! GEMM kernels: the candidate capability trait and the reference routine.
//!
//! The harness never hardcodes a kernel. Candidates implement [`Gemm`]
//! ("compute C = A * B for type T, column-major, given leading
//! dimensions") and are chosen through [`KernelKind`] configuration. The
//! trusted reference is the BLAS-shaped [`xgemm`], always invoked by the
//! harness with no transpose, `alpha = 1`, `beta = 0`.
//!
//! Two conforming candidates ship with the crate:
//! - [`NaiveGemm`] — scalar baseline in column-major saxpy order
//! - [`BlockedGemm`] — cache-blocked variant of the same loop nest

#![allow(clippy::too_many_arguments)] // BLAS-shaped signatures

use std::cmp::min;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::matrix::Scalar;

/// Column-major flat index of element `(i, j)` under leading dimension `ld`.
#[inline]
fn at(i: usize, j: usize, ld: usize) -> usize {
    i + j * ld
}

/// Capability interface for candidate kernels: `C = A * B`, column-major,
/// overwrite semantics (C is not read).
///
/// `A` is `m x k` with stride `lda`, `B` is `k x n` with stride `ldb`,
/// `C` is `m x n` with stride `ldc`. Implementations must not have side
/// effects beyond writing `C`; a failure inside a kernel is fatal to the
/// benchmark run.
pub trait Gemm<T: Scalar>: Send + Sync {
    /// Implementation name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Compute `C = A * B`.
    ///
    /// # Panics
    ///
    /// Panics if a slice is too small for the stated dimensions/strides.
    #[allow(clippy::too_many_arguments)]
    fn compute(
        &self,
        m: usize,
        n: usize,
        k: usize,
        a: &[T],
        lda: usize,
        b: &[T],
        ldb: usize,
        c: &mut [T],
        ldc: usize,
    );
}

/// Scalar baseline kernel.
///
/// Column-major saxpy loop order (j, l, i): the inner loop walks one
/// column of A and one column of C with stride 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveGemm;

impl<T: Scalar> Gemm<T> for NaiveGemm {
    fn name(&self) -> &'static str {
        "naive"
    }

    fn compute(
        &self,
        m: usize,
        n: usize,
        k: usize,
        a: &[T],
        lda: usize,
        b: &[T],
        ldb: usize,
        c: &mut [T],
        ldc: usize,
    ) {
        for j in 0..n {
            let c_col = &mut c[j * ldc..j * ldc + m];
            c_col.fill(T::zero());
            for l in 0..k {
                let b_lj = b[at(l, j, ldb)];
                let a_col = &a[l * lda..l * lda + m];
                for i in 0..m {
                    c_col[i] += a_col[i] * b_lj;
                }
            }
        }
    }
}

/// Cache block size along the C-row dimension.
const MC: usize = 64;
/// Cache block size along the shared dimension.
const KC: usize = 128;
/// Cache block size along the C-column dimension.
const NC: usize = 64;

/// Cache-blocked kernel.
///
/// Same arithmetic as [`NaiveGemm`] restructured so each `MC x KC` panel
/// of A is reused across a block of columns before being evicted.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockedGemm;

impl<T: Scalar> Gemm<T> for BlockedGemm {
    fn name(&self) -> &'static str {
        "blocked"
    }

    fn compute(
        &self,
        m: usize,
        n: usize,
        k: usize,
        a: &[T],
        lda: usize,
        b: &[T],
        ldb: usize,
        c: &mut [T],
        ldc: usize,
    ) {
        for j in 0..n {
            c[j * ldc..j * ldc + m].fill(T::zero());
        }
        for ll in (0..k).step_by(KC) {
            let l_end = min(ll + KC, k);
            for jj in (0..n).step_by(NC) {
                let j_end = min(jj + NC, n);
                for ii in (0..m).step_by(MC) {
                    let i_end = min(ii + MC, m);
                    for j in jj..j_end {
                        for l in ll..l_end {
                            let b_lj = b[at(l, j, ldb)];
                            for i in ii..i_end {
                                c[at(i, j, ldc)] += a[at(i, l, lda)] * b_lj;
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Candidate kernel selection, driven by configuration rather than source
/// edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum KernelKind {
    /// Scalar baseline ([`NaiveGemm`]).
    Naive,
    /// Cache-blocked variant ([`BlockedGemm`]).
    Blocked,
}

impl KernelKind {
    /// Instantiate the selected kernel for element type `T`.
    #[must_use]
    pub fn instantiate<T: Scalar>(self) -> Box<dyn Gemm<T>> {
        match self {
            KernelKind::Naive => Box::new(NaiveGemm),
            KernelKind::Blocked => Box::new(BlockedGemm),
        }
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelKind::Naive => write!(f, "naive"),
            KernelKind::Blocked => write!(f, "blocked"),
        }
    }
}

/// Transpose flag for [`xgemm`] operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trans {
    /// Use the operand as stored ("N").
    None,
    /// Use the transposed operand ("T").
    Transpose,
}

/// Reference GEMM: `C = alpha * op(A) * op(B) + beta * C`, column-major.
///
/// `op(A)` is `m x k` and `op(B)` is `k x n` after applying the transpose
/// flags. With `beta = 0`, C is written without being read. This is the
/// trusted full-precision routine the candidate kernels are compared
/// against.
///
/// # Panics
///
/// Panics if a slice is too small for the stated dimensions/strides.
#[allow(clippy::too_many_arguments)]
pub fn xgemm<T: Scalar>(
    transa: Trans,
    transb: Trans,
    m: usize,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &[T],
    ldb: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) {
    let idx_a = |i: usize, l: usize| match transa {
        Trans::None => at(i, l, lda),
        Trans::Transpose => at(l, i, lda),
    };
    let idx_b = |l: usize, j: usize| match transb {
        Trans::None => at(l, j, ldb),
        Trans::Transpose => at(j, l, ldb),
    };
    for j in 0..n {
        for i in 0..m {
            let mut acc = T::zero();
            for l in 0..k {
                acc += a[idx_a(i, l)] * b[idx_b(l, j)];
            }
            let cij = at(i, j, ldc);
            c[cij] = if beta.is_zero() {
                alpha * acc
            } else {
                alpha * acc + beta * c[cij]
            };
        }
    }
}
