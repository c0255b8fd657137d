//! Seeded random matrix generation.
//!
//! Inputs are drawn from a small integer range and scaled down
//! (`(0..100) / 1000`), keeping products well conditioned and far from
//! overflow in either precision. Columns are filled in parallel; each
//! column derives its own RNG stream from the base seed, so the produced
//! matrix is identical regardless of worker-thread count.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::matrix::{MatrixBuf, Scalar};

/// Per-column seed mixing constant (splitmix64 golden-ratio increment).
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Fill `mat` with reproducible pseudo-random values in `[0, 0.099]`.
///
/// Deterministic for a given `seed`: the same seed always yields the same
/// matrix. Padding rows beyond `mat.rows()` are left untouched (zero).
///
/// # Examples
///
/// ```
/// use medir::{generate::fill_random, MatrixBuf};
///
/// let mut a = MatrixBuf::<f32>::new(8, 8).unwrap();
/// fill_random(&mut a, 42);
/// assert!(a.as_slice().iter().all(|&x| (0.0..0.1).contains(&x)));
/// ```
pub fn fill_random<T: Scalar>(mat: &mut MatrixBuf<T>, seed: u64) {
    let rows = mat.rows();
    let ld = mat.ld();
    mat.as_mut_slice()
        .par_chunks_mut(ld)
        .enumerate()
        .for_each(|(j, col)| {
            let col_seed = seed ^ (j as u64).wrapping_mul(SEED_STRIDE);
            let mut rng = StdRng::seed_from_u64(col_seed);
            for x in &mut col[..rows] {
                *x = T::from_f64(f64::from(rng.gen_range(0u32..100)) / 1000.0);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_matrix() {
        let mut a = MatrixBuf::<f64>::new(13, 7).unwrap();
        let mut b = MatrixBuf::<f64>::new(13, 7).unwrap();
        fill_random(&mut a, 1234);
        fill_random(&mut b, 1234);
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut a = MatrixBuf::<f64>::new(16, 16).unwrap();
        let mut b = MatrixBuf::<f64>::new(16, 16).unwrap();
        fill_random(&mut a, 1);
        fill_random(&mut b, 2);
        assert_ne!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_values_are_bounded() {
        let mut a = MatrixBuf::<f32>::new(32, 9).unwrap();
        fill_random(&mut a, 7);
        for j in 0..a.cols() {
            for i in 0..a.rows() {
                let v = a.get(i, j);
                assert!((0.0..0.1).contains(&v), "out of range: {v}");
            }
        }
    }

    #[test]
    fn test_padding_rows_stay_zero() {
        // 5 rows of f32 pad up to the 32-byte boundary (8 elements).
        let mut a = MatrixBuf::<f32>::new(5, 3).unwrap();
        fill_random(&mut a, 99);
        let ld = a.ld();
        if ld > a.rows() {
            for j in 0..a.cols() {
                for i in a.rows()..ld {
                    assert_eq!(a.as_slice()[i + j * ld], 0.0);
                }
            }
        }
    }

    #[test]
    fn test_not_all_values_identical() {
        let mut a = MatrixBuf::<f64>::new(16, 4).unwrap();
        fill_random(&mut a, 0);
        let first = a.get(0, 0);
        let distinct = (0..a.rows()).any(|i| (a.get(i, 0) - first).abs() > 0.0);
        assert!(distinct);
    }
}
