//! Benchmark orchestration: one problem size in, one result record out.
//!
//! [`run`] wires the pipeline together in strict sequence — generate
//! reduced-precision inputs, widen them, time the candidate kernel in
//! reduced precision, widen its output, time the reference kernel in full
//! precision, analyze the disagreement — and owns every buffer and timing
//! accumulator for the duration. Buffers are released on every exit path;
//! a validation or allocation failure aborts before any kernel is invoked.

use serde::{Deserialize, Serialize};

use crate::analyze::{compute_error, ErrorReport, DEFAULT_TOLERANCE};
use crate::convert::Converter;
use crate::error::{MedirError, Result};
use crate::generate::fill_random;
use crate::kernel::{xgemm, KernelKind, Trans};
use crate::matrix::{MatrixBuf, Scalar};
use crate::runner::{gflops, time_kernel, DEFAULT_TIMED_ITERS};

/// Configuration for one benchmark run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Rows of A and C.
    pub m: usize,
    /// Columns of B and C.
    pub n: usize,
    /// Shared inner dimension (columns of A, rows of B).
    pub k: usize,
    /// Seed for input generation.
    pub seed: u64,
    /// Timed kernel iterations per phase (one extra warm-up call each).
    pub timed_iters: usize,
    /// Advisory relative-error tolerance.
    pub tolerance: f64,
    /// Candidate kernel selection.
    pub kernel: KernelKind,
}

impl BenchConfig {
    /// Config for an `m x n x k` problem with default seed, iteration
    /// count, tolerance, and kernel.
    #[must_use]
    pub fn new(m: usize, n: usize, k: usize) -> Self {
        Self {
            m,
            n,
            k,
            seed: 0,
            timed_iters: DEFAULT_TIMED_ITERS,
            tolerance: DEFAULT_TOLERANCE,
            kernel: KernelKind::Blocked,
        }
    }

    /// Reject non-positive dimensions and iteration counts.
    ///
    /// Runs before any allocation, closing the unvalidated-input gap of
    /// the original harness.
    ///
    /// # Errors
    ///
    /// Returns [`MedirError::InvalidDimension`] naming the first offending
    /// parameter.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("m", self.m),
            ("n", self.n),
            ("k", self.k),
            ("iters", self.timed_iters),
        ] {
            if value == 0 {
                return Err(MedirError::InvalidDimension { name, value });
            }
        }
        Ok(())
    }
}

/// Immutable record produced once at the end of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchResult {
    /// Rows of A and C.
    pub m: usize,
    /// Columns of B and C.
    pub n: usize,
    /// Shared inner dimension.
    pub k: usize,
    /// Candidate kernel throughput in GFLOP/s.
    pub candidate_gflops: f64,
    /// Reference kernel throughput in GFLOP/s.
    pub reference_gflops: f64,
    /// Averaged per-call candidate time in seconds.
    pub candidate_avg_secs: f64,
    /// Averaged per-call reference time in seconds.
    pub reference_avg_secs: f64,
    /// Accumulated precision-conversion time in seconds, kept separate
    /// from kernel timing.
    pub conversion_secs: f64,
    /// Error statistics comparing candidate output to the reference.
    pub error: ErrorReport,
}

impl BenchResult {
    /// The one-line report: `NN m, n, k, candidate GFLOP/s, reference
    /// GFLOP/s;`.
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "NN {:5}, {:5}, {:5}, {:8.2}, {:8.2};",
            self.m, self.n, self.k, self.candidate_gflops, self.reference_gflops
        )
    }

    /// The advisory second line, present when the relative error exceeds
    /// `tolerance` or is undefined. `None` means the run was within
    /// tolerance and nothing extra is printed.
    #[must_use]
    pub fn advisory_line(&self, tolerance: f64) -> Option<String> {
        if self.error.is_degenerate() {
            return Some(format!(
                "rel error undefined (zero reference norm), abs error {:.6e}, max error {:.6e}",
                self.error.abs_err, self.error.max_err
            ));
        }
        if self.error.exceeds(tolerance) {
            let (i, j) = self.error.max_location.unwrap_or((0, 0));
            return Some(format!(
                "rel error {:.6e}, abs error {:.6e}, max error {:.6e} at ({i} {j})",
                self.error.rel_err, self.error.abs_err, self.error.max_err
            ));
        }
        None
    }
}

/// Execute one benchmark run: `L` is the candidate's reduced precision,
/// `H` the reference's full precision.
///
/// Stages run strictly sequentially; only the generator and converter
/// parallelize internally over disjoint element ranges. All buffers are
/// allocated up front and released by RAII whichever way the function
/// exits.
///
/// # Errors
///
/// Returns [`MedirError::InvalidDimension`] for a zero dimension or
/// iteration count and [`MedirError::AllocationFailed`] when a buffer
/// cannot be allocated — both before any kernel has run. Tolerance
/// violations are not errors; they travel in the result's [`ErrorReport`].
pub fn run<L: Scalar, H: Scalar>(config: &BenchConfig) -> Result<BenchResult> {
    config.validate()?;
    let (m, n, k) = (config.m, config.n, config.k);

    // INIT: every buffer for the run, before any compute.
    let mut a_lo = MatrixBuf::<L>::new(m, k)?;
    let mut b_lo = MatrixBuf::<L>::new(k, n)?;
    let mut c_lo = MatrixBuf::<L>::new(m, n)?;
    let mut a_hi = MatrixBuf::<H>::new(m, k)?;
    let mut b_hi = MatrixBuf::<H>::new(k, n)?;
    let mut c_hi = MatrixBuf::<H>::new(m, n)?;
    let mut c_ref = MatrixBuf::<H>::new(m, n)?;

    // GENERATE reduced-precision inputs.
    fill_random(&mut a_lo, config.seed);
    fill_random(&mut b_lo, config.seed.wrapping_add(1));

    // CONVERT_TO_FULL(inputs).
    let mut converter = Converter::new();
    converter.widen(&a_lo, &mut a_hi)?;
    converter.widen(&b_lo, &mut b_hi)?;

    // RUN_CANDIDATE in reduced precision.
    let kernel = config.kernel.instantiate::<L>();
    let (lda, ldb, ldc) = (a_lo.ld(), b_lo.ld(), c_lo.ld());
    let candidate_avg_secs = time_kernel(config.timed_iters, || {
        kernel.compute(
            m,
            n,
            k,
            a_lo.as_slice(),
            lda,
            b_lo.as_slice(),
            ldb,
            c_lo.as_mut_slice(),
            ldc,
        );
    });

    // CONVERT_TO_FULL(candidate output).
    converter.widen(&c_lo, &mut c_hi)?;

    // RUN_REFERENCE in full precision: C_ref = 1.0 * A * B + 0.0 * C_ref.
    let (lda_h, ldb_h, ldr) = (a_hi.ld(), b_hi.ld(), c_ref.ld());
    let reference_avg_secs = time_kernel(config.timed_iters, || {
        xgemm(
            Trans::None,
            Trans::None,
            m,
            n,
            k,
            H::one(),
            a_hi.as_slice(),
            lda_h,
            b_hi.as_slice(),
            ldb_h,
            H::zero(),
            c_ref.as_mut_slice(),
            ldr,
        );
    });

    // ANALYZE_ERROR against the full-precision ground truth.
    let error = compute_error(&c_hi, &c_ref)?;

    Ok(BenchResult {
        m,
        n,
        k,
        candidate_gflops: gflops(m, n, k, candidate_avg_secs),
        reference_gflops: gflops(m, n, k, reference_avg_secs),
        candidate_avg_secs,
        reference_avg_secs,
        conversion_secs: converter.elapsed_secs(),
        error,
    })
}

/// Precision names for the active build, as a `(reduced, full)` pair.
#[must_use]
pub fn precision_pair<L: Scalar, H: Scalar>() -> (&'static str, &'static str) {
    (L::NAME, H::NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_zero_dimensions() {
        for (m, n, k) in [(0, 4, 4), (4, 0, 4), (4, 4, 0)] {
            let config = BenchConfig::new(m, n, k);
            assert!(matches!(
                config.validate().unwrap_err(),
                MedirError::InvalidDimension { .. }
            ));
        }
    }

    #[test]
    fn test_validate_rejects_zero_iters() {
        let mut config = BenchConfig::new(4, 4, 4);
        config.timed_iters = 0;
        assert!(matches!(
            config.validate().unwrap_err(),
            MedirError::InvalidDimension { name: "iters", .. }
        ));
    }

    #[test]
    fn test_run_rejects_invalid_config() {
        let config = BenchConfig::new(0, 4, 4);
        assert!(run::<f32, f64>(&config).is_err());
    }

    #[test]
    fn test_run_small_mixed_precision() {
        let mut config = BenchConfig::new(8, 8, 8);
        config.seed = 42;
        let result = run::<f32, f64>(&config).unwrap();
        assert_eq!((result.m, result.n, result.k), (8, 8, 8));
        assert!(result.candidate_gflops >= 0.0 && result.candidate_gflops.is_finite());
        assert!(result.reference_gflops >= 0.0 && result.reference_gflops.is_finite());
        assert!(result.conversion_secs >= 0.0 && result.conversion_secs.is_finite());
        // Random inputs in [0, 0.1): well conditioned, small relative error.
        assert!(result.error.rel_err >= 0.0 && result.error.rel_err < 1.0);
    }

    #[test]
    fn test_run_uniform_precision_is_tight() {
        // f64 candidate vs f64 reference: same arithmetic reassociated,
        // error well under tolerance.
        let mut config = BenchConfig::new(6, 5, 7);
        config.seed = 7;
        config.kernel = KernelKind::Naive;
        let result = run::<f64, f64>(&config).unwrap();
        assert!(!result.error.exceeds(config.tolerance));
        assert!(result.advisory_line(config.tolerance).is_none());
    }

    #[test]
    fn test_error_is_deterministic_for_seed() {
        let mut config = BenchConfig::new(8, 8, 8);
        config.seed = 1234;
        let r1 = run::<f32, f64>(&config).unwrap();
        let r2 = run::<f32, f64>(&config).unwrap();
        assert_eq!(r1.error.abs_err, r2.error.abs_err);
        assert_eq!(r1.error.rel_err, r2.error.rel_err);
        assert_eq!(r1.error.max_location, r2.error.max_location);
    }

    #[test]
    fn test_summary_line_format() {
        let config = BenchConfig::new(4, 4, 4);
        let result = run::<f32, f64>(&config).unwrap();
        let line = result.summary_line();
        assert!(line.starts_with("NN "));
        assert!(line.ends_with(';'));
        assert_eq!(line.matches(',').count(), 4);
    }

    #[test]
    fn test_advisory_line_when_tolerance_exceeded() {
        let mut config = BenchConfig::new(16, 16, 16);
        config.seed = 99;
        let result = run::<f32, f64>(&config).unwrap();
        // f32 accumulation against an f64 reference sits far above 1e-13
        // but a forced zero tolerance must always trip the advisory.
        let line = result.advisory_line(0.0).unwrap();
        assert!(line.starts_with("rel error"));
        assert!(line.contains("abs error"));
        assert!(line.contains(" at ("));
    }

    #[test]
    fn test_precision_pair_names() {
        assert_eq!(precision_pair::<f32, f64>(), ("f32", "f64"));
        assert_eq!(precision_pair::<f64, f64>(), ("f64", "f64"));
    }

    #[test]
    fn test_result_serializes() {
        let config = BenchConfig::new(4, 4, 4);
        let result = run::<f32, f64>(&config).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("candidate_gflops"));
        assert!(json.contains("abs_err"));
    }
}
