//! Timed repeated kernel invocation.
//!
//! A measurement is `timed_iters + 1` calls: the first call warms caches,
//! TLBs, and any lazy kernel setup and is discarded; the remaining calls
//! are timed as a single wall-clock span divided by `timed_iters`. The
//! runner itself never parallelizes — whatever happens inside the callable
//! is opaque to it, and a hung kernel hangs the benchmark.

#![allow(clippy::cast_precision_loss)] // usize -> f64 for FLOP counts

use std::time::Instant;

/// Default number of timed iterations (one extra warm-up call is always
/// made on top).
pub const DEFAULT_TIMED_ITERS: usize = 3;

/// FLOPs per GFLOP, matching the harness's 2^30 convention.
const FLOPS_PER_GFLOP: f64 = 1_073_741_824.0;

/// Invoke `call` once as a discarded warm-up, then `timed_iters` more
/// times, returning the average wall-clock seconds per timed call.
///
/// `timed_iters` must be at least 1 (the orchestrator validates this
/// before any kernel runs). Kernel failures are not caught: a panic in
/// `call` aborts the measurement.
///
/// # Examples
///
/// ```
/// let mut calls = 0u64;
/// let avg = medir::runner::time_kernel(3, || calls += 1);
/// assert_eq!(calls, 4); // warm-up + 3 timed
/// assert!(avg >= 0.0 && avg.is_finite());
/// ```
pub fn time_kernel<F: FnMut()>(timed_iters: usize, mut call: F) -> f64 {
    call(); // warm-up, excluded from the span

    let start = Instant::now();
    for _ in 0..timed_iters {
        call();
    }
    start.elapsed().as_secs_f64() / timed_iters as f64
}

/// Throughput in GFLOP/s for one `m x n x k` GEMM at the given average
/// per-call time.
///
/// Uses the standard convention that one fused multiply-add over the
/// shared dimension counts as two floating-point operations, i.e.
/// `2 * m * n * k` FLOPs per call. A non-positive time yields 0.0 rather
/// than an infinity.
#[must_use]
pub fn gflops(m: usize, n: usize, k: usize, avg_secs: f64) -> f64 {
    if avg_secs <= 0.0 {
        return 0.0;
    }
    (2 * m * n * k) as f64 / FLOPS_PER_GFLOP / avg_secs
}
