//! # Medir
//!
//! Correctness-and-performance benchmarking harness for dense GEMM kernels
//! under mixed precision.
//!
//! Medir (Spanish: "to measure") generates random column-major inputs in a
//! reduced precision, times an interchangeable candidate kernel in that
//! precision, times a trusted reference kernel in full precision, converts
//! between the two representations with separately-accounted timing, and
//! reports throughput (GFLOP/s) next to numerical accuracy — including
//! *where* the worst disagreement occurred, not just how large it was.
//!
//! ## Example
//!
//! ```rust
//! use medir::{run, BenchConfig};
//!
//! let mut config = BenchConfig::new(8, 8, 8);
//! config.seed = 42;
//!
//! // f32 candidate against an f64 reference.
//! let result = run::<f32, f64>(&config).unwrap();
//! assert!(result.candidate_gflops >= 0.0);
//! assert!(result.error.rel_err < 1.0);
//! println!("{}", result.summary_line());
//! ```
//!
//! ## Pipeline
//!
//! One run is a strict sequence: generate reduced inputs, widen them, time
//! the candidate (one discarded warm-up call plus N timed calls), widen
//! the candidate's output, time the reference, analyze the elementwise
//! disagreement. Only matrix generation and precision conversion
//! parallelize, over disjoint column ranges; the pipeline stages
//! themselves never overlap.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
// Clippy allows (MUST come after deny/warn to override them)
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)] // usize -> f64 for FLOP counts
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::float_cmp)] // exact float comparisons are intentional in tests
#![allow(clippy::missing_panics_doc)]

pub mod aligned;
pub mod analyze;
pub mod convert;
pub mod error;
pub mod generate;
pub mod harness;
pub mod kernel;
pub mod matrix;
pub mod runner;

pub use analyze::{compute_error, ErrorReport, DEFAULT_TOLERANCE};
pub use convert::Converter;
pub use error::{MedirError, Result};
pub use harness::{precision_pair, run, BenchConfig, BenchResult};
pub use kernel::{xgemm, BlockedGemm, Gemm, KernelKind, NaiveGemm, Trans};
pub use matrix::{MatrixBuf, Scalar};
pub use runner::{gflops, time_kernel, DEFAULT_TIMED_ITERS};
