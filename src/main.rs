//! Medir CLI - mixed-precision GEMM benchmark driver
//!
//! One invocation measures one problem size:
//!
//! ```text
//! medir 4096 4096 4096
//! medir 512 512 512 --seed 42 --kernel naive --format json
//! ```
//!
//! Output is the harness report line (`NN m, n, k, candidate GFLOP/s,
//! reference GFLOP/s;`) plus an advisory second line when the relative
//! error exceeds tolerance or is undefined. Fatal errors (invalid
//! dimensions, allocation failure) print a diagnostic to stderr and exit
//! non-zero with no partial report.

use clap::Parser;
use rand::Rng;

use medir::{
    analyze::DEFAULT_TOLERANCE, runner::DEFAULT_TIMED_ITERS, BenchConfig, KernelKind, MedirError,
};

/// Medir - benchmark a reduced-precision GEMM kernel against a
/// full-precision reference.
#[derive(Parser)]
#[command(name = "medir")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Rows of A and C
    #[arg(value_name = "M")]
    m: usize,

    /// Columns of B and C
    #[arg(value_name = "N")]
    n: usize,

    /// Shared inner dimension (columns of A, rows of B)
    #[arg(value_name = "K")]
    k: usize,

    /// Timed kernel iterations (one extra warm-up call is always made)
    #[arg(short, long, default_value_t = DEFAULT_TIMED_ITERS)]
    iters: usize,

    /// Seed for input generation (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Advisory relative-error tolerance
    #[arg(short, long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Candidate kernel implementation
    #[arg(long, value_enum, default_value_t = KernelKind::Blocked)]
    kernel: KernelKind,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    format: String,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run_cli(&cli) {
        eprintln!("medir: {e}");
        std::process::exit(1);
    }
}

fn run_cli(cli: &Cli) -> medir::Result<()> {
    let config = BenchConfig {
        m: cli.m,
        n: cli.n,
        k: cli.k,
        seed: cli.seed.unwrap_or_else(|| rand::thread_rng().gen()),
        timed_iters: cli.iters,
        tolerance: cli.tolerance,
        kernel: cli.kernel,
    };

    // The original harness's alternate configuration ran the candidate in
    // full precision too; that combination is kept behind a build feature.
    #[cfg(feature = "full-precision")]
    let result = medir::run::<f64, f64>(&config)?;
    #[cfg(not(feature = "full-precision"))]
    let result = medir::run::<f32, f64>(&config)?;

    if cli.format == "json" {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| MedirError::Serialization(e.to_string()))?;
        println!("{json}");
    } else {
        println!("{}", result.summary_line());
        if let Some(advisory) = result.advisory_line(config.tolerance) {
            println!("{advisory}");
        }
    }
    Ok(())
}
