//! Criterion micro-benchmarks for the shipped GEMM kernels.
//!
//! Run with `cargo bench`. This complements the harness's own timing
//! (which measures a single problem size end to end) with statistically
//! sampled per-kernel numbers.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use medir::{generate::fill_random, xgemm, BlockedGemm, Gemm, MatrixBuf, NaiveGemm, Trans};

fn bench_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("gemm_f32");

    for &dim in &[64usize, 128, 256] {
        let mut a = MatrixBuf::<f32>::new(dim, dim).unwrap();
        let mut b = MatrixBuf::<f32>::new(dim, dim).unwrap();
        let mut out = MatrixBuf::<f32>::new(dim, dim).unwrap();
        fill_random(&mut a, 1);
        fill_random(&mut b, 2);
        let (lda, ldb, ldc) = (a.ld(), b.ld(), out.ld());

        group.throughput(Throughput::Elements((2 * dim * dim * dim) as u64));

        group.bench_with_input(BenchmarkId::new("naive", dim), &dim, |bench, _| {
            bench.iter(|| {
                NaiveGemm.compute(
                    dim,
                    dim,
                    dim,
                    black_box(a.as_slice()),
                    lda,
                    black_box(b.as_slice()),
                    ldb,
                    out.as_mut_slice(),
                    ldc,
                );
            });
        });

        group.bench_with_input(BenchmarkId::new("blocked", dim), &dim, |bench, _| {
            bench.iter(|| {
                BlockedGemm.compute(
                    dim,
                    dim,
                    dim,
                    black_box(a.as_slice()),
                    lda,
                    black_box(b.as_slice()),
                    ldb,
                    out.as_mut_slice(),
                    ldc,
                );
            });
        });
    }

    group.finish();
}

fn bench_reference(c: &mut Criterion) {
    let mut group = c.benchmark_group("xgemm_f64");

    for &dim in &[64usize, 128] {
        let mut a = MatrixBuf::<f64>::new(dim, dim).unwrap();
        let mut b = MatrixBuf::<f64>::new(dim, dim).unwrap();
        let mut out = MatrixBuf::<f64>::new(dim, dim).unwrap();
        fill_random(&mut a, 3);
        fill_random(&mut b, 4);
        let (lda, ldb, ldc) = (a.ld(), b.ld(), out.ld());

        group.throughput(Throughput::Elements((2 * dim * dim * dim) as u64));

        group.bench_with_input(BenchmarkId::new("nn", dim), &dim, |bench, _| {
            bench.iter(|| {
                xgemm(
                    Trans::None,
                    Trans::None,
                    dim,
                    dim,
                    dim,
                    1.0,
                    black_box(a.as_slice()),
                    lda,
                    black_box(b.as_slice()),
                    ldb,
                    0.0,
                    out.as_mut_slice(),
                    ldc,
                );
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_kernels, bench_reference);
criterion_main!(benches);
