// ─────────────────────────────────────────────────────────────────────
// PUMA Kernel - Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for the hot paths of the convergence loop:
//!   - T-function (single and pair forms)
//!   - Network normalization
//!   - One loop iteration, with and without the miRNA mask
//!   - Full run to convergence

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use puma_core::{
    normalize_network, t_pair, t_single, ConstraintMask, LoopState, Matrix, PumaEngine,
};
use puma_types::PumaConfig;

const TFS: usize = 32;
const GENES: usize = 256;

// ── Helpers ───────────────────────────────────────────────────────────

fn make_motif() -> Matrix {
    Matrix::from_fn(TFS, GENES, |i, j| {
        if (i * 7 + j * 3) % 5 == 0 {
            1.0
        } else {
            0.0
        }
    })
}

fn make_symmetric(n: usize, seed: f64) -> Matrix {
    Matrix::from_fn(n, n, |i, j| {
        if i == j {
            1.0
        } else {
            (((i + j) as f64) * seed).sin() * 0.3
        }
    })
}

fn make_state() -> LoopState {
    LoopState {
        motif: normalize_network(&make_motif()),
        ppi: normalize_network(&make_symmetric(TFS, 0.13)),
        correlation: normalize_network(&make_symmetric(GENES, 0.07)),
        step: 0,
    }
}

// ── Kernel benchmarks ────────────────────────────────────────────────

fn bench_t_single(c: &mut Criterion) {
    let motif = make_motif();
    c.bench_function("t_single_32x256", |b| b.iter(|| t_single(black_box(&motif))));
}

fn bench_t_single_transposed(c: &mut Criterion) {
    let motif_t = make_motif().transpose();
    c.bench_function("t_single_256x32", |b| {
        b.iter(|| t_single(black_box(&motif_t)))
    });
}

fn bench_t_pair(c: &mut Criterion) {
    let motif = make_motif();
    let corr = make_symmetric(GENES, 0.07);
    c.bench_function("t_pair_motif_corr_32x256", |b| {
        b.iter(|| t_pair(black_box(&motif), black_box(&corr)))
    });
}

fn bench_normalize(c: &mut Criterion) {
    let corr = make_symmetric(GENES, 0.07);
    c.bench_function("normalize_256x256", |b| {
        b.iter(|| normalize_network(black_box(&corr)))
    });
}

// ── Loop benchmarks ──────────────────────────────────────────────────

fn bench_iterate(c: &mut Criterion) {
    let base = make_state();
    let mask = ConstraintMask::new(Vec::new(), &base.ppi).unwrap();
    c.bench_function("iterate_32x256", |b| {
        b.iter(|| {
            let mut state = base.clone();
            puma_core::iterate(black_box(&mut state), &mask, 0.1, 0.001)
        })
    });
}

fn bench_iterate_constrained(c: &mut Criterion) {
    let base = make_state();
    let mask = ConstraintMask::new(vec![0, 5, 17], &base.ppi).unwrap();
    c.bench_function("iterate_32x256_mask3", |b| {
        b.iter(|| {
            let mut state = base.clone();
            puma_core::iterate(black_box(&mut state), &mask, 0.1, 0.001)
        })
    });
}

fn bench_full_run(c: &mut Criterion) {
    let motif = make_motif();
    let ppi = make_symmetric(TFS, 0.13);
    let corr = make_symmetric(GENES, 0.07);
    let cfg = PumaConfig {
        max_iterations: 200,
        record_trace: false,
        ..PumaConfig::default()
    };

    let mut group = c.benchmark_group("full_run");
    group.sample_size(10);
    group.bench_function("run_32x256", |b| {
        b.iter(|| {
            let mut engine =
                PumaEngine::from_raw(&corr, &motif, &ppi, Vec::new(), cfg.clone()).unwrap();
            engine.run()
        })
    });
    group.finish();
}

// ── Groups ───────────────────────────────────────────────────────────

criterion_group!(
    kernels,
    bench_t_single,
    bench_t_single_transposed,
    bench_t_pair,
    bench_normalize,
);

criterion_group!(loop_, bench_iterate, bench_iterate_constrained, bench_full_run,);

criterion_main!(kernels, loop_);
