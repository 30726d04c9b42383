//! Benchmarks for one Gibbs sweep and one prior refit.

use bilda::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn synthetic(n_docs: usize, vocab: usize) -> (Corpus, EdgeList) {
    let mut rng = StdRng::seed_from_u64(0);
    let half = vocab / 2;
    let words = (0..vocab).map(|i| format!("w{i}")).collect();
    let vocabulary = Vocabulary::with_primary_count(words, half).expect("valid vocabulary");
    let primary = (0..n_docs)
        .map(|_| (0..50).map(|_| rng.gen_range(0..half)).collect())
        .collect();
    let secondary = (0..n_docs)
        .map(|_| (0..50).map(|_| rng.gen_range(0..vocab)).collect())
        .collect();
    let edges = EdgeList::new((0..half).map(|i| (i, i + half)).collect());
    (
        Corpus::new(vocabulary, primary, secondary).expect("valid corpus"),
        edges,
    )
}

fn sampler(n_docs: usize) -> GibbsSampler {
    let (corpus, edges) = synthetic(n_docs, 400);
    let config = SamplerConfig::new(20)
        .with_n_iterations(10)
        .with_burn_in(10)
        .with_optimization_interval(10)
        .with_seed(1);
    let mut sampler = GibbsSampler::new(config, corpus, edges).expect("valid config");
    sampler.extend_corpus();
    sampler
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("gibbs_sweep");

    for n_docs in [50, 200].iter() {
        let mut s = sampler(*n_docs);
        group.bench_with_input(BenchmarkId::from_parameter(n_docs), n_docs, |b, _| {
            b.iter(|| s.sweep());
        });
    }

    group.finish();
}

fn bench_optimize_prior(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimize_prior");
    group.sample_size(10);

    let mut s = sampler(100);
    for _ in 0..5 {
        s.sweep();
    }
    group.bench_function("k20_v400", |b| {
        b.iter(|| black_box(s.optimize_prior()).is_ok());
    });

    group.finish();
}

criterion_group!(benches, bench_sweep, bench_optimize_prior);
criterion_main!(benches);
