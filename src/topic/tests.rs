//! Scenario tests for the sampler schedule.
//!
//! Each test is named after the property of a full or partial run it checks.

use super::*;
use crate::corpus::{Corpus, Vocabulary};
use crate::error::BildaError;
use crate::graph::EdgeList;
use crate::report::{MemorySink, NullSink};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// 6 words (0..3 primary), 2 primary and 2 secondary documents.
fn toy_corpus() -> Corpus {
    let words = [
        "river(en)", "bank(en)", "money(en)", "rive(fr)", "banque(fr)", "argent(fr)",
    ]
    .iter()
    .map(|w| (*w).to_string())
    .collect();
    let vocab = Vocabulary::from_tagged(words, "en").expect("primary prefix");
    Corpus::new(
        vocab,
        vec![vec![0, 1, 0, 2, 1], vec![2, 2, 1, 0]],
        vec![vec![3, 4, 5, 3], vec![5, 4, 4, 0]],
    )
    .expect("valid corpus")
}

fn scenario_config() -> SamplerConfig {
    SamplerConfig::new(3)
        .with_n_iterations(20)
        .with_burn_in(15)
        .with_optimization_interval(15)
        .with_snapshot_interval(5)
        .with_extension_at(10)
        .with_seed(2024)
}

fn scenario() -> GibbsSampler {
    GibbsSampler::new(scenario_config(), toy_corpus(), EdgeList::new(vec![(0, 3)]))
        .expect("valid config")
}

#[test]
fn test_end_to_end_scenario() {
    let mut sampler = scenario();
    let mut sink = MemorySink::default();
    sampler.run(&mut sink).expect("run succeeds");

    assert_eq!(sampler.phase(), Phase::Finished);
    assert_eq!(sampler.iteration(), 20);
    assert!(sampler.is_extended());
    assert_eq!(sampler.n_active_documents(), 4);
    assert_eq!(sampler.effective_vocab_size(), 6);
    assert_eq!(sampler.graph().num_edges(), 1);
    // only the final snapshot: 20 is the last sweep, 15 is not past burn-in
    assert_eq!(sink.iterations(), vec![20]);

    let est = sampler.estimates();
    assert_eq!(est.theta.shape(), (4, 3));
    for m in 0..4 {
        let s: f64 = est.theta.row(m).iter().sum();
        assert!((s - 1.0).abs() < 1e-9, "theta row {m} sums to {s}");
    }
    assert_eq!(est.phi.shape(), (3, 6));
    assert!(est.phi.as_slice().iter().all(|&p| p > 0.0 && p < 1.0));
}

#[test]
fn test_prior_is_flat_until_first_optimization() {
    let mut sampler = scenario();
    for _ in 0..14 {
        sampler.step(&mut NullSink).expect("step");
    }
    assert!(sampler.prior().y().as_slice().iter().all(|&y| y == 0.0));
    assert!(sampler.prior().y_word().iter().all(|&y| y == 0.0));

    sampler.step(&mut NullSink).expect("optimizing step");
    let moved = sampler.prior().y().as_slice().iter().any(|&y| y != 0.0)
        || sampler.prior().y_word().iter().any(|&y| y != 0.0);
    assert!(moved, "sweep 15 refits the prior");
    assert!(sampler.prior().is_positive());
}

#[test]
fn test_counts_conserved_across_every_sweep() {
    let mut sampler = scenario();
    let corpus = sampler.corpus().clone();
    assert!(sampler.state().is_consistent(&corpus, 2));
    for _ in 0..20 {
        sampler.step(&mut NullSink).expect("step");
        let n_active = sampler.n_active_documents();
        assert!(sampler.state().is_consistent(&corpus, n_active));
        for m in 0..n_active {
            let total: u32 = sampler.state().doc_topic().row(m).iter().sum();
            assert_eq!(total as usize, corpus.document(m).len());
        }
    }
}

#[test]
fn test_extension_happens_before_sweep_ten() {
    let mut sampler = scenario();
    for _ in 0..9 {
        sampler.step(&mut NullSink).expect("step");
    }
    assert!(!sampler.is_extended());
    assert_eq!(sampler.effective_vocab_size(), 3);
    assert_eq!(sampler.n_active_documents(), 2);
    // edge (0, 3) leaves the primary prefix
    assert_eq!(sampler.graph().num_edges(), 0);

    sampler.step(&mut NullSink).expect("extending step");
    assert!(sampler.is_extended());
    assert_eq!(sampler.effective_vocab_size(), 6);
    assert_eq!(sampler.state().vocab_size(), 6);
    assert_eq!(sampler.graph().neighbors(3), &[0]);
    assert_eq!(sampler.state().doc_totals(), &[5, 4, 4, 4]);
}

#[test]
fn test_extension_preserves_prior_values() {
    let config = scenario_config()
        .with_burn_in(4)
        .with_optimization_interval(4)
        .with_extension_at(10);
    let mut sampler =
        GibbsSampler::new(config, toy_corpus(), EdgeList::new(vec![(0, 3)])).expect("valid");
    for _ in 0..9 {
        sampler.step(&mut NullSink).expect("step");
    }
    let y_before = sampler.prior().y().clone();
    let y_word_before = sampler.prior().y_word().to_vec();

    sampler.extend_corpus();
    let prior = sampler.prior();
    for k in 0..3 {
        assert_eq!(&prior.y().row(k)[..3], y_before.row(k));
        assert!(prior.y().row(k)[3..].iter().all(|&y| y == 0.0));
    }
    assert_eq!(&prior.y_word()[..3], y_word_before.as_slice());
    assert!(prior.y_word()[3..].iter().all(|&y| y == 0.0));
    assert!(prior.is_positive());
}

#[test]
fn test_extend_corpus_runs_once() {
    let mut sampler = scenario();
    sampler.extend_corpus();
    let tokens: u32 = sampler.state().topic_totals().iter().sum();
    sampler.extend_corpus();
    assert_eq!(sampler.state().topic_totals().iter().sum::<u32>(), tokens);
    assert_eq!(tokens, 17);
}

#[test]
fn test_snapshot_is_idempotent() {
    let mut sampler = scenario();
    for _ in 0..12 {
        sampler.step(&mut NullSink).expect("step");
    }
    let a = sampler.snapshot().estimates;
    let b = sampler.snapshot().estimates;
    assert_eq!(a, b);
}

#[test]
fn test_snapshot_schedule() {
    let config = SamplerConfig::new(2)
        .with_n_iterations(12)
        .with_burn_in(3)
        .with_optimization_interval(6)
        .with_snapshot_interval(3)
        .with_seed(5);
    let mut sampler = GibbsSampler::new(config, toy_corpus(), EdgeList::default()).expect("valid");
    let mut sink = MemorySink::default();
    sampler.run(&mut sink).expect("run");
    // 3 is not past burn-in, 12 is written once as the final snapshot
    assert_eq!(sink.iterations(), vec![6, 9, 12]);
}

#[test]
fn test_phase_transitions() {
    let config = scenario_config().with_burn_in(2).with_optimization_interval(10);
    let mut sampler =
        GibbsSampler::new(config, toy_corpus(), EdgeList::default()).expect("valid");
    assert_eq!(sampler.phase(), Phase::Initializing);
    sampler.step(&mut NullSink).expect("step");
    assert_eq!(sampler.phase(), Phase::BurnIn);
    sampler.step(&mut NullSink).expect("step");
    assert_eq!(sampler.phase(), Phase::BurnIn);
    sampler.step(&mut NullSink).expect("step");
    assert_eq!(sampler.phase(), Phase::Sampling);
}

#[test]
fn test_invalid_config_rejected_before_sampling() {
    let config = SamplerConfig::new(3).with_n_iterations(5).with_optimization_interval(6);
    assert!(GibbsSampler::new(config, toy_corpus(), EdgeList::default()).is_err());
}

#[test]
fn test_optimizer_failure_aborts_run_and_keeps_prior() {
    // no primary words: SumBeta is 0 and the objective is NaN
    let words = ["a(fr)", "b(fr)"].iter().map(|w| (*w).to_string()).collect();
    let vocab = Vocabulary::with_primary_count(words, 0).expect("valid vocabulary");
    let corpus = Corpus::from_parts_unchecked(vocab, vec![vec![]], vec![vec![0, 1]]);
    let config = SamplerConfig::new(2)
        .with_n_iterations(10)
        .with_burn_in(1)
        .with_optimization_interval(2)
        .with_snapshot_interval(5)
        .with_extension_at(8)
        .with_seed(5);
    let mut sampler = GibbsSampler::new(config, corpus, EdgeList::default()).expect("valid config");
    let before = sampler.prior().clone();
    let mut sink = MemorySink::default();

    let err = sampler.run(&mut sink).expect_err("non-finite objective");
    match err {
        BildaError::OptimizationFailed { status, .. } => {
            assert_eq!(status, crate::optim::ConvergenceStatus::NumericalError);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(sampler.iteration(), 1);
    assert_ne!(sampler.phase(), Phase::Finished);
    assert_eq!(sampler.prior(), &before);
    assert!(sink.iterations().is_empty());
}

#[test]
fn test_same_seed_same_chain() {
    let run = || {
        let mut sampler = scenario();
        sampler.run(&mut NullSink).expect("run");
        sampler.estimates()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_sample_with_uniform_boundaries() {
    let w = [0.25, 0.25, 0.5];
    assert_eq!(sample_with_uniform(&w, 0.0), 0);
    assert_eq!(sample_with_uniform(&w, 0.25), 1);
    assert_eq!(sample_with_uniform(&w, 0.4999), 1);
    assert_eq!(sample_with_uniform(&w, 0.5), 2);
    // rounding past the total clamps to the last index
    assert_eq!(sample_with_uniform(&w, 1.0), 2);
}

#[test]
fn test_sample_categorical_frequencies() {
    let mut rng = StdRng::seed_from_u64(77);
    let weights = [1.0, 3.0];
    let n: u32 = 20_000;
    let ones = (0..n)
        .filter(|_| sample_categorical(&weights, &mut rng) == 1)
        .count();
    let freq = ones as f64 / f64::from(n);
    assert!((freq - 0.75).abs() < 0.02, "observed {freq}");
}
