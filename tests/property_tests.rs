//! Property-based tests using proptest.
//!
//! These tests verify the sampler's structural invariants over random corpora.

use bilda::prelude::*;
use bilda::topic::{sample_with_uniform, PriorFields};
use proptest::prelude::*;

const V: usize = 6;
const V_PRIMARY: usize = 3;

fn corpus_strategy() -> impl Strategy<Value = Corpus> {
    let primary = proptest::collection::vec(proptest::collection::vec(0..V_PRIMARY, 0..8), 1..4);
    let secondary = proptest::collection::vec(proptest::collection::vec(0..V, 0..8), 0..4);
    (primary, secondary).prop_map(|(p, s)| {
        let words = (0..V).map(|i| format!("w{i}")).collect();
        let vocab = Vocabulary::with_primary_count(words, V_PRIMARY).expect("valid vocabulary");
        Corpus::new(vocab, p, s).expect("tokens in range")
    })
}

fn weights_strategy() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(1e-6f64..10.0, 1..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn sampled_index_brackets_the_uniform(weights in weights_strategy(), frac in 0.0f64..1.0) {
        let total: f64 = weights.iter().sum();
        let u = frac * total;
        let j = sample_with_uniform(&weights, u);
        prop_assert!(j < weights.len());

        let upto: f64 = weights[..=j].iter().sum();
        let before: f64 = weights[..j].iter().sum();
        // clamping to the last index is allowed when rounding leaves u past the sum
        prop_assert!(upto >= u || j == weights.len() - 1);
        prop_assert!(before <= u);
    }

    #[test]
    fn single_weight_always_index_zero(w in 1e-9f64..1e9, frac in 0.0f64..1.0) {
        prop_assert_eq!(sample_with_uniform(&[w], frac * w), 0);
    }

    #[test]
    fn grow_preserves_prior_entries(
        vars in proptest::collection::vec(-3.0f64..3.0, 2 * 3 + 3),
        extra in 1usize..5,
    ) {
        let mut prior = PriorFields::new(2, 3);
        prior.unpack(&Vector::from_vec(vars.clone())).expect("length matches");
        prior.grow(3 + extra);

        for k in 0..2 {
            prop_assert_eq!(&prior.y().row(k)[..3], &vars[k * 3..k * 3 + 3]);
            prop_assert!(prior.y().row(k)[3..].iter().all(|&y| y == 0.0));
        }
        prop_assert_eq!(&prior.y_word()[..3], &vars[6..9]);
        prop_assert!(prior.y_word()[3..].iter().all(|&y| y == 0.0));
        prop_assert!(prior.is_positive());
    }

    #[test]
    fn penalty_ignores_edge_orientation(
        edges in proptest::collection::vec((0usize..V, 0usize..V), 0..10),
        values in proptest::collection::vec(-5.0f64..5.0, V),
    ) {
        let reversed: Vec<_> = edges.iter().map(|&(a, b)| (b, a)).collect();
        let g1 = SimilarityGraph::from_edges(&edges, V);
        let g2 = SimilarityGraph::from_edges(&reversed, V);
        prop_assert_eq!(&g1, &g2);
        prop_assert!(g1.penalty(&values) >= 0.0);
        for v in 0..V {
            prop_assert!(!g1.neighbors(v).contains(&v));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    #[test]
    fn counts_are_conserved_through_extension(
        corpus in corpus_strategy(),
        k in 1usize..5,
        seed in any::<u64>(),
    ) {
        let config = SamplerConfig::new(k)
            .with_n_iterations(4)
            .with_burn_in(4)
            .with_optimization_interval(4)
            .with_seed(seed);
        let reference = corpus.clone();
        let mut sampler = GibbsSampler::new(config, corpus, EdgeList::new(vec![(0, 3)]))
            .expect("valid config");

        for _ in 0..4 {
            sampler.step(&mut NullSink).expect("no optimization scheduled");
            let n_active = sampler.n_active_documents();
            prop_assert!(sampler.state().is_consistent(&reference, n_active));
            let tokens: usize = (0..n_active).map(|m| reference.document(m).len()).sum();
            let counted: u32 = sampler.state().topic_totals().iter().sum();
            prop_assert_eq!(counted as usize, tokens);
        }
        prop_assert_eq!(sampler.n_active_documents(), reference.n_documents());
        prop_assert_eq!(sampler.effective_vocab_size(), V);
    }
}
