//! Smoothed point estimates read off the current sampler state.

use std::cmp::Ordering;

use super::prior::PriorFields;
use super::state::CountState;
use crate::corpus::{Vocabulary, WordId};
use crate::primitives::Matrix;

/// Document-topic (`theta`) and topic-word (`phi`) distributions.
///
/// ```text
/// theta[m][k] = (Cdt[m][k] + α) / (Cdtsum[m] + K·α)
/// phi[k][i]   = (Cwt[i][k] + Beta[k][i]) / (Cwtsum[k] + SumBeta[k])
/// ```
///
/// `theta` covers the active documents and `phi` the active vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimates {
    pub theta: Matrix<f64>,
    pub phi: Matrix<f64>,
}

impl Estimates {
    /// Computes both tables without touching the state.
    #[must_use]
    pub fn compute(state: &CountState, prior: &PriorFields, alpha: f64, n_active: usize) -> Self {
        let k_topics = state.n_topics();
        let v = prior.vocab_size();

        let mut theta = Matrix::zeros(n_active, k_topics);
        let k_alpha = k_topics as f64 * alpha;
        for m in 0..n_active {
            let denom = f64::from(state.doc_totals()[m]) + k_alpha;
            let counts = state.doc_topic().row(m);
            for (t, &c) in theta.row_mut(m).iter_mut().zip(counts) {
                *t = (f64::from(c) + alpha) / denom;
            }
        }

        let mut phi = Matrix::zeros(k_topics, v);
        let cwt = state.word_topic();
        for k in 0..k_topics {
            let denom = f64::from(state.topic_totals()[k]) + prior.sum_beta(k);
            let beta = prior.beta_row(k);
            for (i, p) in phi.row_mut(k).iter_mut().enumerate() {
                *p = (f64::from(cwt.get(i, k)) + beta[i]) / denom;
            }
        }

        Self { theta, phi }
    }

    /// Highest-probability words of every topic, best first.
    ///
    /// Returns `min(n, V)` entries per topic; ties keep vocabulary order.
    #[must_use]
    pub fn top_words(&self, n: usize) -> Vec<Vec<(WordId, f64)>> {
        (0..self.phi.n_rows())
            .map(|k| {
                let mut ranked: Vec<(WordId, f64)> =
                    self.phi.row(k).iter().copied().enumerate().collect();
                ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
                ranked.truncate(n);
                ranked
            })
            .collect()
    }
}

/// Everything a sink may need to report at one iteration.
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub estimates: Estimates,
    pub prior: &'a PriorFields,
    pub vocabulary: &'a Vocabulary,
}

impl Snapshot<'_> {
    /// Active vocabulary size at the time of the snapshot.
    #[must_use]
    pub fn vocab_size(&self) -> usize {
        self.prior.vocab_size()
    }

    #[must_use]
    pub fn n_topics(&self) -> usize {
        self.prior.n_topics()
    }
}
