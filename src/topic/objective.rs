//! Penalized negative log-likelihood of the topic-word prior.
//!
//! With the topic assignments held fixed, the Dirichlet-multinomial
//! likelihood of the word-topic counts is a smooth function of the packed
//! prior parameters `x = [Y(0,·), …, Y(K-1,·), Yword]`:
//!
//! ```text
//! F(x) = Σ_k [lnΓ(n_k + S_k) − lnΓ(S_k)] + Σ_{k,i: c_ik>0} [lnΓ(β_ki) − lnΓ(β_ki + c_ik)]
//!      + Σ_k Σ_{(i,j) ∈ E} (Y_ki − Y_kj)² / (4 λ_topic²)
//!      + Σ_i Yword_i² / (2 λ_word²)
//! ```
//!
//! where `β_ki = exp(Y_ki + Yword_i)`, `S_k = Σ_i β_ki`, `n_k` is the token
//! count of topic `k` and every undirected edge of `E` appears once.

use statrs::function::gamma::{digamma, ln_gamma};

use super::state::CountState;
use crate::graph::SimilarityGraph;
use crate::primitives::Vector;

/// Objective and gradient over a packed prior vector.
///
/// Borrows the counts and the graph; evaluating it never mutates sampler
/// state, so the optimizer is free to probe arbitrary points.
#[derive(Debug, Clone, Copy)]
pub struct PriorObjective<'a> {
    counts: &'a CountState,
    graph: &'a SimilarityGraph,
    lambda_topic: f64,
    lambda_word: f64,
}

impl<'a> PriorObjective<'a> {
    #[must_use]
    pub fn new(
        counts: &'a CountState,
        graph: &'a SimilarityGraph,
        lambda_topic: f64,
        lambda_word: f64,
    ) -> Self {
        Self {
            counts,
            graph,
            lambda_topic,
            lambda_word,
        }
    }

    /// Length of the packed vector, `K · V + V`.
    #[must_use]
    pub fn n_vars(&self) -> usize {
        (self.counts.n_topics() + 1) * self.counts.vocab_size()
    }

    /// `F(x)`.
    #[must_use]
    pub fn value(&self, x: &Vector<f64>) -> f64 {
        self.neg_log_likelihood(x) + self.graph_penalty(x) + self.word_penalty(x)
    }

    /// Dirichlet-multinomial negative log-likelihood part of `F`.
    #[must_use]
    pub fn neg_log_likelihood(&self, x: &Vector<f64>) -> f64 {
        let (k_topics, v) = self.dims();
        let x = x.as_slice();
        let y_word = &x[k_topics * v..];
        let cwt = self.counts.word_topic();

        let mut total = 0.0;
        for k in 0..k_topics {
            let y_row = &x[k * v..(k + 1) * v];
            let mut sum_beta = 0.0;
            let mut word_terms = 0.0;
            for i in 0..v {
                let beta = (y_row[i] + y_word[i]).exp();
                sum_beta += beta;
                let c = cwt.get(i, k);
                if c > 0 {
                    word_terms += ln_gamma(beta) - ln_gamma(beta + f64::from(c));
                }
            }
            let n_k = f64::from(self.counts.topic_totals()[k]);
            total += ln_gamma(n_k + sum_beta) - ln_gamma(sum_beta) + word_terms;
        }
        total
    }

    /// Graph smoothness part of `F`; each edge counts once per topic.
    #[must_use]
    pub fn graph_penalty(&self, x: &Vector<f64>) -> f64 {
        let (k_topics, v) = self.dims();
        let x = x.as_slice();
        let scale = 1.0 / (4.0 * self.lambda_topic * self.lambda_topic);
        (0..k_topics)
            .map(|k| self.graph.penalty(&x[k * v..(k + 1) * v]))
            .sum::<f64>()
            * scale
    }

    /// L2 part of `F` on `Yword`.
    #[must_use]
    pub fn word_penalty(&self, x: &Vector<f64>) -> f64 {
        let (k_topics, v) = self.dims();
        let denom = 2.0 * self.lambda_word * self.lambda_word;
        x.as_slice()[k_topics * v..]
            .iter()
            .map(|yw| yw * yw / denom)
            .sum()
    }

    /// `∇F(x)` in the packed layout.
    #[must_use]
    pub fn gradient(&self, x: &Vector<f64>) -> Vector<f64> {
        let (k_topics, v) = self.dims();
        let xs = x.as_slice();
        let (y, y_word) = xs.split_at(k_topics * v);
        let cwt = self.counts.word_topic();
        // Exact derivative of `graph_penalty`; the published 1/λ² scale is twice this.
        let graph_scale = 1.0 / (2.0 * self.lambda_topic * self.lambda_topic);
        let word_scale = 1.0 / (self.lambda_word * self.lambda_word);

        let mut grad = vec![0.0; xs.len()];
        let mut beta = vec![0.0; v];
        {
            let (grad_y, grad_word) = grad.split_at_mut(k_topics * v);
            for k in 0..k_topics {
                let y_row = &y[k * v..(k + 1) * v];
                let mut sum_beta = 0.0;
                for i in 0..v {
                    beta[i] = (y_row[i] + y_word[i]).exp();
                    sum_beta += beta[i];
                }
                let n_k = f64::from(self.counts.topic_totals()[k]);
                let shared = digamma(n_k + sum_beta) - digamma(sum_beta);

                let g_row = &mut grad_y[k * v..(k + 1) * v];
                for i in 0..v {
                    let c = cwt.get(i, k);
                    let mut t = shared;
                    if c > 0 {
                        t += digamma(beta[i]) - digamma(beta[i] + f64::from(c));
                    }
                    let g = beta[i] * t;
                    g_row[i] += g;
                    grad_word[i] += g;
                }
                self.graph.add_penalty_gradient(y_row, graph_scale, g_row);
            }
            for (g, yw) in grad_word.iter_mut().zip(y_word) {
                *g += yw * word_scale;
            }
        }
        Vector::from_vec(grad)
    }

    fn dims(&self) -> (usize, usize) {
        (self.counts.n_topics(), self.counts.vocab_size())
    }
}
