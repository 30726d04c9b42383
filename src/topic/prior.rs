//! Log-linear topic-word prior.
//!
//! `Beta[k][i] = exp(Y[k][i] + Yword[i])` and `SumBeta[k] = Σ_i Beta[k][i]`
//! over the active vocabulary. `Y` carries topic-specific deviations, `Yword`
//! a per-word offset shared by all topics.

use serde::{Deserialize, Serialize};

use crate::error::{BildaError, Result};
use crate::primitives::{Matrix, Vector};

/// Prior parameters together with the derived `Beta`/`SumBeta` tables.
///
/// The optimizer sees the parameters packed as one vector: all `Y` rows in
/// topic order followed by `Yword`, length `K · V + V` for active size `V`.
///
/// # Examples
///
/// ```
/// use bilda::topic::PriorFields;
///
/// let prior = PriorFields::new(2, 3);
/// assert_eq!(prior.beta(0, 1), 1.0);
/// assert_eq!(prior.sum_beta(1), 3.0);
/// assert_eq!(prior.pack().len(), 2 * 3 + 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorFields {
    y: Matrix<f64>,
    y_word: Vec<f64>,
    beta: Matrix<f64>,
    sum_beta: Vec<f64>,
}

impl PriorFields {
    /// Zero log-weights over `vocab_size` words, so every `Beta` is 1.
    #[must_use]
    pub fn new(n_topics: usize, vocab_size: usize) -> Self {
        let mut prior = Self {
            y: Matrix::zeros(n_topics, vocab_size),
            y_word: vec![0.0; vocab_size],
            beta: Matrix::zeros(n_topics, vocab_size),
            sum_beta: vec![0.0; n_topics],
        };
        prior.update_beta();
        prior
    }

    #[must_use]
    pub fn n_topics(&self) -> usize {
        self.y.n_rows()
    }

    /// Active vocabulary size the fields are defined over.
    #[must_use]
    pub fn vocab_size(&self) -> usize {
        self.y_word.len()
    }

    #[must_use]
    pub fn y(&self) -> &Matrix<f64> {
        &self.y
    }

    #[must_use]
    pub fn y_word(&self) -> &[f64] {
        &self.y_word
    }

    #[must_use]
    pub fn beta(&self, topic: usize, word: usize) -> f64 {
        self.beta.get(topic, word)
    }

    /// Row `topic` of `Beta`.
    #[must_use]
    pub fn beta_row(&self, topic: usize) -> &[f64] {
        self.beta.row(topic)
    }

    #[must_use]
    pub fn sum_beta(&self, topic: usize) -> f64 {
        self.sum_beta[topic]
    }

    #[must_use]
    pub fn sum_betas(&self) -> &[f64] {
        &self.sum_beta
    }

    /// Recomputes `Beta` and `SumBeta` from `Y` and `Yword`.
    pub fn update_beta(&mut self) {
        for k in 0..self.n_topics() {
            let y_row = self.y.row(k);
            let beta_row = self.beta.row_mut(k);
            let mut sum = 0.0;
            for ((b, &y), &yw) in beta_row.iter_mut().zip(y_row).zip(&self.y_word) {
                *b = (y + yw).exp();
                sum += *b;
            }
            self.sum_beta[k] = sum;
        }
    }

    /// Extends every field to `new_size` words.
    ///
    /// Existing entries keep their values, new log-weights are zero, and
    /// `Beta`/`SumBeta` are recomputed. Shrinking is a no-op.
    pub fn grow(&mut self, new_size: usize) {
        if new_size <= self.vocab_size() {
            return;
        }
        self.y.grow_cols(new_size, 0.0);
        self.y_word.resize(new_size, 0.0);
        self.beta.grow_cols(new_size, 0.0);
        self.update_beta();
    }

    /// Packs `Y` row by row, then `Yword`.
    #[must_use]
    pub fn pack(&self) -> Vector<f64> {
        let mut vars = Vec::with_capacity(self.y.as_slice().len() + self.y_word.len());
        vars.extend_from_slice(self.y.as_slice());
        vars.extend_from_slice(&self.y_word);
        Vector::from_vec(vars)
    }

    /// Replaces `Y` and `Yword` with a packed vector and recomputes `Beta`.
    ///
    /// # Errors
    ///
    /// Returns a dimension mismatch if `vars` has the wrong length.
    pub fn unpack(&mut self, vars: &Vector<f64>) -> Result<()> {
        let (k, v) = (self.n_topics(), self.vocab_size());
        let expected = k * v + v;
        if vars.len() != expected {
            return Err(BildaError::dimension_mismatch("prior vars", expected, vars.len()));
        }
        let (y, y_word) = vars.as_slice().split_at(k * v);
        self.y = Matrix::from_vec(k, v, y.to_vec())
            .map_err(|e| BildaError::DimensionMismatch {
                expected: format!("{k}x{v}"),
                actual: e.to_string(),
            })?;
        self.y_word.copy_from_slice(y_word);
        self.update_beta();
        Ok(())
    }

    /// True when every `Beta` and `SumBeta` entry is finite and positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        let ok = |x: &f64| x.is_finite() && *x > 0.0;
        self.beta.as_slice().iter().all(ok) && self.sum_beta.iter().all(ok)
    }
}
