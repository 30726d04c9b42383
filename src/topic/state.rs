//! Topic assignments and the count tables derived from them.

use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::corpus::{Corpus, WordId};
use crate::primitives::Matrix;

/// Assignment vector `z` with its sufficient statistics.
///
/// `word_topic` has one row per active vocabulary word and grows when the
/// vocabulary is extended; `doc_topic` covers every document from the start,
/// with inactive documents holding zero rows.
///
/// # Invariants
///
/// After every [`increment`](Self::increment) / [`decrement`](Self::decrement)
/// pair the tables agree with the assignments:
/// `word_topic[i][k]` counts active tokens of word `i` assigned to `k`,
/// `doc_topic[m][k]` counts tokens of document `m` assigned to `k`, and the
/// sums are the row/column totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountState {
    n_topics: usize,
    assignments: Vec<Vec<usize>>,
    word_topic: Matrix<u32>,
    topic_totals: Vec<u32>,
    doc_topic: Matrix<u32>,
    doc_totals: Vec<u32>,
}

impl CountState {
    /// Empty state for `n_documents` documents over `vocab_size` active words.
    #[must_use]
    pub fn new(n_topics: usize, n_documents: usize, vocab_size: usize) -> Self {
        Self {
            n_topics,
            assignments: vec![Vec::new(); n_documents],
            word_topic: Matrix::zeros(vocab_size, n_topics),
            topic_totals: vec![0; n_topics],
            doc_topic: Matrix::zeros(n_documents, n_topics),
            doc_totals: vec![0; n_documents],
        }
    }

    /// Assigns a uniformly random topic to every token of the documents in `docs`.
    ///
    /// # Panics
    ///
    /// Panics if a token is outside the active vocabulary.
    pub fn initialize_documents<R: Rng + ?Sized>(
        &mut self,
        corpus: &Corpus,
        docs: Range<usize>,
        rng: &mut R,
    ) {
        for m in docs {
            let words = corpus.document(m);
            let mut z = Vec::with_capacity(words.len());
            for &word in words {
                let topic = rng.gen_range(0..self.n_topics);
                self.increment(m, word, topic);
                z.push(topic);
            }
            self.assignments[m] = z;
        }
    }

    /// Adds zero rows so that `word_topic` covers `new_size` words.
    pub fn grow_vocabulary(&mut self, new_size: usize) {
        let current = self.word_topic.n_rows();
        if new_size > current {
            self.word_topic.append_rows(new_size - current, 0);
        }
    }

    /// Counts one token of `word` in document `doc` under `topic`.
    pub fn increment(&mut self, doc: usize, word: WordId, topic: usize) {
        *self.word_topic.get_mut(word, topic) += 1;
        self.topic_totals[topic] += 1;
        *self.doc_topic.get_mut(doc, topic) += 1;
        self.doc_totals[doc] += 1;
    }

    /// Removes one token of `word` in document `doc` from `topic`.
    ///
    /// # Panics
    ///
    /// Panics (in debug builds, on underflow) if no such token is counted.
    pub fn decrement(&mut self, doc: usize, word: WordId, topic: usize) {
        *self.word_topic.get_mut(word, topic) -= 1;
        self.topic_totals[topic] -= 1;
        *self.doc_topic.get_mut(doc, topic) -= 1;
        self.doc_totals[doc] -= 1;
    }

    #[must_use]
    pub fn n_topics(&self) -> usize {
        self.n_topics
    }

    /// Number of vocabulary rows currently tracked.
    #[must_use]
    pub fn vocab_size(&self) -> usize {
        self.word_topic.n_rows()
    }

    #[must_use]
    pub fn topic(&self, doc: usize, position: usize) -> usize {
        self.assignments[doc][position]
    }

    pub(crate) fn set_topic(&mut self, doc: usize, position: usize, topic: usize) {
        self.assignments[doc][position] = topic;
    }

    /// Topic assignments of document `doc`; empty for inactive documents.
    #[must_use]
    pub fn assignments(&self, doc: usize) -> &[usize] {
        &self.assignments[doc]
    }

    /// `Cwt`: word × topic counts.
    #[must_use]
    pub fn word_topic(&self) -> &Matrix<u32> {
        &self.word_topic
    }

    /// `Cwtsum`: tokens per topic.
    #[must_use]
    pub fn topic_totals(&self) -> &[u32] {
        &self.topic_totals
    }

    /// `Cdt`: document × topic counts.
    #[must_use]
    pub fn doc_topic(&self) -> &Matrix<u32> {
        &self.doc_topic
    }

    /// `Cdtsum`: tokens per document.
    #[must_use]
    pub fn doc_totals(&self) -> &[u32] {
        &self.doc_totals
    }

    /// Recounts the tables from the assignments and compares.
    ///
    /// Only documents `0..n_active` are expected to carry assignments.
    #[must_use]
    pub fn is_consistent(&self, corpus: &Corpus, n_active: usize) -> bool {
        let mut fresh = Self::new(self.n_topics, self.assignments.len(), self.vocab_size());
        for m in 0..n_active {
            let words = corpus.document(m);
            if self.assignments[m].len() != words.len() {
                return false;
            }
            for (&word, &topic) in words.iter().zip(&self.assignments[m]) {
                if topic >= self.n_topics || word >= self.vocab_size() {
                    return false;
                }
                fresh.increment(m, word, topic);
            }
        }
        let inactive_empty = self.assignments[n_active..].iter().all(Vec::is_empty);

        inactive_empty
            && fresh.word_topic == self.word_topic
            && fresh.topic_totals == self.topic_totals
            && fresh.doc_topic == self.doc_topic
            && fresh.doc_totals == self.doc_totals
    }
}
