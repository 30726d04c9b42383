//! Bilingual corpus: vocabulary plus primary and secondary documents.
//!
//! Documents `0..n_primary_documents` use only primary-language words and
//! are sampled from the start; the remaining documents join the model once
//! the corpus is extended mid-run.

mod loader;
mod vocabulary;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BildaError, Result};

pub use loader::{parse_documents, read_documents};
pub use vocabulary::{split_tag, Vocabulary, WordId, DEFAULT_PRIMARY_TAG};

/// Validated bilingual corpus.
///
/// # Examples
///
/// ```
/// use bilda::corpus::{Corpus, Vocabulary};
///
/// let words: Vec<String> = ["a", "b", "c"].iter().map(|w| w.to_string()).collect();
/// let vocab = Vocabulary::with_primary_count(words, 2).unwrap();
/// let corpus = Corpus::new(vocab, vec![vec![0, 1]], vec![vec![2, 0]]).unwrap();
///
/// assert_eq!(corpus.n_documents(), 2);
/// assert_eq!(corpus.n_primary_documents(), 1);
/// assert_eq!(corpus.n_tokens(), 4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpus {
    vocabulary: Vocabulary,
    documents: Vec<Vec<WordId>>,
    n_primary_documents: usize,
}

impl Corpus {
    /// Combines a vocabulary with primary and secondary documents.
    ///
    /// # Errors
    ///
    /// Returns an error if a token is outside the vocabulary, if a primary
    /// document uses a non-primary word, or if there are no primary documents
    /// or no primary words.
    pub fn new(
        vocabulary: Vocabulary,
        primary: Vec<Vec<WordId>>,
        secondary: Vec<Vec<WordId>>,
    ) -> Result<Self> {
        if primary.is_empty() {
            return Err(BildaError::Corpus("no primary documents".to_string()));
        }
        if vocabulary.n_primary() == 0 {
            return Err(BildaError::Corpus(
                "vocabulary has no primary-language words".to_string(),
            ));
        }

        let v = vocabulary.len();
        let n_primary_words = vocabulary.n_primary();
        for (m, doc) in primary.iter().enumerate() {
            if let Some(&w) = doc.iter().find(|&&w| w >= n_primary_words) {
                return Err(BildaError::Corpus(format!(
                    "primary document {m} uses word {w} outside the primary vocabulary (size {n_primary_words})"
                )));
            }
        }
        for (j, doc) in secondary.iter().enumerate() {
            if let Some(&w) = doc.iter().find(|&&w| w >= v) {
                return Err(BildaError::Corpus(format!(
                    "secondary document {j} uses word {w} outside the vocabulary (size {v})"
                )));
            }
        }

        let n_primary_documents = primary.len();
        let mut documents = primary;
        documents.extend(secondary);

        Ok(Self {
            vocabulary,
            documents,
            n_primary_documents,
        })
    }

    /// Assembles a corpus without validation, for driving the sampler into
    /// states that [`Corpus::new`] rejects.
    #[cfg(test)]
    pub(crate) fn from_parts_unchecked(
        vocabulary: Vocabulary,
        primary: Vec<Vec<WordId>>,
        secondary: Vec<Vec<WordId>>,
    ) -> Self {
        let n_primary_documents = primary.len();
        let mut documents = primary;
        documents.extend(secondary);
        Self {
            vocabulary,
            documents,
            n_primary_documents,
        }
    }

    /// Loads a vocabulary file and two document files.
    ///
    /// # Errors
    ///
    /// Propagates I/O, parse and validation errors.
    pub fn load(
        vocabulary_path: &Path,
        primary_path: &Path,
        secondary_path: &Path,
        primary_tag: &str,
    ) -> Result<Self> {
        let vocabulary = Vocabulary::load(vocabulary_path, primary_tag)?;
        let primary = read_documents(primary_path)?;
        let secondary = read_documents(secondary_path)?;
        tracing::info!(
            vocabulary = vocabulary.len(),
            primary_words = vocabulary.n_primary(),
            primary_documents = primary.len(),
            secondary_documents = secondary.len(),
            "loaded corpus"
        );
        Self::new(vocabulary, primary, secondary)
    }

    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Total number of documents (D).
    #[must_use]
    pub fn n_documents(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn n_primary_documents(&self) -> usize {
        self.n_primary_documents
    }

    /// Tokens of document `m`.
    #[must_use]
    pub fn document(&self, m: usize) -> &[WordId] {
        &self.documents[m]
    }

    #[must_use]
    pub fn documents(&self) -> &[Vec<WordId>] {
        &self.documents
    }

    /// Total token count across all documents.
    #[must_use]
    pub fn n_tokens(&self) -> usize {
        self.documents.iter().map(Vec::len).sum()
    }
}
