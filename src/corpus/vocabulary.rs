//! Ordered vocabulary with a primary-language prefix.

use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BildaError, Result};

/// Vocabulary index of a word.
pub type WordId = usize;

/// Default language tag of the first (initially active) partition.
pub const DEFAULT_PRIMARY_TAG: &str = "en";

/// Ordered list of word symbols.
///
/// Symbols conventionally carry a language tag suffix such as `house(en)` or
/// `maison(fr)`. The first `n_primary` symbols belong to the primary language
/// and are the only ones modeled until the second partition is folded in.
///
/// # Examples
///
/// ```
/// use bilda::corpus::Vocabulary;
///
/// let words = vec!["house(en)".to_string(), "cat(en)".to_string(), "chat(fr)".to_string()];
/// let vocab = Vocabulary::from_tagged(words, "en").expect("primary words form a prefix");
/// assert_eq!(vocab.len(), 3);
/// assert_eq!(vocab.n_primary(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    words: Vec<String>,
    n_primary: usize,
}

impl Vocabulary {
    /// Builds a vocabulary whose primary prefix is given explicitly.
    ///
    /// # Errors
    ///
    /// Returns an error if `n_primary` exceeds the number of words.
    pub fn with_primary_count(words: Vec<String>, n_primary: usize) -> Result<Self> {
        if n_primary > words.len() {
            return Err(BildaError::Corpus(format!(
                "primary vocabulary size {n_primary} exceeds vocabulary size {}",
                words.len()
            )));
        }
        Ok(Self { words, n_primary })
    }

    /// Builds a vocabulary, counting symbols tagged `(primary_tag)` as primary.
    ///
    /// # Errors
    ///
    /// Returns an error if a primary-tagged symbol follows a non-primary one.
    pub fn from_tagged(words: Vec<String>, primary_tag: &str) -> Result<Self> {
        let is_primary = |w: &str| split_tag(w).1 == Some(primary_tag);
        let n_primary = words.iter().take_while(|w| is_primary(w)).count();

        if let Some(pos) = words[n_primary..].iter().position(|w| is_primary(w)) {
            return Err(BildaError::Corpus(format!(
                "word {} ({}) is tagged ({primary_tag}) but follows non-primary words",
                n_primary + pos,
                words[n_primary + pos]
            )));
        }

        Ok(Self { words, n_primary })
    }

    /// Reads a vocabulary file with one symbol per line.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or if the primary words are not a prefix.
    pub fn load(path: &Path, primary_tag: &str) -> Result<Self> {
        let reader = BufReader::new(std::fs::File::open(path)?);
        let mut words = Vec::new();
        for line in reader.lines() {
            let line = line?;
            words.push(line.trim_end_matches('\r').to_string());
        }
        if words.is_empty() {
            return Err(BildaError::parse(path, None, "vocabulary is empty"));
        }
        Self::from_tagged(words, primary_tag)
    }

    /// Number of symbols (V).
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True if there are no symbols.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Size of the primary-language prefix.
    #[must_use]
    pub fn n_primary(&self) -> usize {
        self.n_primary
    }

    /// Symbol at `id`.
    #[must_use]
    pub fn word(&self, id: WordId) -> &str {
        &self.words[id]
    }

    /// All symbols in vocabulary order.
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }
}

/// Splits `stem(tag)` into its stem and tag; untagged symbols have no tag.
///
/// ```
/// use bilda::corpus::split_tag;
///
/// assert_eq!(split_tag("house(en)"), ("house", Some("en")));
/// assert_eq!(split_tag("plain"), ("plain", None));
/// ```
#[must_use]
pub fn split_tag(symbol: &str) -> (&str, Option<&str>) {
    if let Some(body) = symbol.strip_suffix(')') {
        if let Some(open) = body.rfind('(') {
            return (&body[..open], Some(&body[open + 1..]));
        }
    }
    (symbol, None)
}
