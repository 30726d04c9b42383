//! Builds the cross-lingual edge list from a bilingual dictionary.

use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::EdgeList;
use crate::corpus::{split_tag, Vocabulary, WordId};
use crate::error::Result;

/// Links primary-language words to their dictionary translations.
///
/// Each dictionary line is `source<TAB>target`. Every primary-tagged symbol
/// whose stem equals `source` is linked with every non-primary symbol whose
/// stem equals `target`. Lines with fewer than two fields are ignored, as are
/// entries whose words are missing from the vocabulary.
///
/// # Examples
///
/// ```
/// use bilda::corpus::Vocabulary;
/// use bilda::graph::DictionaryGraphBuilder;
///
/// let words = ["dog(en)", "cat(en)", "chien(fr)", "chat(fr)"]
///     .iter()
///     .map(|w| w.to_string())
///     .collect();
/// let vocab = Vocabulary::from_tagged(words, "en").unwrap();
///
/// let builder = DictionaryGraphBuilder::new(&vocab, "en");
/// let edges = builder.build_from_entries([("dog", "chien"), ("cat", "chat"), ("bird", "oiseau")]);
/// assert_eq!(edges.as_slice(), &[(0, 2), (1, 3)]);
/// ```
#[derive(Debug)]
pub struct DictionaryGraphBuilder {
    primary: HashMap<String, Vec<WordId>>,
    secondary: HashMap<String, Vec<WordId>>,
}

impl DictionaryGraphBuilder {
    /// Indexes the vocabulary stems by language side.
    #[must_use]
    pub fn new(vocabulary: &Vocabulary, primary_tag: &str) -> Self {
        let mut primary: HashMap<String, Vec<WordId>> = HashMap::new();
        let mut secondary: HashMap<String, Vec<WordId>> = HashMap::new();
        for (id, symbol) in vocabulary.words().iter().enumerate() {
            let (stem, tag) = split_tag(symbol);
            let side = if tag == Some(primary_tag) {
                &mut primary
            } else {
                &mut secondary
            };
            side.entry(stem.to_string()).or_default().push(id);
        }
        Self { primary, secondary }
    }

    /// Edges for an in-memory list of `(source, target)` entries, in entry order.
    pub fn build_from_entries<'a, I>(&self, entries: I) -> EdgeList
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut edges = Vec::new();
        for (source, target) in entries {
            let (Some(sources), Some(targets)) =
                (self.primary.get(source), self.secondary.get(target))
            else {
                continue;
            };
            for &a in sources {
                edges.extend(targets.iter().map(|&b| (a, b)));
            }
        }
        edges.sort_unstable();
        edges.dedup();
        EdgeList::new(edges)
    }

    /// Reads a tab-separated dictionary file and builds its edges.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn build_from_file(&self, dictionary: &Path) -> Result<EdgeList> {
        let reader = BufReader::new(std::fs::File::open(dictionary)?);
        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let mut fields = line.trim_end_matches('\r').split('\t');
            if let (Some(source), Some(target)) = (fields.next(), fields.next()) {
                entries.push((source.trim().to_string(), target.trim().to_string()));
            }
        }
        let edges = self.build_from_entries(entries.iter().map(|(s, t)| (s.as_str(), t.as_str())));
        tracing::info!(
            entries = entries.len(),
            edges = edges.len(),
            "built similarity graph from dictionary"
        );
        Ok(edges)
    }
}
