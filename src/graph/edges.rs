//! Edge-list files shared by the dictionary builder and the sampler.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use super::SimilarityGraph;
use crate::corpus::WordId;
use crate::error::{BildaError, Result};

/// Default field delimiter of a graph file.
pub const DEFAULT_DELIMITER: &str = "\t";

/// Undirected word-pair list, kept in file order.
///
/// The list stays small next to the count matrices, so the sampler holds on
/// to it and rebuilds the CSR adjacency whenever the active vocabulary grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeList {
    edges: Vec<(WordId, WordId)>,
}

impl EdgeList {
    #[must_use]
    pub fn new(edges: Vec<(WordId, WordId)>) -> Self {
        Self { edges }
    }

    /// Reads a graph file: one `a<delimiter>b` pair per line, blank lines skipped.
    ///
    /// # Errors
    ///
    /// Returns a parse error for lines without two integer fields.
    pub fn load(path: &Path, delimiter: &str) -> Result<Self> {
        let reader = BufReader::new(std::fs::File::open(path)?);
        let mut edges = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let edge = parse_edge(line, delimiter).ok_or_else(|| {
                BildaError::parse(
                    path,
                    Some(idx + 1),
                    format!("expected two word indices separated by {delimiter:?}, got {line:?}"),
                )
            })?;
            edges.push(edge);
        }
        Ok(Self { edges })
    }

    /// Writes the list in the format read by [`EdgeList::load`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self, path: &Path, delimiter: &str) -> Result<()> {
        let mut out = BufWriter::new(std::fs::File::create(path)?);
        for &(a, b) in &self.edges {
            writeln!(out, "{a}{delimiter}{b}")?;
        }
        out.flush()?;
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[(WordId, WordId)] {
        &self.edges
    }
}

impl SimilarityGraph {
    /// Adjacency over the word prefix `0..size`; edges leaving the prefix are dropped.
    ///
    /// # Examples
    /// ```
    /// use bilda::graph::{EdgeList, SimilarityGraph};
    ///
    /// let edges = EdgeList::new(vec![(0, 1), (0, 3)]);
    /// assert_eq!(SimilarityGraph::restricted(&edges, 2).num_edges(), 1);
    /// assert_eq!(SimilarityGraph::restricted(&edges, 4).num_edges(), 2);
    /// ```
    #[must_use]
    pub fn restricted(edges: &EdgeList, size: usize) -> Self {
        Self::from_edges(edges.as_slice(), size)
    }
}

fn parse_edge(line: &str, delimiter: &str) -> Option<(WordId, WordId)> {
    let mut fields = line.split(delimiter).map(str::trim).filter(|f| !f.is_empty());
    let a = fields.next()?.parse().ok()?;
    let b = fields.next()?.parse().ok()?;
    Some((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_load_with_custom_delimiter() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("graph.txt");
        let edges = EdgeList::new(vec![(0, 5), (2, 7)]);
        edges.write(&path, ",").expect("write");

        let text = std::fs::read_to_string(&path).expect("read");
        assert_eq!(text, "0,5\n2,7\n");
        assert_eq!(EdgeList::load(&path, ",").expect("load"), edges);
    }

    #[test]
    fn test_load_skips_blank_lines() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("graph.txt");
        std::fs::write(&path, "0\t1\n\n2\t3\r\n").expect("write");
        let edges = EdgeList::load(&path, DEFAULT_DELIMITER).expect("load");
        assert_eq!(edges.as_slice(), &[(0, 1), (2, 3)]);
    }

    #[test]
    fn test_load_reports_bad_line() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("graph.txt");
        std::fs::write(&path, "0\t1\n4\n").expect("write");
        let err = EdgeList::load(&path, DEFAULT_DELIMITER).expect_err("one field");
        assert!(err.to_string().contains("graph.txt:2"));
    }

    #[test]
    fn test_restricted_grows_with_prefix() {
        let edges = EdgeList::new(vec![(0, 2), (1, 3), (0, 1)]);
        let small = SimilarityGraph::restricted(&edges, 2);
        let full = SimilarityGraph::restricted(&edges, 4);
        assert_eq!(small.neighbors(0), &[1]);
        assert_eq!(full.neighbors(0), &[1, 2]);
        assert_eq!(full.neighbors(3), &[1]);
    }
}
