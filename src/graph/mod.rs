//! Word-similarity graph in cache-friendly CSR form.
//!
//! Edges link translation-equivalent words across the two languages. The
//! prior objective pulls the topic log-weights of linked words together, so
//! the graph only ever needs undirected neighbor lookups and the smoothness
//! sum over its edges.
//!
//! # Examples
//!
//! ```
//! use bilda::graph::SimilarityGraph;
//!
//! let g = SimilarityGraph::from_edges(&[(0, 1), (1, 2)], 3);
//! assert_eq!(g.neighbors(1), &[0, 2]);
//! assert_eq!(g.num_edges(), 2);
//! ```

mod dictionary;
mod edges;

pub use dictionary::DictionaryGraphBuilder;
pub use edges::{EdgeList, DEFAULT_DELIMITER};

use crate::corpus::WordId;

/// Undirected graph over word ids using CSR adjacency.
///
/// Self-loops, duplicate edges and edges with an endpoint outside
/// `0..num_nodes` are dropped at construction, so every stored edge appears
/// exactly once in each endpoint's neighbor list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarityGraph {
    row_ptr: Vec<usize>,
    col_indices: Vec<WordId>,
    n_nodes: usize,
    n_edges: usize,
}

impl SimilarityGraph {
    /// Graph with `n_nodes` isolated nodes.
    #[must_use]
    pub fn empty(n_nodes: usize) -> Self {
        Self {
            row_ptr: vec![0; n_nodes + 1],
            col_indices: Vec::new(),
            n_nodes,
            n_edges: 0,
        }
    }

    /// Build the graph from an undirected edge list over `n_nodes` words.
    ///
    /// # Arguments
    /// * `edges` - Slice of (source, target) tuples, either orientation
    /// * `n_nodes` - Number of nodes; edges touching ids `>= n_nodes` are skipped
    ///
    /// # Examples
    /// ```
    /// use bilda::graph::SimilarityGraph;
    ///
    /// // (1, 0) duplicates (0, 1), (2, 2) is a self-loop, (0, 5) is out of range
    /// let g = SimilarityGraph::from_edges(&[(0, 1), (1, 0), (2, 2), (0, 5)], 3);
    /// assert_eq!(g.num_edges(), 1);
    /// assert_eq!(g.neighbors(0), &[1]);
    /// assert!(g.neighbors(2).is_empty());
    /// ```
    #[must_use]
    pub fn from_edges(edges: &[(WordId, WordId)], n_nodes: usize) -> Self {
        let mut adj_list: Vec<Vec<WordId>> = vec![Vec::new(); n_nodes];
        for &(source, target) in edges {
            if source == target || source >= n_nodes || target >= n_nodes {
                continue;
            }
            adj_list[source].push(target);
            adj_list[target].push(source);
        }

        for neighbors in &mut adj_list {
            neighbors.sort_unstable();
            neighbors.dedup();
        }

        let mut row_ptr = Vec::with_capacity(n_nodes + 1);
        let mut col_indices = Vec::new();

        row_ptr.push(0);
        for neighbors in &adj_list {
            col_indices.extend_from_slice(neighbors);
            row_ptr.push(col_indices.len());
        }

        // each undirected edge is stored twice
        let n_edges = col_indices.len() / 2;

        Self {
            row_ptr,
            col_indices,
            n_nodes,
            n_edges,
        }
    }

    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.n_nodes
    }

    /// Number of distinct undirected edges.
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.n_edges
    }

    /// Neighbors of `v` in ascending order; empty for out-of-range ids.
    #[must_use]
    pub fn neighbors(&self, v: WordId) -> &[WordId] {
        if v >= self.n_nodes {
            return &[];
        }
        &self.col_indices[self.row_ptr[v]..self.row_ptr[v + 1]]
    }

    /// Iterates every undirected edge once as `(a, b)` with `a < b`.
    pub fn edges(&self) -> impl Iterator<Item = (WordId, WordId)> + '_ {
        (0..self.n_nodes).flat_map(move |a| {
            self.neighbors(a)
                .iter()
                .filter(move |&&b| b > a)
                .map(move |&b| (a, b))
        })
    }

    /// Sum of squared differences of `values` across edges, each edge once.
    ///
    /// # Panics
    ///
    /// Panics if `values` is shorter than the number of nodes.
    #[must_use]
    pub fn penalty(&self, values: &[f64]) -> f64 {
        self.edges()
            .map(|(a, b)| {
                let d = values[a] - values[b];
                d * d
            })
            .sum()
    }

    /// Adds `scale * Σ_{j ∈ N(i)} (values[i] - values[j])` to `out[i]` for every node.
    ///
    /// With `scale = 2` this is the gradient of [`penalty`](Self::penalty).
    pub fn add_penalty_gradient(&self, values: &[f64], scale: f64, out: &mut [f64]) {
        for (i, slot) in out.iter_mut().enumerate().take(self.n_nodes) {
            let vi = values[i];
            let diff: f64 = self.neighbors(i).iter().map(|&j| vi - values[j]).sum();
            *slot += scale * diff;
        }
    }
}
