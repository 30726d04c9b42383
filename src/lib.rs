//! Bilda: bilingual topic modeling with a learned, graph-regularized prior.
//!
//! Bilda fits an LDA model over a corpus written in two languages. The
//! topic-word prior is asymmetric and learned: every few Gibbs sweeps it is
//! refitted by L-BFGS, with a smoothness penalty that keeps dictionary-linked
//! words (translation pairs) at similar prior weight in every topic. The
//! second language is folded in partway through the run.
//!
//! # Quick Start
//!
//! ```
//! use bilda::prelude::*;
//!
//! let words = ["dog(en)", "cat(en)", "chien(fr)", "chat(fr)"]
//!     .iter()
//!     .map(|w| w.to_string())
//!     .collect();
//! let vocab = Vocabulary::from_tagged(words, "en").unwrap();
//! let corpus = Corpus::new(
//!     vocab,
//!     vec![vec![0, 0, 1], vec![1, 1, 0]],
//!     vec![vec![2, 3, 2], vec![3, 3]],
//! )
//! .unwrap();
//! let edges = EdgeList::new(vec![(0, 2), (1, 3)]);
//!
//! let config = SamplerConfig::new(2)
//!     .with_n_iterations(10)
//!     .with_burn_in(2)
//!     .with_optimization_interval(5)
//!     .with_seed(3);
//! let mut sampler = GibbsSampler::new(config, corpus, edges).unwrap();
//! let mut sink = MemorySink::default();
//! sampler.run(&mut sink).unwrap();
//!
//! let last = sink.last().unwrap();
//! assert_eq!(last.iteration, 10);
//! assert_eq!(last.estimates.phi.n_cols(), 4);
//! ```
//!
//! # Modules
//!
//! - [`corpus`]: Vocabulary, documents and their flat-file loaders
//! - [`graph`]: Word-similarity graph and the dictionary edge builder
//! - [`topic`]: Sampler configuration, chain state, prior and sampler
//! - [`optim`]: L-BFGS with Wolfe line search
//! - [`report`]: Snapshot sinks and CSV reports
//! - [`primitives`]: Dense `Matrix` and `Vector`

pub mod corpus;
pub mod error;
pub mod graph;
pub mod optim;
pub mod prelude;
pub mod primitives;
pub mod report;
pub mod topic;

pub use error::{BildaError, Result};
pub use primitives::{Matrix, Vector};
