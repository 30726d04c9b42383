//! Bilingual topic model with a learned, graph-regularized prior.
//!
//! The model is LDA with an asymmetric topic-word prior
//! `Beta[k][i] = exp(Y[k][i] + Yword[i])`. Topic assignments are drawn by a
//! collapsed Gibbs sampler; every few sweeps the prior is refitted by L-BFGS
//! against the current counts, with a smoothness penalty tying together the
//! log-weights of dictionary-linked words across the two languages.
//!
//! # Quick Start
//!
//! ```
//! use bilda::corpus::{Corpus, Vocabulary};
//! use bilda::graph::EdgeList;
//! use bilda::report::NullSink;
//! use bilda::topic::{GibbsSampler, SamplerConfig};
//!
//! let words = ["a(en)", "b(en)", "c(fr)"].iter().map(|w| w.to_string()).collect();
//! let vocab = Vocabulary::from_tagged(words, "en").expect("primary prefix");
//! let corpus = Corpus::new(vocab, vec![vec![0, 1], vec![1, 1]], vec![vec![2, 2]])
//!     .expect("valid corpus");
//!
//! let config = SamplerConfig::new(2)
//!     .with_n_iterations(6)
//!     .with_burn_in(3)
//!     .with_optimization_interval(3)
//!     .with_seed(1);
//! let mut sampler = GibbsSampler::new(config, corpus, EdgeList::default()).expect("valid config");
//! sampler.run(&mut NullSink).expect("run succeeds");
//!
//! let theta = sampler.estimates().theta;
//! assert_eq!(theta.n_rows(), 3);
//! ```

mod config;
mod estimates;
mod objective;
mod prior;
mod sampler;
mod state;

pub use config::{OptimizerConfig, SamplerConfig};
pub use estimates::{Estimates, Snapshot};
pub use objective::PriorObjective;
pub use prior::PriorFields;
pub use sampler::{sample_categorical, sample_with_uniform, GibbsSampler, Phase};
pub use state::CountState;

#[cfg(test)]
mod tests;
