//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use bilda::prelude::*;
//! ```

pub use crate::corpus::{Corpus, Vocabulary, WordId};
pub use crate::error::{BildaError, Result};
pub use crate::graph::{DictionaryGraphBuilder, EdgeList, SimilarityGraph};
pub use crate::primitives::{Matrix, Vector};
pub use crate::report::{CsvReportWriter, MemorySink, NullSink, SnapshotSink};
pub use crate::topic::{GibbsSampler, OptimizerConfig, Phase, SamplerConfig};
