//! Error types for bilda operations.
//!
//! Configuration problems are rejected before the first sweep, input problems
//! surface at load time, and optimizer failures abort the run.

use std::path::PathBuf;

use thiserror::Error;

use crate::optim::ConvergenceStatus;

/// Main error type for bilda operations.
///
/// # Examples
///
/// ```
/// use bilda::error::BildaError;
///
/// let err = BildaError::InvalidHyperparameter {
///     param: "n_topics".to_string(),
///     value: "0".to_string(),
///     constraint: "> 0".to_string(),
/// };
/// assert!(err.to_string().contains("n_topics"));
/// ```
#[derive(Debug, Error)]
pub enum BildaError {
    /// Invalid sampler or optimizer configuration.
    #[error("Invalid hyperparameter: {param} = {value}, expected {constraint}")]
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Malformed input file (vocabulary, documents, graph, dictionary).
    #[error("Parse error in {}{}: {cause}", .file.display(), line_suffix(.line))]
    Parse {
        /// Offending file
        file: PathBuf,
        /// 1-based line number, if known
        line: Option<usize>,
        /// What went wrong
        cause: String,
    },

    /// Structurally inconsistent corpus.
    #[error("Invalid corpus: {0}")]
    Corpus(String),

    /// The prior optimizer reported a line-search or numerical failure.
    #[error("Prior optimization failed with status {status:?} after {iterations} iterations (objective = {objective})")]
    OptimizationFailed {
        /// Status reported by the optimizer
        status: ConvergenceStatus,
        /// Iterations performed before the failure
        iterations: usize,
        /// Last finite objective value
        objective: f64,
    },

    /// Array dimensions don't match.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// I/O error (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl BildaError {
    /// Create an invalid hyperparameter error.
    #[must_use]
    pub fn invalid_hyperparameter(param: &str, value: impl ToString, constraint: &str) -> Self {
        Self::InvalidHyperparameter {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }

    /// Create a dimension mismatch error with descriptive context.
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create a parse error for `file` at an optional 1-based line.
    #[must_use]
    pub fn parse(file: impl Into<PathBuf>, line: Option<usize>, cause: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            line,
            cause: cause.into(),
        }
    }
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(":{l}")).unwrap_or_default()
}

impl From<serde_json::Error> for BildaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, BildaError>;
