//! Error types for bilda-cli

use std::path::PathBuf;
use std::process::ExitCode;

use bilda::BildaError;
use thiserror::Error;

/// Result type alias for CLI operations
pub(crate) type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// Input file not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Rejected configuration or flag combination
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed or inconsistent input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The prior optimizer aborted the run
    #[error("Training failed: {0}")]
    TrainingFailed(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Get exit code for this error
    pub(crate) fn exit_code(&self) -> ExitCode {
        match self {
            Self::TrainingFailed(_) => ExitCode::from(1),
            Self::FileNotFound(_) => ExitCode::from(3),
            Self::InvalidInput(_) => ExitCode::from(4),
            Self::InvalidConfig(_) => ExitCode::from(5),
            Self::Io(_) => ExitCode::from(7),
        }
    }
}

impl From<BildaError> for CliError {
    fn from(e: BildaError) -> Self {
        match e {
            BildaError::Io(io) => Self::Io(io),
            BildaError::InvalidHyperparameter { .. } | BildaError::Serialization(_) => {
                Self::InvalidConfig(e.to_string())
            }
            BildaError::Parse { .. }
            | BildaError::Corpus(_)
            | BildaError::DimensionMismatch { .. } => Self::InvalidInput(e.to_string()),
            BildaError::OptimizationFailed { .. } => Self::TrainingFailed(e.to_string()),
        }
    }
}

/// Fails with [`CliError::FileNotFound`] unless `path` is an existing file.
pub(crate) fn require_file(path: &std::path::Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CliError::FileNotFound(path.to_path_buf()))
    }
}
