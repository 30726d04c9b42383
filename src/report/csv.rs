//! CSV reports in the layout used by the topic-browsing spreadsheets.
//!
//! Per snapshot iteration `N` the writer produces:
//!
//! - `N-TopWords.csv`: header `T0,T1,…,`, then one row per rank holding
//!   `word(phi),` for every topic.
//! - `N-beta.csv`: header `,T0,T1,…`, then one row per active word holding
//!   `word(yword),` followed by `beta(y),` for every topic.
//! - optionally `N-DocumentTopic.csv` and `N-TopicWords.csv`, the raw
//!   `theta` and `phi` matrices.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::SnapshotSink;
use crate::error::Result;
use crate::primitives::Matrix;
use crate::topic::Snapshot;

/// Ranks written per topic in the top-words table.
pub const DEFAULT_TOP_WORDS: usize = 100;

/// Writes snapshot tables into one output directory.
///
/// # Examples
///
/// ```no_run
/// use bilda::report::CsvReportWriter;
///
/// let writer = CsvReportWriter::new("out")
///     .expect("output directory")
///     .with_top_words(30)
///     .with_matrices(true);
/// ```
#[derive(Debug, Clone)]
pub struct CsvReportWriter {
    dir: PathBuf,
    top_words: usize,
    matrices: bool,
}

impl CsvReportWriter {
    /// Creates `dir` (and parents) if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            top_words: DEFAULT_TOP_WORDS,
            matrices: false,
        })
    }

    #[must_use]
    pub fn with_top_words(mut self, n: usize) -> Self {
        self.top_words = n;
        self
    }

    /// Also write the full `theta` and `phi` matrices.
    #[must_use]
    pub fn with_matrices(mut self, enabled: bool) -> Self {
        self.matrices = enabled;
        self
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, iteration: usize, name: &str) -> PathBuf {
        self.dir.join(format!("{iteration}-{name}.csv"))
    }

    fn write_top_words(&self, path: &Path, snapshot: &Snapshot<'_>) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        let k_topics = snapshot.n_topics();
        for k in 0..k_topics {
            write!(out, "T{k},")?;
        }
        writeln!(out)?;

        let width = self.top_words.min(snapshot.vocab_size());
        let ranked = snapshot.estimates.top_words(width);
        for rank in 0..width {
            for topic in &ranked {
                let (word, phi) = topic[rank];
                write!(out, "{}({phi:.5}),", snapshot.vocabulary.word(word))?;
            }
            writeln!(out)?;
        }
        out.flush()?;
        Ok(())
    }

    fn write_beta(path: &Path, snapshot: &Snapshot<'_>) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        let prior = snapshot.prior;
        for k in 0..prior.n_topics() {
            write!(out, ",T{k}")?;
        }
        writeln!(out)?;

        for (w, y_word) in prior.y_word().iter().enumerate() {
            write!(out, "{}({y_word:.3}),", snapshot.vocabulary.word(w))?;
            for k in 0..prior.n_topics() {
                write!(out, "{:.3}({:.3}),", prior.beta(k, w), prior.y().get(k, w))?;
            }
            writeln!(out)?;
        }
        out.flush()?;
        Ok(())
    }

    fn write_matrix(path: &Path, matrix: &Matrix<f64>) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        for r in 0..matrix.n_rows() {
            for value in matrix.row(r) {
                write!(out, "{value:.4},")?;
            }
            writeln!(out)?;
        }
        out.flush()?;
        Ok(())
    }
}

impl SnapshotSink for CsvReportWriter {
    fn write_snapshot(&mut self, iteration: usize, snapshot: &Snapshot<'_>) -> Result<()> {
        self.write_top_words(&self.path(iteration, "TopWords"), snapshot)?;
        Self::write_beta(&self.path(iteration, "beta"), snapshot)?;
        if self.matrices {
            Self::write_matrix(
                &self.path(iteration, "DocumentTopic"),
                &snapshot.estimates.theta,
            )?;
            Self::write_matrix(&self.path(iteration, "TopicWords"), &snapshot.estimates.phi)?;
        }
        tracing::debug!(iteration, dir = %self.dir.display(), "wrote csv report");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Vocabulary;
    use crate::primitives::Vector;
    use crate::topic::{Estimates, PriorFields};

    fn snapshot_parts() -> (Vocabulary, PriorFields, Estimates) {
        let words = ["a(en)", "b(en)", "c(fr)"].iter().map(|w| (*w).to_string()).collect();
        let vocab = Vocabulary::from_tagged(words, "en").expect("valid");
        let mut prior = PriorFields::new(2, 2);
        prior
            .unpack(&Vector::from_vec(vec![0.5, 0.0, 0.0, -0.25, 0.0, 1.0]))
            .expect("length matches");
        let estimates = Estimates {
            theta: Matrix::from_vec(1, 2, vec![0.25, 0.75]).expect("shape"),
            phi: Matrix::from_vec(2, 2, vec![0.2, 0.8, 0.6, 0.4]).expect("shape"),
        };
        (vocab, prior, estimates)
    }

    #[test]
    fn test_writes_top_words_and_beta() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (vocab, prior, estimates) = snapshot_parts();
        let snapshot = Snapshot {
            estimates,
            prior: &prior,
            vocabulary: &vocab,
        };
        let mut writer = CsvReportWriter::new(dir.path()).expect("dir");
        writer.write_snapshot(500, &snapshot).expect("write");

        let top = std::fs::read_to_string(dir.path().join("500-TopWords.csv")).expect("top words");
        assert_eq!(top, "T0,T1,\nb(en)(0.80000),a(en)(0.60000),\na(en)(0.20000),b(en)(0.40000),\n");

        let beta = std::fs::read_to_string(dir.path().join("500-beta.csv")).expect("beta");
        let lines: Vec<&str> = beta.lines().collect();
        assert_eq!(lines[0], ",T0,T1");
        assert_eq!(lines[1], "a(en)(0.000),1.649(0.500),1.000(0.000),");
        assert_eq!(lines[2], "b(en)(1.000),2.718(0.000),2.117(-0.250),");
        assert_eq!(lines.len(), 3);
        assert!(!dir.path().join("500-DocumentTopic.csv").exists());
    }

    #[test]
    fn test_top_words_width_is_capped() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (vocab, prior, estimates) = snapshot_parts();
        let snapshot = Snapshot {
            estimates,
            prior: &prior,
            vocabulary: &vocab,
        };
        let mut writer = CsvReportWriter::new(dir.path()).expect("dir").with_top_words(1);
        writer.write_snapshot(7, &snapshot).expect("write");
        let top = std::fs::read_to_string(dir.path().join("7-TopWords.csv")).expect("top words");
        assert_eq!(top.lines().count(), 2);
    }

    #[test]
    fn test_optional_matrices() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (vocab, prior, estimates) = snapshot_parts();
        let snapshot = Snapshot {
            estimates,
            prior: &prior,
            vocabulary: &vocab,
        };
        let mut writer = CsvReportWriter::new(dir.path().join("nested"))
            .expect("dir")
            .with_matrices(true);
        writer.write_snapshot(3, &snapshot).expect("write");

        let theta = std::fs::read_to_string(dir.path().join("nested/3-DocumentTopic.csv"))
            .expect("theta");
        assert_eq!(theta, "0.2500,0.7500,\n");
        let phi =
            std::fs::read_to_string(dir.path().join("nested/3-TopicWords.csv")).expect("phi");
        assert_eq!(phi, "0.2000,0.8000,\n0.6000,0.4000,\n");
    }

    #[test]
    fn test_unwritable_directory_fails() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        // a regular file cannot be used as the output directory
        assert!(CsvReportWriter::new(file.path().join("sub")).is_err());
    }
}
