//! Flat-file document reader.
//!
//! A document file is a sequence of blocks. Each block starts with a header
//! line whose second whitespace-separated field is the number of lines that
//! follow; each following line holds space-separated vocabulary indices.
//!
//! ```text
//! 0 2
//! 4 5 1
//! 2
//! 1 1
//! 0
//! ```

use std::io::{BufRead, BufReader};
use std::path::Path;

use super::WordId;
use crate::error::{BildaError, Result};

/// Reads every document of a document file.
///
/// # Errors
///
/// Returns a parse error for a malformed header, a truncated block, or a
/// non-numeric token.
pub fn read_documents(path: &Path) -> Result<Vec<Vec<WordId>>> {
    let reader = BufReader::new(std::fs::File::open(path)?);
    parse_documents(reader, path)
}

/// Parses documents from any buffered reader; `path` is only used in errors.
///
/// # Errors
///
/// See [`read_documents`].
pub fn parse_documents<R: BufRead>(reader: R, path: &Path) -> Result<Vec<Vec<WordId>>> {
    let mut lines = reader.lines().enumerate();
    let mut documents = Vec::new();

    while let Some((line_idx, header)) = lines.next() {
        let header = header?;
        if header.trim().is_empty() {
            continue;
        }
        let n_lines = parse_header(&header).ok_or_else(|| {
            BildaError::parse(
                path,
                Some(line_idx + 1),
                format!("expected '<id> <line count>' header, got {header:?}"),
            )
        })?;

        let mut document = Vec::new();
        for _ in 0..n_lines {
            let (idx, line) = lines.next().ok_or_else(|| {
                BildaError::parse(
                    path,
                    None,
                    format!("document starting at line {} is truncated", line_idx + 1),
                )
            })?;
            let line = line?;
            for token in line.split_whitespace() {
                let word = token.parse::<WordId>().map_err(|_| {
                    BildaError::parse(path, Some(idx + 1), format!("invalid word index {token:?}"))
                })?;
                document.push(word);
            }
        }
        documents.push(document);
    }

    Ok(documents)
}

fn parse_header(header: &str) -> Option<usize> {
    header.split_whitespace().nth(1)?.parse().ok()
}
