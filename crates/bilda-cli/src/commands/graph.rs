//! `bilda graph`: build the similarity graph file from a dictionary.

use std::path::Path;

use bilda::corpus::Vocabulary;
use bilda::graph::DictionaryGraphBuilder;

use crate::error::{require_file, Result};

pub(crate) fn run(
    vocab: &Path,
    dictionary: &Path,
    output: &Path,
    delimiter: &str,
    primary_tag: &str,
) -> Result<()> {
    require_file(vocab)?;
    require_file(dictionary)?;

    let vocabulary = Vocabulary::load(vocab, primary_tag)?;
    let edges = DictionaryGraphBuilder::new(&vocabulary, primary_tag).build_from_file(dictionary)?;
    edges.write(output, delimiter)?;

    println!("Wrote {} edges to {}", edges.len(), output.display());
    Ok(())
}
