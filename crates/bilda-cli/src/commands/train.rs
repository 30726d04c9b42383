//! `bilda train`: run the sampler and write CSV snapshots.

use std::path::PathBuf;

use bilda::corpus::Corpus;
use bilda::graph::{DictionaryGraphBuilder, EdgeList};
use bilda::report::CsvReportWriter;
use bilda::topic::{GibbsSampler, SamplerConfig};
use clap::Args;
use tracing::{info, warn};

use crate::error::{require_file, Result};

/// File name of the graph written next to the reports when built from a dictionary.
const GRAPH_FILE: &str = "graph.txt";

#[derive(Args, Debug)]
pub(crate) struct TrainArgs {
    /// Vocabulary file, one tagged symbol per line
    #[arg(long, value_name = "FILE")]
    pub vocab: PathBuf,

    /// Documents of the primary language (active from the first sweep)
    #[arg(long, value_name = "FILE")]
    pub primary_docs: PathBuf,

    /// Documents of the secondary language (folded in mid-run)
    #[arg(long, value_name = "FILE")]
    pub secondary_docs: PathBuf,

    /// Precomputed similarity graph
    #[arg(long, value_name = "FILE", conflicts_with = "dictionary")]
    pub graph: Option<PathBuf>,

    /// Bilingual dictionary to build the similarity graph from
    #[arg(long, value_name = "FILE")]
    pub dictionary: Option<PathBuf>,

    /// Output directory for snapshot reports
    #[arg(short, long, value_name = "DIR")]
    pub output: PathBuf,

    /// JSON sampler configuration; flags below override it
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Field delimiter of the graph file
    #[arg(long, default_value = "\t")]
    pub delimiter: String,

    /// Language tag of the primary vocabulary
    #[arg(long, default_value = bilda::corpus::DEFAULT_PRIMARY_TAG)]
    pub primary_tag: String,

    /// Number of topics
    #[arg(short = 'k', long)]
    pub topics: Option<usize>,

    #[arg(long)]
    pub alpha: Option<f64>,

    /// Total number of sweeps
    #[arg(long)]
    pub iterations: Option<usize>,

    #[arg(long)]
    pub burn_in: Option<usize>,

    #[arg(long)]
    pub optimization_interval: Option<usize>,

    #[arg(long)]
    pub snapshot_interval: Option<usize>,

    /// Sweep at which the secondary documents are added
    #[arg(long)]
    pub extension_at: Option<usize>,

    #[arg(long)]
    pub lambda_topic: Option<f64>,

    #[arg(long)]
    pub lambda_word: Option<f64>,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Ranks per topic in the top-words table
    #[arg(long, default_value_t = bilda::report::DEFAULT_TOP_WORDS)]
    pub top_words: usize,

    /// Also write the full theta and phi matrices
    #[arg(long)]
    pub matrices: bool,
}

impl TrainArgs {
    fn sampler_config(&self) -> Result<SamplerConfig> {
        let mut config = match &self.config {
            Some(path) => {
                require_file(path)?;
                SamplerConfig::from_json_file(path)?
            }
            None => SamplerConfig::default(),
        };

        if let Some(k) = self.topics {
            config.n_topics = k;
        }
        if let Some(alpha) = self.alpha {
            config.alpha = alpha;
        }
        if let Some(n) = self.iterations {
            config.n_iterations = n;
        }
        if let Some(b) = self.burn_in {
            config.burn_in = b;
        }
        if let Some(i) = self.optimization_interval {
            config.optimization_interval = i;
        }
        if let Some(i) = self.snapshot_interval {
            config.snapshot_interval = i;
        }
        if let Some(sweep) = self.extension_at {
            config.extension_at = Some(sweep);
        }
        if let Some(l) = self.lambda_topic {
            config.lambda_topic = l;
        }
        if let Some(l) = self.lambda_word {
            config.lambda_word = l;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }

        config.validate()?;
        Ok(config)
    }
}

pub(crate) fn run(args: &TrainArgs) -> Result<()> {
    require_file(&args.vocab)?;
    require_file(&args.primary_docs)?;
    require_file(&args.secondary_docs)?;

    let config = args.sampler_config()?;
    let corpus = Corpus::load(
        &args.vocab,
        &args.primary_docs,
        &args.secondary_docs,
        &args.primary_tag,
    )?;

    let mut writer = CsvReportWriter::new(&args.output)?
        .with_top_words(args.top_words)
        .with_matrices(args.matrices);

    let edges = match (&args.graph, &args.dictionary) {
        (Some(graph), _) => {
            require_file(graph)?;
            EdgeList::load(graph, &args.delimiter)?
        }
        (None, Some(dictionary)) => {
            require_file(dictionary)?;
            let edges = DictionaryGraphBuilder::new(corpus.vocabulary(), &args.primary_tag)
                .build_from_file(dictionary)?;
            edges.write(&writer.dir().join(GRAPH_FILE), &args.delimiter)?;
            edges
        }
        (None, None) => {
            warn!("no graph or dictionary given; training without graph regularization");
            EdgeList::default()
        }
    };
    info!(edges = edges.len(), "loaded similarity edges");

    let n_iterations = config.n_iterations;
    let mut sampler = GibbsSampler::new(config, corpus, edges)?;
    sampler.run(&mut writer)?;

    println!(
        "Finished {n_iterations} sweeps; reports written to {}",
        args.output.display()
    );
    Ok(())
}
