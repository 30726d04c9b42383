//! bilda - bilingual topic model trainer
//!
//! Usage:
//!   bilda graph --vocab WordList.txt --dictionary en-fr.txt --output graph.txt
//!   bilda train --vocab WordList.txt --primary-docs docs_en.txt \
//!       --secondary-docs docs_fr.txt --graph graph.txt --output out/ -k 50

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;

use commands::{graph, train};

/// bilda - Bilingual LDA with a graph-regularized learned prior
#[derive(Parser)]
#[command(name = "bilda")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (per-sweep logging)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the model and write snapshot reports
    Train(train::TrainArgs),

    /// Build the similarity graph from a bilingual dictionary
    Graph {
        /// Vocabulary file, one tagged symbol per line
        #[arg(long, value_name = "FILE")]
        vocab: PathBuf,

        /// Dictionary file, `source<TAB>target` per line
        #[arg(long, value_name = "FILE")]
        dictionary: PathBuf,

        /// Graph file to write
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Field delimiter of the graph file
        #[arg(long, default_value = "\t")]
        delimiter: String,

        /// Language tag of the primary vocabulary
        #[arg(long, default_value = bilda::corpus::DEFAULT_PRIMARY_TAG)]
        primary_tag: String,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "bilda=debug,bilda_cli=debug"
    } else {
        "bilda=info,bilda_cli=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Train(args) => train::run(&args),
        Commands::Graph {
            vocab,
            dictionary,
            output,
            delimiter,
            primary_tag,
        } => graph::run(&vocab, &dictionary, &output, &delimiter, &primary_tag),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}
