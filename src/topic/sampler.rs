//! Collapsed Gibbs sampler with a periodically refitted prior.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::config::SamplerConfig;
use super::estimates::{Estimates, Snapshot};
use super::objective::PriorObjective;
use super::prior::PriorFields;
use super::state::CountState;
use crate::corpus::Corpus;
use crate::error::{BildaError, Result};
use crate::graph::{EdgeList, SimilarityGraph};
use crate::optim::{ConvergenceStatus, OptimizationResult, Optimizer, LBFGS};
use crate::report::SnapshotSink;

/// Where the chain is in its schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Primary documents carry random assignments; no sweep has run.
    Initializing,
    /// Sweeps `1..=burn_in`.
    BurnIn,
    /// Sweeps after burn-in.
    Sampling,
    /// All sweeps done and the final snapshot written.
    Finished,
}

/// Bilingual LDA sampler.
///
/// Owns the corpus, the similarity edges and all chain state. Only the
/// primary documents and the primary vocabulary prefix are modeled until the
/// extension sweep, when the secondary documents receive random assignments
/// and every prior array grows to the full vocabulary.
///
/// # Examples
///
/// ```
/// use bilda::corpus::{Corpus, Vocabulary};
/// use bilda::graph::EdgeList;
/// use bilda::report::MemorySink;
/// use bilda::topic::{GibbsSampler, Phase, SamplerConfig};
///
/// let words = ["dog(en)", "cat(en)", "chien(fr)", "chat(fr)"]
///     .iter()
///     .map(|w| w.to_string())
///     .collect();
/// let vocab = Vocabulary::from_tagged(words, "en").unwrap();
/// let corpus = Corpus::new(vocab, vec![vec![0, 1, 0]], vec![vec![2, 3]]).unwrap();
///
/// let config = SamplerConfig::new(2)
///     .with_n_iterations(10)
///     .with_burn_in(2)
///     .with_optimization_interval(5)
///     .with_snapshot_interval(4)
///     .with_seed(42);
/// let mut sampler = GibbsSampler::new(config, corpus, EdgeList::new(vec![(0, 2)])).unwrap();
///
/// let mut sink = MemorySink::default();
/// sampler.run(&mut sink).unwrap();
///
/// assert_eq!(sampler.phase(), Phase::Finished);
/// assert_eq!(sampler.effective_vocab_size(), 4);
/// assert_eq!(sink.iterations(), vec![4, 8, 10]);
/// ```
#[derive(Debug)]
pub struct GibbsSampler {
    config: SamplerConfig,
    corpus: Corpus,
    edges: EdgeList,
    graph: SimilarityGraph,
    state: CountState,
    prior: PriorFields,
    n_active_documents: usize,
    extended: bool,
    iteration: usize,
    phase: Phase,
    rng: StdRng,
    probs: Vec<f64>,
}

impl GibbsSampler {
    /// Validates the configuration and draws the initial assignments.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: SamplerConfig, corpus: Corpus, edges: EdgeList) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let k = config.n_topics;
        let effective = corpus.vocabulary().n_primary();
        let n_active_documents = corpus.n_primary_documents();

        let mut state = CountState::new(k, corpus.n_documents(), effective);
        state.initialize_documents(&corpus, 0..n_active_documents, &mut rng);

        info!(
            topics = k,
            documents = n_active_documents,
            vocabulary = effective,
            tokens = state.topic_totals().iter().map(|&c| u64::from(c)).sum::<u64>(),
            "initialized sampler"
        );

        Ok(Self {
            graph: SimilarityGraph::restricted(&edges, effective),
            prior: PriorFields::new(k, effective),
            probs: vec![0.0; k],
            config,
            corpus,
            edges,
            state,
            n_active_documents,
            extended: false,
            iteration: 0,
            phase: Phase::Initializing,
            rng,
        })
    }

    /// Runs the remaining sweeps and writes the final snapshot.
    ///
    /// # Errors
    ///
    /// Stops at the first optimizer failure or sink error.
    pub fn run<S: SnapshotSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        let start = Instant::now();
        while self.iteration < self.config.n_iterations {
            self.step(sink)?;
        }
        self.finish(sink)?;
        info!(
            sweeps = self.iteration,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "sampling finished"
        );
        Ok(())
    }

    /// Performs sweep `iteration + 1` with its scheduled events.
    ///
    /// # Errors
    ///
    /// Returns an optimizer failure or a sink error.
    pub fn step<S: SnapshotSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        let it = self.iteration + 1;
        let n = self.config.n_iterations;

        if !self.extended && self.config.extension_sweep() == Some(it) {
            self.extend_corpus();
        }
        if it >= self.config.burn_in && it % self.config.optimization_interval == 0 && it < n {
            self.optimize_prior()?;
        }

        let sweep_start = Instant::now();
        self.sweep();
        self.iteration = it;
        self.phase = if it <= self.config.burn_in {
            Phase::BurnIn
        } else {
            Phase::Sampling
        };
        debug!(
            sweep = it,
            elapsed_us = sweep_start.elapsed().as_micros() as u64,
            "sweep complete"
        );

        if it > self.config.burn_in && it % self.config.snapshot_interval == 0 && it != n {
            self.emit(sink, it)?;
        }
        Ok(())
    }

    /// Resamples every token of every active document once.
    pub fn sweep(&mut self) {
        for m in 0..self.n_active_documents {
            for position in 0..self.corpus.document(m).len() {
                self.resample(m, position);
            }
        }
    }

    fn resample(&mut self, m: usize, position: usize) {
        let word = self.corpus.document(m)[position];
        let old = self.state.topic(m, position);
        self.state.decrement(m, word, old);

        let alpha = self.config.alpha;
        let k_alpha = self.config.n_topics as f64 * alpha;
        let doc_denom = f64::from(self.state.doc_totals()[m]) + k_alpha;
        let cwt = self.state.word_topic().row(word);
        let cdt = self.state.doc_topic().row(m);
        let totals = self.state.topic_totals();

        for (k, p) in self.probs.iter_mut().enumerate() {
            let word_part = (f64::from(cwt[k]) + self.prior.beta(k, word))
                / (f64::from(totals[k]) + self.prior.sum_beta(k));
            let doc_part = (f64::from(cdt[k]) + alpha) / doc_denom;
            *p = word_part * doc_part;
        }

        let new = sample_categorical(&self.probs, &mut self.rng);
        self.state.increment(m, word, new);
        self.state.set_topic(m, position, new);
    }

    /// Activates the secondary documents and the full vocabulary.
    ///
    /// Runs at most once; later calls do nothing.
    pub fn extend_corpus(&mut self) {
        if self.extended {
            return;
        }
        let full = self.corpus.vocabulary().len();
        let before = self.prior.vocab_size();

        self.state.grow_vocabulary(full);
        self.state.initialize_documents(
            &self.corpus,
            self.n_active_documents..self.corpus.n_documents(),
            &mut self.rng,
        );
        self.n_active_documents = self.corpus.n_documents();
        self.prior.grow(full);
        self.graph = SimilarityGraph::restricted(&self.edges, full);
        self.extended = true;

        info!(
            sweep = self.iteration + 1,
            vocabulary_before = before,
            vocabulary_after = full,
            documents = self.n_active_documents,
            graph_edges = self.graph.num_edges(),
            "extended corpus"
        );
    }

    /// Refits `Y`/`Yword` to the current counts and refreshes `Beta`.
    ///
    /// # Errors
    ///
    /// Returns [`BildaError::OptimizationFailed`] when the optimizer stalls or
    /// hits a numerical failure; the prior is left untouched in that case.
    pub fn optimize_prior(&mut self) -> Result<OptimizationResult> {
        let opt = self.config.optimizer;
        let objective = PriorObjective::new(
            &self.state,
            &self.graph,
            self.config.lambda_topic,
            self.config.lambda_word,
        );
        let x0 = self.prior.pack();
        let initial = objective.value(&x0);

        let mut lbfgs = LBFGS::new(opt.max_iter, opt.tolerance, opt.history);
        let result = lbfgs.minimize(|x| objective.value(x), |x| objective.gradient(x), x0);

        if !result.is_usable() {
            return Err(BildaError::OptimizationFailed {
                status: result.status,
                iterations: result.iterations,
                objective: result.objective_value,
            });
        }

        if result.status == ConvergenceStatus::MaxIterations {
            warn!(
                sweep = self.iteration + 1,
                iterations = result.iterations,
                objective = result.objective_value,
                gradient_norm = result.gradient_norm,
                "prior optimization stopped at iteration cap"
            );
        } else {
            info!(
                sweep = self.iteration + 1,
                iterations = result.iterations,
                initial_objective = initial,
                objective = result.objective_value,
                elapsed_ms = result.elapsed_time.as_millis() as u64,
                "optimized prior"
            );
        }

        self.prior.unpack(&result.solution)?;
        Ok(result)
    }

    fn finish<S: SnapshotSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        self.emit(sink, self.config.n_iterations)?;
        self.phase = Phase::Finished;
        Ok(())
    }

    fn emit<S: SnapshotSink + ?Sized>(&self, sink: &mut S, iteration: usize) -> Result<()> {
        debug!(sweep = iteration, "writing snapshot");
        sink.write_snapshot(iteration, &self.snapshot())
    }

    /// Current `theta`/`phi` with the prior and vocabulary they refer to.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            estimates: self.estimates(),
            prior: &self.prior,
            vocabulary: self.corpus.vocabulary(),
        }
    }

    /// `theta` over the active documents and `phi` over the active vocabulary.
    #[must_use]
    pub fn estimates(&self) -> Estimates {
        Estimates::compute(
            &self.state,
            &self.prior,
            self.config.alpha,
            self.n_active_documents,
        )
    }

    /// Configuration the sampler was built with.
    #[must_use]
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Full corpus, including documents not yet sampled.
    #[must_use]
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Topic assignments and count tables.
    #[must_use]
    pub fn state(&self) -> &CountState {
        &self.state
    }

    /// Current `Y`, `Yword` and `Beta`.
    #[must_use]
    pub fn prior(&self) -> &PriorFields {
        &self.prior
    }

    /// Similarity graph over the active vocabulary.
    #[must_use]
    pub fn graph(&self) -> &SimilarityGraph {
        &self.graph
    }

    /// Number of sweeps completed.
    #[must_use]
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_extended(&self) -> bool {
        self.extended
    }

    #[must_use]
    pub fn n_active_documents(&self) -> usize {
        self.n_active_documents
    }

    #[must_use]
    pub fn effective_vocab_size(&self) -> usize {
        self.prior.vocab_size()
    }
}

/// Draws an index with probability proportional to `weights`.
///
/// Weights must be non-negative with a positive finite sum.
pub fn sample_categorical<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();
    let u = rng.gen::<f64>() * total;
    sample_with_uniform(weights, u)
}

/// Inverse-CDF lookup: the first `j` with `u < Σ_{t<=j} weights[t]`.
///
/// A `u` at or beyond the total mass (possible through rounding) maps to
/// the last index.
///
/// # Examples
///
/// ```
/// use bilda::topic::sample_with_uniform;
///
/// let weights = [1.0, 2.0, 1.0];
/// assert_eq!(sample_with_uniform(&weights, 0.5), 0);
/// assert_eq!(sample_with_uniform(&weights, 1.0), 1);
/// assert_eq!(sample_with_uniform(&weights, 3.9), 2);
/// assert_eq!(sample_with_uniform(&[7.0], 6.9), 0);
/// ```
#[must_use]
pub fn sample_with_uniform(weights: &[f64], u: f64) -> usize {
    let mut cumulative = 0.0;
    for (j, &w) in weights.iter().enumerate() {
        cumulative += w;
        if u < cumulative {
            return j;
        }
    }
    weights.len().saturating_sub(1)
}
