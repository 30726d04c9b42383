//! Sampler and prior-optimizer configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BildaError, Result};

/// Settings of the L-BFGS run that refits the prior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Iteration cap per optimization event.
    pub max_iter: usize,
    /// Relative gradient tolerance: stop once `‖g‖ <= tolerance · max(1, ‖x‖)`.
    pub tolerance: f64,
    /// Number of stored curvature pairs.
    pub history: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 0.5,
            history: 4,
        }
    }
}

/// Hyperparameters and schedule of a training run.
///
/// Sweeps are counted from 1. At sweep `it` the sampler, in order, folds in
/// the secondary documents when `it == extension_at`, refits the prior when
/// `it >= burn_in && it % optimization_interval == 0 && it < n_iterations`,
/// resamples every active token, and emits a snapshot when
/// `it > burn_in && it % snapshot_interval == 0 && it != n_iterations`.
///
/// # Examples
///
/// ```
/// use bilda::topic::SamplerConfig;
///
/// let config = SamplerConfig::new(10)
///     .with_n_iterations(200)
///     .with_burn_in(50)
///     .with_optimization_interval(25)
///     .with_seed(7);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.extension_sweep(), Some(100));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Number of topics (K).
    pub n_topics: usize,
    /// Symmetric document-topic smoothing.
    pub alpha: f64,
    /// Total number of sweeps.
    pub n_iterations: usize,
    pub burn_in: usize,
    pub optimization_interval: usize,
    pub snapshot_interval: usize,
    /// 1-based sweep that activates the secondary partition; `None` means
    /// `n_iterations / 2`.
    pub extension_at: Option<usize>,
    /// Scale of the graph smoothness penalty on topic log-weights.
    pub lambda_topic: f64,
    /// Scale of the L2 penalty on word log-weights.
    pub lambda_word: f64,
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub optimizer: OptimizerConfig,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            n_topics: 20,
            alpha: 0.5,
            n_iterations: 2000,
            burn_in: 500,
            optimization_interval: 100,
            snapshot_interval: 500,
            extension_at: None,
            lambda_topic: 1.0,
            lambda_word: 1.0,
            seed: None,
            optimizer: OptimizerConfig::default(),
        }
    }
}

impl SamplerConfig {
    /// Default configuration with `n_topics` topics.
    #[must_use]
    pub fn new(n_topics: usize) -> Self {
        Self {
            n_topics,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    #[must_use]
    pub fn with_n_iterations(mut self, n_iterations: usize) -> Self {
        self.n_iterations = n_iterations;
        self
    }

    #[must_use]
    pub fn with_burn_in(mut self, burn_in: usize) -> Self {
        self.burn_in = burn_in;
        self
    }

    #[must_use]
    pub fn with_optimization_interval(mut self, interval: usize) -> Self {
        self.optimization_interval = interval;
        self
    }

    #[must_use]
    pub fn with_snapshot_interval(mut self, interval: usize) -> Self {
        self.snapshot_interval = interval;
        self
    }

    #[must_use]
    pub fn with_extension_at(mut self, sweep: usize) -> Self {
        self.extension_at = Some(sweep);
        self
    }

    #[must_use]
    pub fn with_lambdas(mut self, lambda_topic: f64, lambda_word: f64) -> Self {
        self.lambda_topic = lambda_topic;
        self.lambda_word = lambda_word;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Sweep at which the secondary partition is activated.
    ///
    /// `None` only when `n_iterations < 2` and no explicit sweep was set,
    /// in which case the run never extends.
    #[must_use]
    pub fn extension_sweep(&self) -> Option<usize> {
        match self.extension_at {
            Some(sweep) => Some(sweep),
            None => {
                let half = self.n_iterations / 2;
                (half >= 1).then_some(half)
            }
        }
    }

    /// Reads a JSON config; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Checks every precondition of a run.
    ///
    /// # Errors
    ///
    /// Returns [`BildaError::InvalidHyperparameter`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.n_topics == 0 {
            return Err(BildaError::invalid_hyperparameter("n_topics", 0, "> 0"));
        }
        check_positive("alpha", self.alpha)?;
        check_positive("lambda_topic", self.lambda_topic)?;
        check_positive("lambda_word", self.lambda_word)?;

        let n = self.n_iterations;
        if n == 0 {
            return Err(BildaError::invalid_hyperparameter("n_iterations", 0, "> 0"));
        }
        if self.optimization_interval == 0 || self.optimization_interval > n {
            return Err(BildaError::invalid_hyperparameter(
                "optimization_interval",
                self.optimization_interval,
                &format!("in 1..={n}"),
            ));
        }
        if self.snapshot_interval == 0 {
            return Err(BildaError::invalid_hyperparameter("snapshot_interval", 0, "> 0"));
        }
        if self.burn_in > n {
            return Err(BildaError::invalid_hyperparameter(
                "burn_in",
                self.burn_in,
                &format!("<= n_iterations ({n})"),
            ));
        }
        if let Some(sweep) = self.extension_at {
            if sweep == 0 || sweep > n {
                return Err(BildaError::invalid_hyperparameter(
                    "extension_at",
                    sweep,
                    &format!("in 1..={n}"),
                ));
            }
        }

        let opt = &self.optimizer;
        if opt.max_iter == 0 {
            return Err(BildaError::invalid_hyperparameter("optimizer.max_iter", 0, "> 0"));
        }
        if opt.history == 0 {
            return Err(BildaError::invalid_hyperparameter("optimizer.history", 0, "> 0"));
        }
        check_positive("optimizer.tolerance", opt.tolerance)
    }
}

fn check_positive(param: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(BildaError::invalid_hyperparameter(param, value, "finite and > 0"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rejects(config: &SamplerConfig, param: &str) {
        match config.validate() {
            Err(BildaError::InvalidHyperparameter { param: p, .. }) => assert_eq!(p, param),
            other => panic!("expected {param} to be rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_default_is_valid() {
        let config = SamplerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.extension_sweep(), Some(1000));
        assert_eq!(config.optimizer.history, 4);
    }

    #[test]
    fn test_rejects_zero_topics() {
        assert_rejects(&SamplerConfig::new(0), "n_topics");
    }

    #[test]
    fn test_rejects_bad_alpha() {
        assert_rejects(&SamplerConfig::new(2).with_alpha(0.0), "alpha");
        assert_rejects(&SamplerConfig::new(2).with_alpha(f64::NAN), "alpha");
        assert_rejects(&SamplerConfig::new(2).with_alpha(-0.1), "alpha");
    }

    #[test]
    fn test_rejects_bad_lambdas() {
        assert_rejects(&SamplerConfig::new(2).with_lambdas(0.0, 1.0), "lambda_topic");
        assert_rejects(&SamplerConfig::new(2).with_lambdas(1.0, f64::INFINITY), "lambda_word");
    }

    #[test]
    fn test_rejects_schedule_errors() {
        let base = SamplerConfig::new(2).with_n_iterations(10).with_burn_in(2);
        assert_rejects(&base.clone().with_n_iterations(0), "n_iterations");
        assert_rejects(&base.clone().with_optimization_interval(0), "optimization_interval");
        assert_rejects(&base.clone().with_optimization_interval(11), "optimization_interval");
        assert_rejects(
            &base.clone().with_optimization_interval(5).with_snapshot_interval(0),
            "snapshot_interval",
        );
        assert_rejects(&base.clone().with_optimization_interval(5).with_burn_in(11), "burn_in");
        assert_rejects(
            &base.clone().with_optimization_interval(5).with_extension_at(0),
            "extension_at",
        );
        assert_rejects(
            &base.with_optimization_interval(5).with_extension_at(11),
            "extension_at",
        );
    }

    #[test]
    fn test_rejects_optimizer_settings() {
        let base = SamplerConfig::default();
        let bad = |o: OptimizerConfig| base.clone().with_optimizer(o);
        assert_rejects(
            &bad(OptimizerConfig { max_iter: 0, ..OptimizerConfig::default() }),
            "optimizer.max_iter",
        );
        assert_rejects(
            &bad(OptimizerConfig { history: 0, ..OptimizerConfig::default() }),
            "optimizer.history",
        );
        assert_rejects(
            &bad(OptimizerConfig { tolerance: 0.0, ..OptimizerConfig::default() }),
            "optimizer.tolerance",
        );
    }

    #[test]
    fn test_extension_sweep_for_single_iteration() {
        let config = SamplerConfig::new(2).with_n_iterations(1).with_optimization_interval(1);
        assert_eq!(config.extension_sweep(), None);
        assert_eq!(config.with_extension_at(1).extension_sweep(), Some(1));
    }

    #[test]
    fn test_from_json_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"n_topics": 7, "seed": 3, "optimizer": {"max_iter": 50}}"#)
            .expect("write");

        let config = SamplerConfig::from_json_file(&path).expect("parse");
        assert_eq!(config.n_topics, 7);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.optimizer.max_iter, 50);
        assert_eq!(config.optimizer.history, 4);
        assert!((config.alpha - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_json_file_rejects_garbage() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ n_topics: ").expect("write");
        assert!(matches!(
            SamplerConfig::from_json_file(&path),
            Err(BildaError::Serialization(_))
        ));
    }
}
