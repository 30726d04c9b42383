//! Batch optimization for smooth objectives.
//!
//! The prior re-estimation step minimizes a penalized negative log-likelihood
//! over a few thousand to a few million coupled variables, so only
//! limited-memory quasi-Newton machinery lives here.
//!
//! # Available Optimizers
//!
//! - [`LBFGS`] - Limited-memory BFGS (memory-efficient quasi-Newton)
//!
//! ## Line Search
//! - [`WolfeLineSearch`] - Armijo + curvature conditions (for quasi-Newton methods)
//!
//! # Example
//!
//! ```
//! use bilda::optim::{LBFGS, ConvergenceStatus, Optimizer};
//! use bilda::primitives::Vector;
//!
//! // 100 max iterations, 1e-8 relative gradient tolerance, 10 correction pairs
//! let mut optimizer = LBFGS::new(100, 1e-8, 10);
//!
//! let objective = |x: &Vector<f64>| (x[0] - 5.0).powi(2) + (x[1] - 3.0).powi(2);
//! let gradient = |x: &Vector<f64>| {
//!     Vector::from_slice(&[2.0 * (x[0] - 5.0), 2.0 * (x[1] - 3.0)])
//! };
//!
//! let x0 = Vector::from_slice(&[0.0, 0.0]);
//! let result = optimizer.minimize(objective, gradient, x0);
//!
//! assert_eq!(result.status, ConvergenceStatus::Converged);
//! assert!((result.solution[0] - 5.0).abs() < 1e-6);
//! assert!((result.solution[1] - 3.0).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};

use crate::primitives::Vector;

mod lbfgs;
mod line_search;

pub use lbfgs::LBFGS;
pub use line_search::{LineSearch, WolfeLineSearch};

/// Result of an optimization procedure.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Final solution (optimized parameters)
    pub solution: Vector<f64>,
    /// Final objective function value
    pub objective_value: f64,
    /// Number of iterations performed
    pub iterations: usize,
    /// Convergence status
    pub status: ConvergenceStatus,
    /// Final gradient norm (‖∇f(x)‖)
    pub gradient_norm: f64,
    /// Total elapsed time
    pub elapsed_time: std::time::Duration,
}

impl OptimizationResult {
    /// True when the solution can be written back into the model.
    ///
    /// Hitting the iteration cap still leaves a point with lower objective
    /// than the start; stalls and numerical errors do not.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        matches!(
            self.status,
            ConvergenceStatus::Converged | ConvergenceStatus::MaxIterations
        )
    }
}

/// Convergence status of an optimization procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConvergenceStatus {
    /// Converged (gradient norm below tolerance)
    Converged,
    /// Reached maximum iteration limit
    MaxIterations,
    /// Progress stalled (line search could not find a step)
    Stalled,
    /// Numerical error (NaN, Inf, etc.)
    NumericalError,
}

/// Batch optimizer over an objective and its gradient.
///
/// The objective and gradient are pure functions of the variable vector; the
/// optimizer never sees the model that produced them.
pub trait Optimizer {
    /// Minimizes `objective` starting from `x0`.
    ///
    /// # Arguments
    ///
    /// * `objective` - Objective function f: ℝⁿ → ℝ
    /// * `gradient` - Gradient function ∇f: ℝⁿ → ℝⁿ
    /// * `x0` - Initial point
    fn minimize<F, G>(&mut self, objective: F, gradient: G, x0: Vector<f64>) -> OptimizationResult
    where
        F: Fn(&Vector<f64>) -> f64,
        G: Fn(&Vector<f64>) -> Vector<f64>;

    /// Clears any state carried between runs.
    fn reset(&mut self);
}

#[cfg(test)]
#[path = "tests_lbfgs_contract.rs"]
mod tests_lbfgs_contract;
