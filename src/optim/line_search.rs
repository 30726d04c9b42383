//! Line search algorithms for optimization.
//!
//! Line search methods find a suitable step size along a given search direction,
//! ensuring sufficient decrease in the objective function.
//!
//! The Wolfe search treats a non-finite objective value as a failed
//! sufficient-decrease test, so a trial step that overflows `exp` in the
//! prior parameterization just shrinks the step.

use crate::primitives::Vector;

/// Trait for line search strategies.
///
/// Given a function f, current point x, and search direction d, finds a step
/// size α > 0 such that x + α*d satisfies certain decrease conditions.
///
/// # Example
///
/// ```
/// use bilda::optim::{LineSearch, WolfeLineSearch};
/// use bilda::primitives::Vector;
///
/// let ls = WolfeLineSearch::default();
/// let f = |x: &Vector<f64>| x[0] * x[0];
/// let grad = |x: &Vector<f64>| Vector::from_slice(&[2.0 * x[0]]);
///
/// let x = Vector::from_slice(&[1.0]);
/// let d = Vector::from_slice(&[-2.0]); // Descent direction
/// let alpha = ls.search(&f, &grad, &x, &d);
/// assert!(alpha > 0.0);
/// ```
pub trait LineSearch {
    /// Finds a suitable step size along the search direction.
    ///
    /// # Arguments
    ///
    /// * `f` - Objective function f: ℝⁿ → ℝ
    /// * `grad` - Gradient function ∇f: ℝⁿ → ℝⁿ
    /// * `x` - Current point
    /// * `d` - Search direction (typically descent direction, ∇f(x)·d < 0)
    ///
    /// # Returns
    ///
    /// Step size α > 0 satisfying the line search conditions
    fn search<F, G>(&self, f: &F, grad: &G, x: &Vector<f64>, d: &Vector<f64>) -> f64
    where
        F: Fn(&Vector<f64>) -> f64,
        G: Fn(&Vector<f64>) -> Vector<f64>;
}

/// Wolfe line search with Armijo and curvature conditions.
///
/// ```text
/// Armijo:    f(x + α*d) ≤ f(x) + c₁*α*∇f(x)ᵀd
/// Curvature: |∇f(x + α*d)ᵀd| ≤ c₂*|∇f(x)ᵀd|
/// ```
///
/// The step is bracketed by bisection once an upper bound is known and
/// doubled while only a lower bound is known.
#[derive(Debug, Clone)]
pub struct WolfeLineSearch {
    /// Armijo constant (c₁ ∈ (0, c₂), typical: 1e-4)
    pub(crate) c1: f64,
    /// Curvature constant (c₂ ∈ (c₁, 1), typical: 0.9)
    pub(crate) c2: f64,
    /// Maximum line search iterations
    pub(crate) max_iter: usize,
}

impl WolfeLineSearch {
    /// Creates a new Wolfe line search.
    ///
    /// # Panics
    ///
    /// Panics if c1 >= c2 or values are outside (0, 1).
    #[must_use]
    pub fn new(c1: f64, c2: f64, max_iter: usize) -> Self {
        assert!(
            c1 < c2 && c1 > 0.0 && c2 < 1.0,
            "Wolfe conditions require 0 < c1 < c2 < 1"
        );
        Self { c1, c2, max_iter }
    }
}

impl Default for WolfeLineSearch {
    /// Defaults: c1=1e-4, c2=0.9, `max_iter=50`
    fn default() -> Self {
        Self::new(1e-4, 0.9, 50)
    }
}

impl LineSearch for WolfeLineSearch {
    fn search<F, G>(&self, f: &F, grad: &G, x: &Vector<f64>, d: &Vector<f64>) -> f64
    where
        F: Fn(&Vector<f64>) -> f64,
        G: Fn(&Vector<f64>) -> Vector<f64>,
    {
        let fx = f(x);
        let dir_deriv = grad(x).dot(d);

        let mut alpha = 1.0;
        let mut alpha_lo = 0.0;
        let mut alpha_hi = f64::INFINITY;

        for _ in 0..self.max_iter {
            let x_new = x.axpy(alpha, d);
            let fx_new = f(&x_new);

            if !fx_new.is_finite() || fx_new > fx + self.c1 * alpha * dir_deriv {
                alpha_hi = alpha;
                alpha = (alpha_lo + alpha_hi) / 2.0;
                continue;
            }

            let dir_deriv_new = grad(&x_new).dot(d);

            if dir_deriv_new.abs() <= self.c2 * dir_deriv.abs() {
                return alpha;
            }

            if dir_deriv_new > 0.0 {
                alpha_hi = alpha;
            } else {
                alpha_lo = alpha;
            }

            if alpha_hi.is_finite() {
                alpha = (alpha_lo + alpha_hi) / 2.0;
            } else {
                alpha *= 2.0;
            }
        }

        // Fall back to the last step known to decrease f, if any.
        if alpha_lo > 0.0 {
            alpha_lo
        } else {
            alpha
        }
    }
}
