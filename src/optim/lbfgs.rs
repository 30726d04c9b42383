//! Limited-memory BFGS (L-BFGS) optimizer.
//!
//! L-BFGS is a quasi-Newton method for large-scale optimization that approximates
//! the inverse Hessian using a limited history of gradient information.

use crate::primitives::Vector;

use super::line_search::{LineSearch, WolfeLineSearch};
use super::{ConvergenceStatus, OptimizationResult, Optimizer};

/// Limited-memory BFGS (L-BFGS) optimizer.
///
/// # Algorithm
///
/// 1. Compute gradient `g_k` = ∇`f(x_k)`
/// 2. Compute search direction `d_k` using two-loop recursion (approximates H^(-1) * `g_k`)
/// 3. Find step size `α_k` via line search (Wolfe conditions)
/// 4. Update: x_{k+1} = `x_k` + `α_k` * `d_k`
/// 5. Store gradient and position differences for next iteration
///
/// Convergence is declared when `‖g‖ ≤ tol · max(1, ‖x‖)`.
///
/// # Parameters
///
/// - **`max_iter`**: Maximum number of iterations
/// - **tol**: Relative gradient-norm tolerance
/// - **m**: History size (number of correction pairs)
///
/// # Example
///
/// ```
/// use bilda::optim::{LBFGS, Optimizer};
/// use bilda::primitives::Vector;
///
/// let mut optimizer = LBFGS::new(1000, 1e-8, 10);
///
/// let f = |x: &Vector<f64>| {
///     let a = x[0];
///     let b = x[1];
///     (1.0 - a).powi(2) + 100.0 * (b - a * a).powi(2)
/// };
///
/// let grad = |x: &Vector<f64>| {
///     let a = x[0];
///     let b = x[1];
///     Vector::from_slice(&[
///         -2.0 * (1.0 - a) - 400.0 * a * (b - a * a),
///         200.0 * (b - a * a),
///     ])
/// };
///
/// let x0 = Vector::from_slice(&[0.0, 0.0]);
/// let result = optimizer.minimize(f, grad, x0);
///
/// assert_eq!(result.status, bilda::optim::ConvergenceStatus::Converged);
/// assert!((result.solution[0] - 1.0).abs() < 1e-4);
/// ```
#[derive(Debug, Clone)]
pub struct LBFGS {
    /// Maximum number of iterations
    pub(crate) max_iter: usize,
    /// Relative convergence tolerance on the gradient norm
    pub(crate) tol: f64,
    /// History size (number of correction pairs to store)
    pub(crate) m: usize,
    /// Line search strategy
    line_search: WolfeLineSearch,
    /// Position differences: `s_k` = x_{k+1} - `x_k`
    pub(crate) s_history: Vec<Vector<f64>>,
    /// Gradient differences: `y_k` = g_{k+1} - `g_k`
    pub(crate) y_history: Vec<Vector<f64>>,
}

impl LBFGS {
    /// Creates a new L-BFGS optimizer.
    ///
    /// # Arguments
    ///
    /// * `max_iter` - Maximum number of iterations (typical: 100-1000)
    /// * `tol` - Relative gradient tolerance (typical: 1e-5; 0.5 is a loose stop)
    /// * `m` - History size (typical: 3-20)
    ///
    /// # Example
    ///
    /// ```
    /// use bilda::optim::LBFGS;
    ///
    /// let optimizer = LBFGS::new(100, 1e-5, 4);
    /// ```
    #[must_use]
    pub fn new(max_iter: usize, tol: f64, m: usize) -> Self {
        Self {
            max_iter,
            tol,
            m,
            line_search: WolfeLineSearch::new(1e-4, 0.9, 50),
            s_history: Vec::with_capacity(m),
            y_history: Vec::with_capacity(m),
        }
    }

    /// Two-loop recursion to compute search direction.
    ///
    /// Approximates -H^(-1) * grad from the stored (s, y) pairs.
    fn compute_direction(&self, grad: &Vector<f64>) -> Vector<f64> {
        let n = grad.len();
        let k = self.s_history.len();

        let mut q = Vector::zeros(n);
        for i in 0..n {
            q[i] = -grad[i];
        }

        if k == 0 {
            return q;
        }

        let mut alpha = vec![0.0; k];
        let mut rho = vec![0.0; k];

        // First loop: backward pass
        for i in (0..k).rev() {
            let s = &self.s_history[i];
            let y = &self.y_history[i];

            rho[i] = 1.0 / y.dot(s);
            alpha[i] = rho[i] * s.dot(&q);

            for j in 0..n {
                q[j] -= alpha[i] * y[j];
            }
        }

        // Scale by H_0 = (s^T y) / (y^T y) from most recent update
        let s_last = &self.s_history[k - 1];
        let y_last = &self.y_history[k - 1];
        let gamma = s_last.dot(y_last) / y_last.dot(y_last);

        let mut r = Vector::zeros(n);
        for i in 0..n {
            r[i] = gamma * q[i];
        }

        // Second loop: forward pass
        for i in 0..k {
            let s = &self.s_history[i];
            let y = &self.y_history[i];

            let beta = rho[i] * y.dot(&r);

            for j in 0..n {
                r[j] += s[j] * (alpha[i] - beta);
            }
        }

        r
    }

    fn result(
        x: Vector<f64>,
        fx: f64,
        iterations: usize,
        status: ConvergenceStatus,
        grad_norm: f64,
        start_time: std::time::Instant,
    ) -> OptimizationResult {
        OptimizationResult {
            solution: x,
            objective_value: fx,
            iterations,
            status,
            gradient_norm: grad_norm,
            elapsed_time: start_time.elapsed(),
        }
    }
}

impl Optimizer for LBFGS {
    fn minimize<F, G>(&mut self, objective: F, gradient: G, x0: Vector<f64>) -> OptimizationResult
    where
        F: Fn(&Vector<f64>) -> f64,
        G: Fn(&Vector<f64>) -> Vector<f64>,
    {
        let start_time = std::time::Instant::now();

        self.s_history.clear();
        self.y_history.clear();

        let mut x = x0;
        let mut fx = objective(&x);
        let mut grad = gradient(&x);
        let mut grad_norm = grad.norm();

        if !fx.is_finite() || !grad.is_finite() {
            return Self::result(
                x,
                fx,
                0,
                ConvergenceStatus::NumericalError,
                grad_norm,
                start_time,
            );
        }

        for iter in 0..self.max_iter {
            if grad_norm <= self.tol * x.norm().max(1.0) {
                return Self::result(
                    x,
                    fx,
                    iter,
                    ConvergenceStatus::Converged,
                    grad_norm,
                    start_time,
                );
            }

            let mut d = self.compute_direction(&grad);

            // A stale curvature model can produce an ascent direction; restart
            // from steepest descent when that happens.
            if grad.dot(&d) >= 0.0 {
                self.s_history.clear();
                self.y_history.clear();
                d = self.compute_direction(&grad);
            }

            let alpha = self.line_search.search(&objective, &gradient, &x, &d);

            if alpha < 1e-12 {
                return Self::result(
                    x,
                    fx,
                    iter,
                    ConvergenceStatus::Stalled,
                    grad_norm,
                    start_time,
                );
            }

            let x_new = x.axpy(alpha, &d);
            let fx_new = objective(&x_new);
            let grad_new = gradient(&x_new);

            if !fx_new.is_finite() || !grad_new.is_finite() {
                return Self::result(
                    x,
                    fx,
                    iter,
                    ConvergenceStatus::NumericalError,
                    grad_norm,
                    start_time,
                );
            }

            let n = x.len();
            let mut s_k = Vector::zeros(n);
            let mut y_k = Vector::zeros(n);
            for i in 0..n {
                s_k[i] = x_new[i] - x[i];
                y_k[i] = grad_new[i] - grad[i];
            }

            // Curvature condition: y^T s > 0
            if y_k.dot(&s_k) > 1e-10 {
                if self.s_history.len() >= self.m {
                    self.s_history.remove(0);
                    self.y_history.remove(0);
                }
                self.s_history.push(s_k);
                self.y_history.push(y_k);
            }

            x = x_new;
            fx = fx_new;
            grad = grad_new;
            grad_norm = grad.norm();
        }

        if grad_norm <= self.tol * x.norm().max(1.0) {
            return Self::result(
                x,
                fx,
                self.max_iter,
                ConvergenceStatus::Converged,
                grad_norm,
                start_time,
            );
        }

        Self::result(
            x,
            fx,
            self.max_iter,
            ConvergenceStatus::MaxIterations,
            grad_norm,
            start_time,
        )
    }

    fn reset(&mut self) {
        self.s_history.clear();
        self.y_history.clear();
    }
}
