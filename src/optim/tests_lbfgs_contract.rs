// =========================================================================
// L-BFGS contract
//
// References:
//   - Nocedal (1980) "Updating Quasi-Newton Matrices with Limited Storage"
//   - Liu & Nocedal (1989) "On the limited memory BFGS method for large
//     scale optimization"
// =========================================================================

use super::*;
use crate::primitives::Vector;

/// Converges on convex quadratic f(x) = x²
#[test]
fn test_lbfgs_contract_quadratic_convergence() {
    let objective = |x: &Vector<f64>| -> f64 { x[0] * x[0] };
    let gradient = |x: &Vector<f64>| -> Vector<f64> { Vector::from_vec(vec![2.0 * x[0]]) };

    let mut lbfgs = LBFGS::new(100, 1e-8, 10);
    let result = lbfgs.minimize(objective, gradient, Vector::from_vec(vec![5.0]));

    assert!(
        result.solution[0].abs() < 1e-6,
        "minimizer x={}, expected ≈ 0",
        result.solution[0]
    );
}

/// Result objective value decreases from initial
#[test]
fn test_lbfgs_contract_objective_decreases() {
    let objective = |x: &Vector<f64>| -> f64 { x[0] * x[0] + x[1] * x[1] };
    let gradient =
        |x: &Vector<f64>| -> Vector<f64> { Vector::from_vec(vec![2.0 * x[0], 2.0 * x[1]]) };

    let x0 = Vector::from_vec(vec![3.0, 4.0]);
    let initial_obj = objective(&x0);

    let mut lbfgs = LBFGS::new(100, 1e-8, 10);
    let result = lbfgs.minimize(objective, gradient, x0);

    assert!(
        result.objective_value < initial_obj,
        "final obj {} >= initial obj {}",
        result.objective_value,
        initial_obj
    );
}

/// Result has finite values even when far-away trial points overflow
#[test]
fn test_lbfgs_contract_finite_result_with_exp_objective() {
    // f(y) = exp(y) - 2y, minimum at y = ln 2
    let objective = |x: &Vector<f64>| -> f64 { x[0].exp() - 2.0 * x[0] };
    let gradient = |x: &Vector<f64>| -> Vector<f64> { Vector::from_vec(vec![x[0].exp() - 2.0]) };

    let mut lbfgs = LBFGS::new(200, 1e-10, 4);
    let result = lbfgs.minimize(objective, gradient, Vector::from_vec(vec![-30.0]));

    assert!(result.solution[0].is_finite());
    assert!(result.objective_value.is_finite());
    assert_eq!(result.status, ConvergenceStatus::Converged);
    assert!((result.solution[0] - 2.0_f64.ln()).abs() < 1e-6);
}
