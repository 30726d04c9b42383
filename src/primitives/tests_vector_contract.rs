// =========================================================================
// Vector primitives contract
//
// References:
//   - Cauchy-Schwarz inequality: |dot(u,v)| <= norm(u) * norm(v)
// =========================================================================

use super::*;

#[test]
fn test_dot_commutative() {
    let u = Vector::from_slice(&[1.0, 2.0, 3.0]);
    let v = Vector::from_slice(&[4.0, 5.0, 6.0]);

    let uv = u.dot(&v);
    let vu = v.dot(&u);

    assert!((uv - vu).abs() < 1e-12, "dot(u,v)={uv} != dot(v,u)={vu}");
    assert!((uv - 32.0).abs() < 1e-12);
}

#[test]
fn test_norm_nonneg() {
    let v = Vector::from_slice(&[-3.0, 4.0]);
    let n = v.norm();

    assert!(n >= 0.0, "norm={n}, expected >= 0.0");
    assert!((n - 5.0).abs() < 1e-12, "norm of [-3,4]={n}, expected 5.0");
}

#[test]
fn test_cauchy_schwarz() {
    let u = Vector::from_slice(&[1.0, -2.0, 3.0, 0.5]);
    let v = Vector::from_slice(&[4.0, 0.0, -1.0, 2.0]);

    let dot = u.dot(&v).abs();
    let bound = u.norm() * v.norm();

    assert!(dot <= bound + 1e-12, "|dot|={dot} > norm(u)*norm(v)={bound}");
}

#[test]
fn test_axpy() {
    let x = Vector::from_slice(&[1.0, 2.0]);
    let d = Vector::from_slice(&[-1.0, 0.5]);
    let y = x.axpy(2.0, &d);
    assert_eq!(y.as_slice(), &[-1.0, 3.0]);
}

#[test]
fn test_is_finite() {
    assert!(Vector::from_slice(&[0.0, 1.0]).is_finite());
    assert!(!Vector::from_slice(&[0.0, f64::NAN]).is_finite());
    assert!(!Vector::from_slice(&[f64::INFINITY]).is_finite());
}

#[test]
fn test_index_mut() {
    let mut v = Vector::zeros(3);
    v[1] = 7.0;
    assert_eq!(v.as_slice(), &[0.0, 7.0, 0.0]);
}
