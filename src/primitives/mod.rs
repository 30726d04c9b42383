//! Core dense storage primitives (Vector, Matrix).
//!
//! Count tables, prior fields and optimizer variables are all stored in these
//! owned, row-major containers.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
