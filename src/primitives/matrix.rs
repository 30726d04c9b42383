//! Matrix type for 2D dense tables.

use serde::{Deserialize, Serialize};

/// A 2D matrix stored row-major.
///
/// Used both for integer count tables (word-topic, document-topic) and for
/// floating-point prior fields. Rows or columns can be appended in place
/// without disturbing existing entries.
///
/// # Examples
///
/// ```
/// use bilda::primitives::Matrix;
///
/// let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("data length matches rows * cols");
/// assert_eq!(m.shape(), (2, 3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Copy> Matrix<T> {
    /// Creates a new matrix from a vector of data.
    ///
    /// # Errors
    ///
    /// Returns an error if data length doesn't match rows * cols.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, &'static str> {
        if data.len() != rows * cols {
            return Err("Data length must equal rows * cols");
        }
        Ok(Self { data, rows, cols })
    }

    /// Creates a matrix with every entry set to `value`.
    #[must_use]
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    /// Returns the shape as (rows, cols).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.cols
    }

    /// Gets element at (row, col).
    ///
    /// # Panics
    ///
    /// Panics if indices are out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * self.cols + col]
    }

    /// Mutable reference to the element at (row, col).
    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.data[row * self.cols + col]
    }

    /// Returns a row as a slice.
    #[must_use]
    pub fn row(&self, row_idx: usize) -> &[T] {
        let start = row_idx * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Returns a row as a mutable slice.
    pub fn row_mut(&mut self, row_idx: usize) -> &mut [T] {
        let start = row_idx * self.cols;
        &mut self.data[start..start + self.cols]
    }

    /// Returns the underlying data as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Appends `n` rows filled with `value`.
    pub fn append_rows(&mut self, n: usize, value: T) {
        self.data.extend(std::iter::repeat(value).take(n * self.cols));
        self.rows += n;
    }

    /// Grows every row to `new_cols` columns, filling new entries with `value`.
    ///
    /// Existing entries keep their (row, col) position. Shrinking is a no-op.
    pub fn grow_cols(&mut self, new_cols: usize, value: T) {
        if new_cols <= self.cols {
            return;
        }
        let mut data = Vec::with_capacity(self.rows * new_cols);
        for r in 0..self.rows {
            data.extend_from_slice(self.row(r));
            data.extend(std::iter::repeat(value).take(new_cols - self.cols));
        }
        self.data = data;
        self.cols = new_cols;
    }
}

impl<T: Copy + Default> Matrix<T> {
    /// Creates a matrix of default values (zeros for numeric types).
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, T::default())
    }
}

#[cfg(test)]
#[path = "matrix_tests.rs"]
mod tests;
