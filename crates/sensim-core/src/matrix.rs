//! Dense matrix indexed by (experiment, application).

use std::ops::Index;

use nalgebra::{DMatrix, Scalar};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Rows are experiments, columns are applications.
///
/// Backed by a [`DMatrix`], so storage is column-major. Constructors that
/// take a flat buffer say which order they expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matrix<T: Scalar> {
    data: DMatrix<T>,
}

impl<T: Scalar> Matrix<T> {
    /// Build a matrix by evaluating `f(row, col)` for every cell.
    pub fn from_fn(rows: usize, cols: usize, f: impl FnMut(usize, usize) -> T) -> Self {
        Self {
            data: DMatrix::from_fn(rows, cols, f),
        }
    }

    /// Wrap a row-major buffer of `rows * cols` cells.
    pub fn from_row_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::ShapeMismatch {
                context: "matrix data".to_string(),
                expected: format!("{} cells ({}x{})", rows * cols, rows, cols),
                actual: format!("{} cells", data.len()),
            });
        }
        Ok(Self {
            data: DMatrix::from_row_iterator(rows, cols, data),
        })
    }

    /// Build from per-column vectors that must all have the same length.
    pub fn from_columns(columns: Vec<Vec<T>>) -> Result<Self> {
        let cols = columns.len();
        let rows = columns.first().map_or(0, Vec::len);
        if let Some((j, col)) = columns.iter().enumerate().find(|(_, c)| c.len() != rows) {
            return Err(Error::ShapeMismatch {
                context: format!("matrix column {}", j),
                expected: format!("{} rows", rows),
                actual: format!("{} rows", col.len()),
            });
        }
        Ok(Self {
            data: DMatrix::from_iterator(rows, cols, columns.into_iter().flatten()),
        })
    }

    /// Number of rows (experiments).
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns (applications).
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    /// Cell at `(row, col)`, or `None` outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        self.data.get((row, col))
    }

    /// Cells with their coordinates, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let (rows, cols) = self.shape();
        (0..rows).flat_map(move |i| (0..cols).map(move |j| (i, j, &self.data[(i, j)])))
    }

    /// Apply `f` to every cell.
    pub fn map<U: Scalar>(&self, mut f: impl FnMut(&T) -> U) -> Matrix<U> {
        Matrix {
            data: DMatrix::from_fn(self.rows(), self.cols(), |i, j| f(&self.data[(i, j)])),
        }
    }

    /// Cell storage in column-major order.
    pub fn as_slice(&self) -> &[T] {
        self.data.as_slice()
    }

    /// The underlying nalgebra matrix.
    pub fn as_dmatrix(&self) -> &DMatrix<T> {
        &self.data
    }
}

impl<T: Scalar> From<DMatrix<T>> for Matrix<T> {
    fn from(data: DMatrix<T>) -> Self {
        Self { data }
    }
}

impl<T: Scalar> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &T {
        &self.data[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fn_layout() {
        let m = Matrix::from_fn(2, 3, |i, j| 10 * i + j);
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.get(1, 2), Some(&12));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.get(0, 3), None);
        assert_eq!(m[(0, 1)], 1);
        let cells: Vec<_> = m.iter().map(|(i, j, v)| (i, j, *v)).collect();
        assert_eq!(cells[4], (1, 1, 11));
        assert_eq!(cells.len(), 6);
    }

    #[test]
    fn test_from_columns() {
        let m = Matrix::from_columns(vec![vec![1, 2], vec![3, 4], vec![5, 6]]).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.get(0, 1), Some(&3));
        assert_eq!(m.get(1, 2), Some(&6));
        assert_eq!(m.as_slice(), &[1, 2, 3, 4, 5, 6]);

        let err = Matrix::from_columns(vec![vec![1, 2], vec![3]]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_from_row_vec_and_map() {
        assert!(Matrix::from_row_vec(2, 2, vec![1.0; 3]).is_err());
        let m = Matrix::from_row_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(m.get(0, 1), Some(&2.0));
        assert_eq!(m.get(1, 0), Some(&3.0));

        let doubled = m.map(|v| v * 2.0);
        assert_eq!(doubled.get(1, 1), Some(&8.0));
        assert_eq!(doubled.as_dmatrix().sum(), 20.0);
    }

    #[test]
    fn test_serde_round_trip() {
        let m = Matrix::from_fn(2, 3, |i, j| (i * 3 + j) as f64);
        let json = serde_json::to_string(&m).unwrap();
        let back: Matrix<f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_deserialize_rejects_short_payload() {
        // three cells declared as 2x2
        let result: std::result::Result<Matrix<f64>, _> = serde_json::from_str("[[1.0, 2.0, 3.0], 2, 2]");
        assert!(result.is_err());
    }
}
