//! Owned row-major 2D container.
//!
//! [`Matrix`] backs the processing-time data and the start/completion time
//! tables. `Clone` duplicates the whole buffer; `std::mem::take` moves the
//! contents out and leaves an empty 0x0 matrix behind.

use std::ops::{Index, IndexMut};

use crate::error::{Error, Result};

/// A dense `rows x cols` matrix stored row-major in a single buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Copy + Default> Matrix<T> {
    /// Allocates a matrix filled with `T::default()`.
    ///
    /// Returns [`Error::Allocation`] when the buffer cannot be reserved.
    pub fn try_new(rows: usize, cols: usize) -> Result<Self> {
        let len = rows
            .checked_mul(cols)
            .ok_or(Error::Allocation { rows, cols })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| Error::Allocation { rows, cols })?;
        data.resize(len, T::default());
        Ok(Self { rows, cols, data })
    }
}

impl<T> Matrix<T> {
    /// Builds a matrix from row vectors. Returns `None` if rows are ragged.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Option<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != n_cols) {
            return None;
        }
        let data: Vec<T> = rows.into_iter().flatten().collect();
        Some(Self {
            rows: n_rows,
            cols: n_cols,
            data,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the matrix holds no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the cell at `(row, col)`, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Borrows one row as a slice.
    #[inline]
    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Iterates over rows as slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks_exact panics on 0, and a 0-column matrix has no cells anyway
        self.data.chunks_exact(self.cols.max(1)).take(self.rows)
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        debug_assert!(row < self.rows && col < self.cols);
        &self.data[row * self.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        debug_assert!(row < self.rows && col < self.cols);
        &mut self.data[row * self.cols + col]
    }
}
