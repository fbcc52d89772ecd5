//! # Compressed Sparse Column Storage
//!
//! [`CscMatrix`] stores a sparse matrix column by column:
//! - `col_ptrs[j]..col_ptrs[j + 1]` is the storage range of column `j`,
//! - `row_idx` holds the row of every stored entry, strictly increasing within a column,
//! - `values` holds the matching values.
//!
//! Unlike `faer::sparse::SparseColMat`, the structure is mutable: entries can be inserted with
//! [`CscMatrix::set`] and dropped with [`CscMatrix::remove`]. Explicitly stored zeros are legal
//! and are never removed implicitly.
//!
//! ## Example Usage
//! ```
//! use trisolve::sparse::CscMatrix;
//!
//! let mut mat = CscMatrix::new(3, 3);
//! mat.set(0, 0, 2.0);
//! mat.set(2, 0, -1.0);
//! mat.set(1, 1, 4.0);
//!
//! assert_eq!(mat.nnz(), 3);
//! assert_eq!(mat.get(2, 0), -1.0);
//! assert_eq!(mat.get(1, 0), 0.0);
//!
//! mat.remove(1, 0); // not stored, nothing happens
//! mat.remove(2, 0);
//! assert_eq!(mat.nnz(), 2);
//! ```

use std::ops::Range;

use problemo::{Problem, ProblemResult};

use crate::E;
use crate::linalg::options::Triangle;
use crate::linalg::solver::LinearSolverError;

/// Sparse matrix in compressed sparse column format.
#[derive(Clone, Debug, PartialEq)]
pub struct CscMatrix {
    nrows: usize,
    ncols: usize,
    /// Start offset of every column, plus the total length at the end.
    col_ptrs: Vec<usize>,
    /// Row of every stored entry.
    row_idx: Vec<usize>,
    /// Value of every stored entry.
    values: Vec<E>,
}

impl CscMatrix {
    /// Creates an empty `nrows x ncols` matrix.
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self::with_capacity(nrows, ncols, 0)
    }

    /// Creates an empty `nrows x ncols` matrix with room for `nnz` entries.
    pub fn with_capacity(nrows: usize, ncols: usize, nnz: usize) -> Self {
        Self {
            nrows,
            ncols,
            col_ptrs: vec![0; ncols + 1],
            row_idx: Vec::with_capacity(nnz),
            values: Vec::with_capacity(nnz),
        }
    }

    /// Builds a matrix from raw CSC arrays, checking every structural invariant.
    pub fn try_new(
        nrows: usize,
        ncols: usize,
        col_ptrs: Vec<usize>,
        row_idx: Vec<usize>,
        values: Vec<E>,
    ) -> Result<Self, Problem> {
        let mat = Self {
            nrows,
            ncols,
            col_ptrs,
            row_idx,
            values,
        };
        if !mat.is_structure_valid() {
            return Err(LinearSolverError::InvalidStructure.into());
        }
        Ok(mat)
    }

    /// Builds a matrix from raw arrays the caller guarantees to be valid.
    pub(crate) fn from_raw_parts(
        nrows: usize,
        ncols: usize,
        col_ptrs: Vec<usize>,
        row_idx: Vec<usize>,
        values: Vec<E>,
    ) -> Self {
        debug_assert_eq!(col_ptrs.len(), ncols + 1);
        debug_assert_eq!(row_idx.len(), values.len());
        Self {
            nrows,
            ncols,
            col_ptrs,
            row_idx,
            values,
        }
    }

    /// The `n x n` identity.
    pub fn identity(n: usize) -> Self {
        Self::diag(&vec![1.0; n])
    }

    /// A square diagonal matrix holding `diag` on its diagonal. Zeros are stored too.
    pub fn diag(diag: &[E]) -> Self {
        let n = diag.len();
        Self {
            nrows: n,
            ncols: n,
            col_ptrs: (0..=n).collect(),
            row_idx: (0..n).collect(),
            values: diag.to_vec(),
        }
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of stored entries, explicit zeros included.
    pub fn nnz(&self) -> usize {
        self.row_idx.len()
    }

    pub fn col_ptrs(&self) -> &[usize] {
        &self.col_ptrs
    }

    pub fn row_idx(&self) -> &[usize] {
        &self.row_idx
    }

    pub fn values(&self) -> &[E] {
        &self.values
    }

    /// Mutable access to the values. The structure stays fixed.
    pub fn values_mut(&mut self) -> &mut [E] {
        &mut self.values
    }

    /// Storage range of column `col`.
    #[inline]
    pub fn col_range(&self, col: usize) -> Range<usize> {
        self.col_ptrs[col]..self.col_ptrs[col + 1]
    }

    #[inline]
    pub fn row_idx_of_col(&self, col: usize) -> &[usize] {
        &self.row_idx[self.col_range(col)]
    }

    #[inline]
    pub fn val_of_col(&self, col: usize) -> &[E] {
        &self.values[self.col_range(col)]
    }

    /// Iterates over the `(row, value)` pairs of column `col` in increasing row order.
    pub fn column(&self, col: usize) -> impl Iterator<Item = (usize, E)> + '_ {
        self.row_idx_of_col(col)
            .iter()
            .copied()
            .zip(self.val_of_col(col).iter().copied())
    }

    /// Storage offset of entry `(row, col)`, or `None` when it is not stored.
    ///
    /// # Panics
    /// Panics if `(row, col)` lies outside the matrix.
    pub fn find(&self, row: usize, col: usize) -> Option<usize> {
        self.assert_in_bounds(row, col);
        let start = self.col_ptrs[col];
        self.row_idx_of_col(col)
            .binary_search(&row)
            .ok()
            .map(|offset| start + offset)
    }

    /// Value at `(row, col)`; `0.0` when the entry is not stored.
    ///
    /// # Panics
    /// Panics if `(row, col)` lies outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> E {
        self.find(row, col).map_or(0.0, |idx| self.values[idx])
    }

    /// Assigns `value` to `(row, col)`, inserting the entry when it is not stored yet.
    ///
    /// Insertion shifts the tail of the storage, so filling a matrix column by column in
    /// increasing order is the cheap path.
    ///
    /// # Panics
    /// Panics if `(row, col)` lies outside the matrix.
    pub fn set(&mut self, row: usize, col: usize, value: E) {
        self.assert_in_bounds(row, col);
        let start = self.col_ptrs[col];
        match self.row_idx_of_col(col).binary_search(&row) {
            Ok(offset) => self.values[start + offset] = value,
            Err(offset) => {
                self.row_idx.insert(start + offset, row);
                self.values.insert(start + offset, value);
                self.col_ptrs[col + 1..].iter_mut().for_each(|ptr| *ptr += 1);
            }
        }
    }

    /// Drops the entry at `(row, col)` from the structure. Removing an entry that is not stored
    /// is a no-op.
    ///
    /// # Panics
    /// Panics if `(row, col)` lies outside the matrix.
    pub fn remove(&mut self, row: usize, col: usize) {
        if let Some(idx) = self.find(row, col) {
            self.row_idx.remove(idx);
            self.values.remove(idx);
            self.col_ptrs[col + 1..].iter_mut().for_each(|ptr| *ptr -= 1);
        }
    }

    /// Drops every stored entry, keeping the shape and the allocation.
    pub fn zero(&mut self) {
        self.col_ptrs.fill(0);
        self.row_idx.clear();
        self.values.clear();
    }

    /// An empty matrix with the same shape and the same reserved capacity.
    pub fn create_like(&self) -> Self {
        Self::with_capacity(self.nrows, self.ncols, self.row_idx.capacity())
    }

    /// Changes the shape and drops every stored entry.
    pub fn reshape(&mut self, nrows: usize, ncols: usize) {
        self.nrows = nrows;
        self.ncols = ncols;
        self.col_ptrs.clear();
        self.col_ptrs.resize(ncols + 1, 0);
        self.row_idx.clear();
        self.values.clear();
    }

    /// Reserves room for `additional` more entries.
    pub fn reserve(&mut self, additional: usize) -> Result<(), Problem> {
        self.row_idx
            .try_reserve(additional)
            .via(LinearSolverError::MemoryReservation)?;
        self.values
            .try_reserve(additional)
            .via(LinearSolverError::MemoryReservation)?;
        Ok(())
    }

    /// Releases spare capacity so the storage holds exactly `nnz` entries.
    pub fn shrink_to_fit(&mut self) {
        self.row_idx.shrink_to_fit();
        self.values.shrink_to_fit();
    }

    /// Storage capacity of the entry arrays.
    pub fn capacity(&self) -> usize {
        self.row_idx.capacity().min(self.values.capacity())
    }

    /// Returns the transpose. Rows come out sorted since columns are scanned in order.
    pub fn transpose(&self) -> Self {
        let nnz = self.nnz();
        let mut col_ptrs = vec![0usize; self.nrows + 1];
        for &row in &self.row_idx {
            col_ptrs[row + 1] += 1;
        }
        for i in 0..self.nrows {
            col_ptrs[i + 1] += col_ptrs[i];
        }

        let mut next = col_ptrs.clone();
        let mut row_idx = vec![0usize; nnz];
        let mut values = vec![0.0; nnz];
        for col in 0..self.ncols {
            for (row, value) in self.column(col) {
                let dst = next[row];
                row_idx[dst] = col;
                values[dst] = value;
                next[row] += 1;
            }
        }

        Self::from_raw_parts(self.ncols, self.nrows, col_ptrs, row_idx, values)
    }

    /// Checks the CSC invariants: pointer table shape, monotonic offsets, rows in range and
    /// strictly increasing within each column.
    pub fn is_structure_valid(&self) -> bool {
        if self.col_ptrs.len() != self.ncols + 1
            || self.col_ptrs[0] != 0
            || self.col_ptrs[self.ncols] != self.row_idx.len()
            || self.row_idx.len() != self.values.len()
        {
            return false;
        }
        if self.col_ptrs.windows(2).any(|w| w[0] > w[1]) {
            return false;
        }
        (0..self.ncols).all(|col| {
            let rows = self.row_idx_of_col(col);
            rows.windows(2).all(|w| w[0] < w[1]) && rows.last().is_none_or(|&r| r < self.nrows)
        })
    }

    /// `true` when the matrix is square and every stored entry lies in `triangle`, diagonal
    /// included.
    pub fn is_triangular(&self, triangle: Triangle) -> bool {
        if self.nrows != self.ncols {
            return false;
        }
        (0..self.ncols).all(|col| {
            let rows = self.row_idx_of_col(col);
            match triangle {
                Triangle::Lower => rows.first().is_none_or(|&r| r >= col),
                Triangle::Upper => rows.last().is_none_or(|&r| r <= col),
            }
        })
    }

    /// Appends a new column made of `entries` (sorted by row, in range). Used when building a
    /// matrix one column at a time.
    pub(crate) fn push_column(
        &mut self,
        col: usize,
        entries: impl IntoIterator<Item = (usize, E)>,
    ) {
        for (row, value) in entries {
            self.row_idx.push(row);
            self.values.push(value);
        }
        self.col_ptrs[col + 1] = self.row_idx.len();
    }

    fn assert_in_bounds(&self, row: usize, col: usize) {
        assert!(
            row < self.nrows && col < self.ncols,
            "index ({row}, {col}) out of bounds for a {}x{} matrix",
            self.nrows,
            self.ncols
        );
    }
}
