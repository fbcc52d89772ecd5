//! Explicit conversions between the sparse formats of this crate and the dense and sparse
//! matrix types of faer.

use faer::sparse::{SparseColMat, SparseColMatRef, SymbolicSparseColMat};
use faer::{Mat, MatRef};

use crate::sparse::{CscMatrix, TripletMatrix};
use crate::{E, I};

impl CscMatrix {
    /// Compresses a triplet matrix. Rows are sorted within each column and duplicate
    /// coordinates are summed into one entry.
    pub fn from_triplets(triplets: &TripletMatrix) -> Self {
        let ncols = triplets.ncols();
        let items = triplets.items();

        // bucket the items by column
        let mut counts = vec![0usize; ncols + 1];
        for item in items {
            counts[item.col + 1] += 1;
        }
        for col in 0..ncols {
            counts[col + 1] += counts[col];
        }
        let mut next = counts.clone();
        let mut order = vec![0usize; items.len()];
        for (idx, item) in items.iter().enumerate() {
            order[next[item.col]] = idx;
            next[item.col] += 1;
        }

        let mut out = CscMatrix::with_capacity(triplets.nrows(), ncols, items.len());
        let mut column: Vec<(usize, E)> = Vec::new();
        for col in 0..ncols {
            column.clear();
            column.extend(
                order[counts[col]..counts[col + 1]]
                    .iter()
                    .map(|&idx| (items[idx].row, items[idx].value)),
            );
            column.sort_by_key(|&(row, _)| row);
            column.dedup_by(|next, kept| {
                if next.0 == kept.0 {
                    kept.1 += next.1;
                    true
                } else {
                    false
                }
            });
            out.push_column(col, column.iter().copied());
        }
        out
    }

    /// Stores every entry of `dense` that is not exactly zero.
    pub fn from_dense(dense: MatRef<'_, E>) -> Self {
        let (nrows, ncols) = (dense.nrows(), dense.ncols());
        let mut out = CscMatrix::new(nrows, ncols);
        for col in 0..ncols {
            out.push_column(
                col,
                (0..nrows)
                    .map(|row| (row, dense[(row, col)]))
                    .filter(|&(_, value)| value != 0.0),
            );
        }
        out
    }

    /// Dense copy of the matrix.
    pub fn to_dense(&self) -> Mat<E> {
        let mut out = Mat::<E>::zeros(self.nrows(), self.ncols());
        for col in 0..self.ncols() {
            for (row, value) in self.column(col) {
                out[(row, col)] = value;
            }
        }
        out
    }

    /// Copies a faer sparse matrix. faer allows unsorted columns, so each column is sorted
    /// on the way in.
    pub fn from_faer(mat: SparseColMatRef<'_, I, E>) -> Self {
        let ncols = mat.ncols();
        let mut out = CscMatrix::new(mat.nrows(), ncols);
        let mut column: Vec<(usize, E)> = Vec::new();
        for col in 0..ncols {
            column.clear();
            column.extend(
                mat.row_idx_of_col_raw(col)
                    .iter()
                    .copied()
                    .zip(mat.val_of_col(col).iter().copied()),
            );
            column.sort_by_key(|&(row, _)| row);
            out.push_column(col, column.iter().copied());
        }
        out
    }

    /// Copies the matrix into faer's sparse type, e.g. to multiply it with a dense `faer::Mat`.
    pub fn to_faer(&self) -> SparseColMat<I, E> {
        SparseColMat::<I, E>::new(
            // SAFETY: the column pointers and row indices satisfy the CSC invariants upheld by
            // every constructor and mutator of `CscMatrix`.
            unsafe {
                SymbolicSparseColMat::new_unchecked(
                    self.nrows(),
                    self.ncols(),
                    self.col_ptrs().to_vec(),
                    None,
                    self.row_idx().to_vec(),
                )
            },
            self.values().to_vec(),
        )
    }
}
