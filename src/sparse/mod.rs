//! Sparse matrix storage.
//!
//! The crate works on [`CscMatrix`]; [`TripletMatrix`] is the assembly format. Both implement
//! [`SparseMatrix`] and can be held in the closed [`SparseFormat`] enum, which converts to CSC
//! explicitly through [`SparseFormat::into_csc`].

use enum_dispatch::enum_dispatch;

use crate::E;

pub mod convert;
pub mod csc;
pub mod random;
pub mod triplet;

pub use csc::CscMatrix;
pub use triplet::{TripletItem, TripletMatrix};

/// Element access shared by every sparse format.
#[enum_dispatch]
pub trait SparseMatrix {
    fn nrows(&self) -> usize;

    fn ncols(&self) -> usize;

    /// Number of stored entries.
    fn nnz(&self) -> usize;

    /// Value at `(row, col)`, `0.0` when nothing is stored there.
    fn get(&self, row: usize, col: usize) -> E;

    /// Assigns `value` to `(row, col)`, adding the entry to the structure if needed.
    fn set(&mut self, row: usize, col: usize, value: E);

    /// Removes `(row, col)` from the structure. Removing a missing entry is a no-op.
    fn remove(&mut self, row: usize, col: usize);

    /// Removes every entry.
    fn zero(&mut self);
}

impl SparseMatrix for CscMatrix {
    fn nrows(&self) -> usize {
        CscMatrix::nrows(self)
    }

    fn ncols(&self) -> usize {
        CscMatrix::ncols(self)
    }

    fn nnz(&self) -> usize {
        CscMatrix::nnz(self)
    }

    fn get(&self, row: usize, col: usize) -> E {
        CscMatrix::get(self, row, col)
    }

    fn set(&mut self, row: usize, col: usize, value: E) {
        CscMatrix::set(self, row, col, value)
    }

    fn remove(&mut self, row: usize, col: usize) {
        CscMatrix::remove(self, row, col)
    }

    fn zero(&mut self) {
        CscMatrix::zero(self)
    }
}

impl SparseMatrix for TripletMatrix {
    fn nrows(&self) -> usize {
        TripletMatrix::nrows(self)
    }

    fn ncols(&self) -> usize {
        TripletMatrix::ncols(self)
    }

    fn nnz(&self) -> usize {
        TripletMatrix::nnz(self)
    }

    fn get(&self, row: usize, col: usize) -> E {
        TripletMatrix::get(self, row, col)
    }

    fn set(&mut self, row: usize, col: usize, value: E) {
        TripletMatrix::set(self, row, col, value)
    }

    fn remove(&mut self, row: usize, col: usize) {
        TripletMatrix::remove(self, row, col)
    }

    fn zero(&mut self) {
        TripletMatrix::zero(self)
    }
}

/// The sparse formats understood by the crate.
#[enum_dispatch(SparseMatrix)]
#[derive(Clone, Debug, PartialEq)]
pub enum SparseFormat {
    Triplet(TripletMatrix),
    Csc(CscMatrix),
}

impl SparseFormat {
    /// Converts to compressed column storage, the format the solvers consume.
    pub fn into_csc(self) -> CscMatrix {
        match self {
            SparseFormat::Triplet(t) => CscMatrix::from_triplets(&t),
            SparseFormat::Csc(c) => c,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rstest_reuse::{apply, template};

    /// A `rows x cols` matrix with every entry filled with a distinct non-zero value.
    fn filled(mut mat: SparseFormat) -> SparseFormat {
        for row in 0..mat.nrows() {
            for col in 0..mat.ncols() {
                mat.set(row, col, (1 + row * 10 + col) as E);
            }
        }
        mat
    }

    #[template]
    #[rstest]
    fn sparse_formats(
        #[values(
            SparseFormat::from(TripletMatrix::new(3, 4)),
            SparseFormat::from(CscMatrix::new(3, 4))
        )]
        mat: SparseFormat,
    ) {
    }

    #[apply(sparse_formats)]
    fn test_set(mut mat: SparseFormat) {
        let orig = filled(mat.clone());
        mat = orig.clone();

        mat.set(1, 2, 10.0);
        mat.set(1, 2, 15.0);
        assert_eq!(mat.get(1, 2), 15.0);

        for row in 0..mat.nrows() {
            for col in 0..mat.ncols() {
                if (row, col) != (1, 2) {
                    assert_eq!(orig.get(row, col), mat.get(row, col));
                }
            }
        }

        mat.zero();
        mat.set(1, 2, 15.0);
        for row in 0..mat.nrows() {
            for col in 0..mat.ncols() {
                let expected = if (row, col) == (1, 2) { 15.0 } else { 0.0 };
                assert_eq!(mat.get(row, col), expected);
            }
        }
    }

    #[apply(sparse_formats)]
    fn test_get(mut mat: SparseFormat) {
        mat.set(1, 2, 5.0);
        for row in 0..mat.nrows() {
            for col in 0..mat.ncols() {
                let expected = if (row, col) == (1, 2) { 5.0 } else { 0.0 };
                assert_eq!(mat.get(row, col), expected);
            }
        }
    }

    #[apply(sparse_formats)]
    fn test_remove(mat: SparseFormat) {
        let mut mat = filled(mat);
        let nnz = mat.nnz();

        assert_ne!(mat.get(1, 2), 0.0);
        mat.remove(1, 2);
        assert_eq!(mat.get(1, 2), 0.0);
        assert_eq!(mat.nnz(), nnz - 1);

        // removing nothing must not blow up
        mat.remove(1, 2);
        assert_eq!(mat.get(1, 2), 0.0);
        assert_eq!(mat.nnz(), nnz - 1);

        let csc = mat.into_csc();
        assert!(csc.is_structure_valid());
        assert_eq!(csc.nnz(), nnz - 1);
    }

    #[apply(sparse_formats)]
    fn test_into_csc_preserves_values(mat: SparseFormat) {
        let mat = filled(mat);
        let csc = mat.clone().into_csc();
        for row in 0..mat.nrows() {
            for col in 0..mat.ncols() {
                assert_eq!(csc.get(row, col), mat.get(row, col));
            }
        }
    }
}
