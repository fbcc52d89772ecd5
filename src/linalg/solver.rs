use derive_more::{Display, Error};
use faer::{Mat, MatMut, MatRef};
use problemo::Problem;

use crate::E;
use crate::sparse::CscMatrix;

#[derive(Debug, Display, Error, PartialEq)]
pub enum LinearSolverError {
    #[display("Matrix must be square, found {nrows}x{ncols}")]
    NotSquare { nrows: usize, ncols: usize },

    #[display("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[display("Column {col} out of bounds for a matrix with {ncols} columns")]
    ColumnOutOfBounds { col: usize, ncols: usize },

    #[display("Matrix is not triangular")]
    NotTriangular,

    #[display("Invalid compressed column structure")]
    InvalidStructure,

    #[display("Zero or missing diagonal entry in column {col}")]
    SingularFactor { col: usize },

    #[display("Memory reservation failed")]
    MemoryReservation,

    #[display("Uninitialized error")]
    Uninitialized,
}

/// Checks that `mat` is square and returns its dimension.
pub(crate) fn check_square(mat: &CscMatrix) -> Result<usize, Problem> {
    if mat.nrows() != mat.ncols() {
        return Err(LinearSolverError::NotSquare {
            nrows: mat.nrows(),
            ncols: mat.ncols(),
        }
        .into());
    }
    Ok(mat.ncols())
}

/// Checks that a right-hand side has `expected` rows.
pub(crate) fn check_rows(expected: usize, found: usize) -> Result<(), Problem> {
    if expected != found {
        return Err(LinearSolverError::DimensionMismatch { expected, found }.into());
    }
    Ok(())
}

/// Checks that `col` names a column of `mat`.
pub(crate) fn check_column(mat: &CscMatrix, col: usize) -> Result<(), Problem> {
    if col >= mat.ncols() {
        return Err(LinearSolverError::ColumnOutOfBounds {
            col,
            ncols: mat.ncols(),
        }
        .into());
    }
    Ok(())
}

/// Trait for linear solvers supporting matrix analysis, factorization, and solving linear
/// systems.
///
/// Implementors must call `analyze` and `factorize` before solving systems.
pub trait Solver {
    fn new() -> Self
    where
        Self: Sized;

    /// Performs symbolic analysis of the given sparse matrix and prepares for factorization.
    fn analyze(&mut self, mat: &CscMatrix) -> Result<(), Problem>;

    /// Performs numeric factorization of the matrix after symbolic analysis.
    fn factorize(&mut self, mat: &CscMatrix) -> Result<(), Problem>;

    /// Refactorizes the matrix, typically used when the matrix structure remains but values change.
    fn refactorize(&mut self, mat: &CscMatrix) -> Result<(), Problem> {
        self.factorize(mat)
    }

    /// Solves the linear system in place for the given right-hand side `b`.
    fn solve_in_place(&mut self, b: &mut MatMut<E>) -> Result<(), Problem>;

    /// Solves the linear system for the given right-hand side `b` and returns the solution
    /// matrix.
    fn solve(&mut self, b: MatRef<E>) -> Result<Mat<E>, Problem> {
        let mut sol = Mat::zeros(b.nrows(), b.ncols());
        sol.copy_from(b);
        self.solve_in_place(&mut sol.as_mut())?;
        Ok(sol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LinearSolverError::NotSquare { nrows: 2, ncols: 3 }.to_string(),
            "Matrix must be square, found 2x3"
        );
        assert_eq!(
            LinearSolverError::SingularFactor { col: 4 }.to_string(),
            "Zero or missing diagonal entry in column 4"
        );
    }

    #[test]
    fn test_checks() {
        let square = CscMatrix::new(3, 3);
        let tall = CscMatrix::new(4, 3);

        assert_eq!(check_square(&square).unwrap(), 3);
        assert!(check_square(&tall).is_err());
        assert!(check_rows(3, 3).is_ok());
        assert!(check_rows(3, 4).is_err());
        assert!(check_column(&tall, 2).is_ok());
        assert!(check_column(&tall, 3).is_err());
    }
}
