//! # Sparse Triangular Solves
//!
//! Forward and back substitution against a triangular [`CscMatrix`]:
//! - [`solve_lower`], [`solve_upper`] and [`solve_dense`] for a dense right-hand side,
//! - [`solve_sparse_vector`] for one column of a sparse right-hand side, doing work only on the
//!   rows found by the reachability search,
//! - [`solve_sparse_matrix`] for a whole sparse right-hand side, producing a sparse solution,
//! - [`TriangularFactor`], the same operations behind the [`Solver`] trait.
//!
//! The diagonal of column `j` is its first stored entry for a lower factor and its last one for
//! an upper factor. A zero or missing diagonal is not detected by default: the division follows
//! IEEE semantics and infinities or NaNs flow into the solution. [`check_diagonal`] (or
//! [`SingularCheck::Error`]) turns it into an error instead.
//!
//! ## Example Usage
//! ```
//! use trisolve::linalg::options::Triangle;
//! use trisolve::linalg::triangular::{SparseSolveWorkspace, solve_lower, solve_sparse_matrix};
//! use trisolve::sparse::CscMatrix;
//!
//! // L = [2 0 0]
//! //     [1 1 0]
//! //     [0 0 4]
//! let mut l = CscMatrix::diag(&[2.0, 1.0, 4.0]);
//! l.set(1, 0, 1.0);
//!
//! let mut x = vec![2.0, 3.0, 8.0];
//! solve_lower(&l, &mut x).unwrap();
//! assert_eq!(x, vec![1.0, 2.0, 2.0]);
//!
//! let mut b = CscMatrix::new(3, 1);
//! b.set(0, 0, 2.0);
//! let mut sol = CscMatrix::new(3, 1);
//! let mut work = SparseSolveWorkspace::new(3);
//! solve_sparse_matrix(&l, Triangle::Lower, &b, &mut sol, &mut work).unwrap();
//! assert_eq!(sol.nnz(), 2); // row 2 is never touched
//! assert_eq!(sol.get(1, 0), -1.0);
//! ```

use std::ops::Range;

use faer::MatMut;
use problemo::Problem;

use crate::E;
use crate::linalg::options::{SingularCheck, Triangle, TriangularOptions};
use crate::linalg::reach::ReachWorkspace;
use crate::linalg::solver::{LinearSolverError, Solver, check_column, check_rows, check_square};
use crate::sparse::CscMatrix;

/// Diagonal value of column `col` and the storage range of its off-diagonal entries.
/// A missing diagonal reads as `0.0`.
#[inline]
fn split_diagonal(t: &CscMatrix, col: usize, triangle: Triangle) -> (E, Range<usize>) {
    let Range { start, end } = t.col_range(col);
    let rows = t.row_idx();
    match triangle {
        Triangle::Lower if start < end && rows[start] == col => {
            (t.values()[start], start + 1..end)
        }
        Triangle::Upper if start < end && rows[end - 1] == col => {
            (t.values()[end - 1], start..end - 1)
        }
        _ => (0.0, start..end),
    }
}

/// Finishes unknown `col`: divides by the diagonal and subtracts its contribution from every
/// row it updates.
#[inline]
fn eliminate(t: &CscMatrix, triangle: Triangle, col: usize, x: &mut [E]) {
    let (diag, off) = split_diagonal(t, col, triangle);
    x[col] /= diag;
    let x_col = x[col];

    let rows = &t.row_idx()[off.clone()];
    let values = &t.values()[off];
    for (&row, &value) in rows.iter().zip(values) {
        x[row] -= value * x_col;
    }
}

/// Solves `L x = b` in place, `x` holding `b` on entry.
pub fn solve_lower(l: &CscMatrix, x: &mut [E]) -> Result<(), Problem> {
    solve_dense(l, Triangle::Lower, x)
}

/// Solves `U x = b` in place, `x` holding `b` on entry.
pub fn solve_upper(u: &CscMatrix, x: &mut [E]) -> Result<(), Problem> {
    solve_dense(u, Triangle::Upper, x)
}

/// Solves `T x = b` in place for a dense `b`. No structural analysis is done: every column of
/// `t` is visited.
pub fn solve_dense(t: &CscMatrix, triangle: Triangle, x: &mut [E]) -> Result<(), Problem> {
    let n = check_square(t)?;
    check_rows(n, x.len())?;

    match triangle {
        Triangle::Lower => (0..n).for_each(|col| eliminate(t, Triangle::Lower, col, x)),
        Triangle::Upper => (0..n)
            .rev()
            .for_each(|col| eliminate(t, Triangle::Upper, col, x)),
    }
    Ok(())
}

/// Solves `G x = b[:, col_b]` for one column of a sparse right-hand side.
///
/// Only the rows in the reach of `b[:, col_b]` are cleared, written and used, in the order
/// given by the reachability search; the rest of `x` is left untouched. After the call the
/// solved rows are `work.reach()`.
///
/// Returns the number of solved rows, an upper bound on the non-zeros of the solution (values
/// can still cancel to zero).
pub fn solve_sparse_vector(
    g: &CscMatrix,
    triangle: Triangle,
    b: &CscMatrix,
    col_b: usize,
    x: &mut [E],
    work: &mut ReachWorkspace,
) -> Result<usize, Problem> {
    let n = check_square(g)?;
    check_rows(n, b.nrows())?;
    check_column(b, col_b)?;
    check_rows(n, x.len())?;

    let top = work.search(g, b, col_b)?;

    for &row in work.reach() {
        x[row] = 0.0;
    }
    for (row, value) in b.column(col_b) {
        x[row] = value;
    }
    for &col in work.reach() {
        eliminate(g, triangle, col, x);
    }

    Ok(n - top)
}

/// Buffers for [`solve_sparse_matrix`]: the reachability buffers plus a dense column.
#[derive(Clone, Debug, Default)]
pub struct SparseSolveWorkspace {
    reach: ReachWorkspace,
    dense: Vec<E>,
}

impl SparseSolveWorkspace {
    pub fn new(n: usize) -> Self {
        let mut work = Self::default();
        work.ensure(n);
        work
    }

    /// Grows the buffers to handle matrices of dimension `n`.
    pub fn ensure(&mut self, n: usize) {
        self.reach.ensure(n);
        if self.dense.len() < n {
            self.dense.resize(n, 0.0);
        }
    }
}

/// Solves `G X = B` for a sparse `B`, writing the sparse solution into `x`.
///
/// `x` is reshaped to `n x B.ncols()` and filled column by column. Its storage grows as columns
/// are appended (the final size is unknown up front) and is trimmed to the resulting non-zero
/// count at the end. Entries that cancel to zero stay stored.
pub fn solve_sparse_matrix(
    g: &CscMatrix,
    triangle: Triangle,
    b: &CscMatrix,
    x: &mut CscMatrix,
    work: &mut SparseSolveWorkspace,
) -> Result<(), Problem> {
    let n = check_square(g)?;
    check_rows(n, b.nrows())?;

    x.reshape(n, b.ncols());
    work.ensure(n);

    for col in 0..b.ncols() {
        let count =
            solve_sparse_vector(g, triangle, b, col, &mut work.dense[..n], &mut work.reach)?;

        if x.capacity() < x.nnz() + count {
            x.reserve(x.nnz() + count)?;
            tracing::trace!(col, capacity = x.capacity(), "grew sparse solution");
        }

        let rows = work.reach.reach_mut();
        rows.sort_unstable();
        let dense = &work.dense;
        x.push_column(col, rows.iter().map(|&row| (row, dense[row])));
    }
    x.shrink_to_fit();

    tracing::debug!(
        n,
        ncols = b.ncols(),
        nnz_b = b.nnz(),
        nnz_x = x.nnz(),
        "sparse triangular solve"
    );

    Ok(())
}

/// Fails with [`LinearSolverError::SingularFactor`] on the first column whose diagonal is zero
/// or missing.
pub fn check_diagonal(t: &CscMatrix, triangle: Triangle) -> Result<(), Problem> {
    let n = check_square(t)?;
    match (0..n).find(|&col| split_diagonal(t, col, triangle).0 == 0.0) {
        Some(col) => Err(LinearSolverError::SingularFactor { col }.into()),
        None => Ok(()),
    }
}

/// A triangular factor used as a linear solver.
///
/// `analyze` validates the shape and pattern, `factorize` stores the values. The workspace is
/// kept between calls so repeated sparse solves do not reallocate.
pub struct TriangularFactor {
    options: TriangularOptions,
    /// Dimension (set by `analyze`).
    dim: Option<usize>,
    /// The factor (set by `factorize`).
    factor: Option<CscMatrix>,
    work: SparseSolveWorkspace,
}

impl Solver for TriangularFactor {
    fn new() -> Self {
        Self::with_options(TriangularOptions::default())
    }

    /// Checks that `mat` is square and only has entries in the configured triangle.
    fn analyze(&mut self, mat: &CscMatrix) -> Result<(), Problem> {
        let n = check_square(mat)?;
        if !mat.is_triangular(self.options.triangle) {
            return Err(LinearSolverError::NotTriangular.into());
        }

        self.dim = Some(n);
        self.factor = None;
        self.work.ensure(n);

        tracing::debug!(n, nnz = mat.nnz(), triangle = ?self.options.triangle, "analyzed factor");
        Ok(())
    }

    /// Stores the factor, rejecting a singular one when `SingularCheck::Error` is configured.
    /// The values may change between calls but the matrix must stay in the configured triangle.
    fn factorize(&mut self, mat: &CscMatrix) -> Result<(), Problem> {
        let dim = self.dim.ok_or(LinearSolverError::Uninitialized)?;
        let n = check_square(mat)?;
        check_rows(dim, n)?;
        if !mat.is_triangular(self.options.triangle) {
            return Err(LinearSolverError::NotTriangular.into());
        }

        if self.options.singular_check == SingularCheck::Error {
            check_diagonal(mat, self.options.triangle)?;
        }

        self.factor = Some(mat.clone());
        Ok(())
    }

    fn solve_in_place(&mut self, b: &mut MatMut<E>) -> Result<(), Problem> {
        let factor = self.factor.as_ref().ok_or(LinearSolverError::Uninitialized)?;
        let n = factor.nrows();
        check_rows(n, b.nrows())?;

        let dense = &mut self.work.dense[..n];
        for j in 0..b.ncols() {
            for (i, value) in dense.iter_mut().enumerate() {
                *value = b[(i, j)];
            }
            solve_dense(factor, self.options.triangle, dense)?;
            for (i, value) in dense.iter().enumerate() {
                b[(i, j)] = *value;
            }
        }
        Ok(())
    }
}

impl TriangularFactor {
    pub fn with_options(options: TriangularOptions) -> Self {
        Self {
            options,
            dim: None,
            factor: None,
            work: SparseSolveWorkspace::default(),
        }
    }

    pub fn options(&self) -> &TriangularOptions {
        &self.options
    }

    /// Solves against a sparse right-hand side and returns the sparse solution.
    pub fn solve_sparse(&mut self, b: &CscMatrix) -> Result<CscMatrix, Problem> {
        let factor = self.factor.as_ref().ok_or(LinearSolverError::Uninitialized)?;
        let mut x = CscMatrix::new(factor.nrows(), b.ncols());
        solve_sparse_matrix(factor, self.options.triangle, b, &mut x, &mut self.work)?;
        Ok(x)
    }
}
