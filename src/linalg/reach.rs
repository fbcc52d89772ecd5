//! # Reachability of a Sparse Right-Hand Side
//!
//! Solving `G x = b` with a triangular `G` and a sparse `b` only touches the rows reachable
//! from the pattern of `b` in the graph of `G` (an edge `j -> i` for every stored `G[i, j]`).
//! [`search_nz_rows_in_b`] finds those rows with a depth-first search and returns them in
//! topological order, which is exactly the order the substitution has to follow.
//!
//! ## Buffers
//! - `xi` (length `>= n`): after a call returning `top`, `xi[top..n]` holds the reach. The front
//!   of the array doubles as the DFS node stack, so `xi[..top]` is garbage.
//! - `w` (length `>= 2 n`): `w[..n]` are visited marks and `w[n..2 n]` the child pointer of each
//!   stack level. `w[..n]` must be zero on entry and is zero again on return, so the same
//!   buffers can be reused for every column of a right-hand side.
//!
//! [`ReachWorkspace`] owns both buffers and grows them as needed.
//!
//! ## Example Usage
//! ```
//! use trisolve::linalg::reach::ReachWorkspace;
//! use trisolve::sparse::CscMatrix;
//!
//! // L = [1 0 0]
//! //     [1 1 0]
//! //     [0 0 1]
//! let mut l = CscMatrix::identity(3);
//! l.set(1, 0, 1.0);
//!
//! let mut b = CscMatrix::new(3, 1);
//! b.set(0, 0, 1.0);
//!
//! let mut work = ReachWorkspace::new(3);
//! work.search(&l, &b, 0).unwrap();
//! assert_eq!(work.reach(), &[0, 1]);
//! ```

use problemo::Problem;

use crate::linalg::solver::{check_column, check_rows, check_square};
use crate::sparse::CscMatrix;

/// Computes the rows of the triangular matrix `a` reached from the non-zeros of column
/// `col_b` of `b`.
///
/// Returns `top` such that `xi[top..n]` lists the reached rows in topological order: every
/// row comes before the rows it updates during substitution. `top == n` when the column of `b`
/// is empty.
///
/// # Errors
/// `a` must be square, `b` must have as many rows as `a`, and `col_b` must be a column of `b`.
///
/// # Panics
/// Panics if `xi.len() < n` or `w.len() < 2 * n`. Behaviour is unspecified if `w[..n]` is not
/// zero on entry.
pub fn search_nz_rows_in_b(
    a: &CscMatrix,
    b: &CscMatrix,
    col_b: usize,
    xi: &mut [usize],
    w: &mut [usize],
) -> Result<usize, Problem> {
    let n = check_square(a)?;
    check_rows(n, b.nrows())?;
    check_column(b, col_b)?;
    assert!(xi.len() >= n, "xi must hold at least {n} entries, found {}", xi.len());
    assert!(w.len() >= 2 * n, "w must hold at least {} entries, found {}", 2 * n, w.len());

    let (marked, next) = w.split_at_mut(n);

    let mut top = n;
    for &row in b.row_idx_of_col(col_b) {
        if marked[row] == 0 {
            top = depth_first(a, row, top, xi, marked, next);
        }
    }

    for &node in &xi[top..n] {
        marked[node] = 0;
    }

    Ok(top)
}

/// Iterative DFS from `start`. The node stack grows upward from `xi[0]`, finished nodes are
/// written downward from `xi[top - 1]`; the two never overlap since every node is on at most
/// one side.
fn depth_first(
    a: &CscMatrix,
    start: usize,
    mut top: usize,
    xi: &mut [usize],
    marked: &mut [usize],
    next: &mut [usize],
) -> usize {
    let col_ptrs = a.col_ptrs();
    let row_idx = a.row_idx();

    let mut head = 0;
    xi[head] = start;
    loop {
        let node = xi[head];
        if marked[node] == 0 {
            marked[node] = 1;
            next[head] = col_ptrs[node];
        }

        let end = col_ptrs[node + 1];
        let child = (next[head]..end).find(|&p| marked[row_idx[p]] == 0);

        match child {
            Some(p) => {
                next[head] = p + 1;
                head += 1;
                xi[head] = row_idx[p];
            }
            None => {
                top -= 1;
                xi[top] = node;
                if head == 0 {
                    break;
                }
                head -= 1;
            }
        }
    }
    top
}

/// Owned, reusable buffers for [`search_nz_rows_in_b`].
#[derive(Clone, Debug, Default)]
pub struct ReachWorkspace {
    xi: Vec<usize>,
    w: Vec<usize>,
    /// Dimension of the last search.
    n: usize,
    /// Start of the reach in `xi` after the last search.
    top: usize,
}

impl ReachWorkspace {
    pub fn new(n: usize) -> Self {
        let mut work = Self::default();
        work.ensure(n);
        work
    }

    /// Grows the buffers to handle matrices of dimension `n`.
    pub fn ensure(&mut self, n: usize) {
        if self.xi.len() < n {
            self.xi.resize(n, 0);
        }
        if self.w.len() < 2 * n {
            // the old child-pointer half would land inside the new mark half
            self.w.clear();
            self.w.resize(2 * n, 0);
        }
    }

    /// Runs [`search_nz_rows_in_b`] on the owned buffers and returns `top`.
    pub fn search(&mut self, a: &CscMatrix, b: &CscMatrix, col_b: usize) -> Result<usize, Problem> {
        let n = a.ncols();
        self.ensure(n);
        let top = search_nz_rows_in_b(a, b, col_b, &mut self.xi, &mut self.w)?;
        self.n = n;
        self.top = top;
        Ok(top)
    }

    /// Start of the reach in [`ReachWorkspace::xi`] after the last search.
    pub fn top(&self) -> usize {
        self.top
    }

    /// Reached rows of the last search, in topological order.
    pub fn reach(&self) -> &[usize] {
        &self.xi[self.top..self.n]
    }

    pub(crate) fn reach_mut(&mut self) -> &mut [usize] {
        &mut self.xi[self.top..self.n]
    }

    /// The whole ordering buffer, stale prefix included.
    pub fn xi(&self) -> &[usize] {
        &self.xi
    }
}
