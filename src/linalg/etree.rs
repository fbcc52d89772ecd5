//! # Elimination Trees
//!
//! The elimination tree of a symmetric matrix records, for every column `j`, the first column
//! `parent[j] > j` that receives fill from `j` during Cholesky factorization. It predicts the
//! structure of the factor without computing it.
//!
//! - [`elimination_tree`] builds the tree from the upper triangle of `A`, or of `AᵀA` without
//!   forming the product (`ata = true`, for tall least-squares inputs).
//! - [`postorder`] orders the tree so children come before their parent.
//! - [`search_nz_rows_elim`] walks the tree to get the pattern of one row of the factor.
//!
//! ## Example Usage
//! ```
//! use trisolve::linalg::etree::compute_elimination_tree;
//! use trisolve::sparse::CscMatrix;
//!
//! // every column overlaps the previous one: the tree is a chain
//! let mut a = CscMatrix::identity(3);
//! a.set(0, 1, 1.0);
//! a.set(1, 2, 1.0);
//!
//! let parent = compute_elimination_tree(&a, false);
//! assert_eq!(parent, vec![Some(1), Some(2), None]);
//! ```

use problemo::Problem;

use crate::linalg::solver::check_column;
use crate::sparse::CscMatrix;

/// Fills `parent[..ncols]` with the elimination tree of `a` (`ata = false`) or of `aᵀa`
/// (`ata = true`). Roots get `None`.
///
/// With `ata = false` the pattern is read as symmetric: a stored `a[i, k]` below the diagonal
/// counts as the entry `(k, i)`, so an upper, lower or full pattern gives the same tree. `work`
/// is resized to `ncols` entries, plus `nrows` in `ata` mode.
///
/// # Panics
/// Panics if `parent.len() < ncols`.
pub fn elimination_tree(
    a: &CscMatrix,
    ata: bool,
    parent: &mut [Option<usize>],
    work: &mut Vec<Option<usize>>,
) {
    let (m, n) = (a.nrows(), a.ncols());
    assert!(
        parent.len() >= n,
        "parent must hold at least {n} entries, found {}",
        parent.len()
    );

    work.clear();
    work.resize(if ata { n + m } else { n }, None);
    // ancestor: path-compressed pointer toward the current root of each column's subtree
    // previous: last column that had a non-zero in each row (ata only)
    let (ancestor, previous) = work.split_at_mut(n);

    let (lower_ptrs, lower_cols) = if ata {
        (vec![0; n + 1], Vec::new())
    } else {
        lower_by_row(a)
    };

    for k in 0..n {
        parent[k] = None;
        ancestor[k] = None;

        let mirrored = &lower_cols[lower_ptrs[k]..lower_ptrs[k + 1]];
        for &row in a.row_idx_of_col(k).iter().chain(mirrored) {
            let mut i = if ata { previous[row] } else { Some(row) };

            while let Some(node) = i.filter(|&node| node < k) {
                let next = ancestor[node];
                ancestor[node] = Some(k);
                if next.is_none() {
                    parent[node] = Some(k);
                    break;
                }
                i = next;
            }

            if ata {
                previous[row] = Some(k);
            }
        }
    }
}

/// Strictly lower entries of the leading `ncols x ncols` block, grouped by row: the columns
/// `j < i` with a stored `a[i, j]` are `cols[ptrs[i]..ptrs[i + 1]]`.
fn lower_by_row(a: &CscMatrix) -> (Vec<usize>, Vec<usize>) {
    let n = a.ncols();
    let below = |j: usize| {
        a.row_idx_of_col(j)
            .iter()
            .copied()
            .filter(move |&i| i > j && i < n)
    };

    let mut ptrs = vec![0usize; n + 1];
    for j in 0..n {
        below(j).for_each(|i| ptrs[i + 1] += 1);
    }
    for i in 0..n {
        ptrs[i + 1] += ptrs[i];
    }

    let mut next = ptrs.clone();
    let mut cols = vec![0usize; ptrs[n]];
    for j in 0..n {
        for i in below(j) {
            cols[next[i]] = j;
            next[i] += 1;
        }
    }
    (ptrs, cols)
}

/// Allocating form of [`elimination_tree`].
pub fn compute_elimination_tree(a: &CscMatrix, ata: bool) -> Vec<Option<usize>> {
    let mut parent = vec![None; a.ncols()];
    let mut work = Vec::new();
    elimination_tree(a, ata, &mut parent, &mut work);

    tracing::debug!(
        nrows = a.nrows(),
        ncols = a.ncols(),
        ata,
        roots = parent.iter().filter(|p| p.is_none()).count(),
        "elimination tree"
    );

    parent
}

/// Postorder of the forest described by `parent`: every node comes after all of its
/// descendants. Trees are visited in increasing root order and siblings in increasing order.
pub fn postorder(parent: &[Option<usize>]) -> Vec<usize> {
    let n = parent.len();

    // child lists, built backwards so they come out sorted
    let mut first_child: Vec<Option<usize>> = vec![None; n];
    let mut next_sibling: Vec<Option<usize>> = vec![None; n];
    for j in (0..n).rev() {
        if let Some(p) = parent[j] {
            next_sibling[j] = first_child[p];
            first_child[p] = Some(j);
        }
    }

    let mut post = Vec::with_capacity(n);
    let mut stack = Vec::with_capacity(n);
    for root in (0..n).filter(|&j| parent[j].is_none()) {
        stack.push(root);
        while let Some(&node) = stack.last() {
            match first_child[node] {
                Some(child) => {
                    // unlink the child so the node is finished once its list is empty
                    first_child[node] = next_sibling[child];
                    stack.push(child);
                }
                None => {
                    stack.pop();
                    post.push(node);
                }
            }
        }
    }
    post
}

/// Non-zero pattern of row `k` of the Cholesky factor `L` of `a`, given the elimination tree
/// `parent` of `a`.
///
/// Every entry `a[i, k]` with `i < k` adds the tree path from `i` up to (excluding) the first
/// already marked node; `k` is marked up front so no path crosses it. Returns `top` such that
/// `s[top..ncols]` holds the pattern, grouped by path with each path in topological order.
/// `w[..ncols]` must be `false` on entry and is `false` again on return.
///
/// # Errors
/// `k` must be a column of `a`.
///
/// # Panics
/// Panics if `s` or `w` hold fewer than `ncols` entries.
pub fn search_nz_rows_elim(
    a: &CscMatrix,
    k: usize,
    parent: &[Option<usize>],
    s: &mut [usize],
    w: &mut [bool],
) -> Result<usize, Problem> {
    check_column(a, k)?;
    let n = a.ncols();
    assert!(s.len() >= n, "s must hold at least {n} entries, found {}", s.len());
    assert!(w.len() >= n, "w must hold at least {n} entries, found {}", w.len());

    let mut top = n;
    w[k] = true;

    // a column of A is a row of A' (symmetric pattern)
    for &row in a.row_idx_of_col(k) {
        if row > k {
            continue;
        }

        let mut len = 0;
        let mut node = Some(row);
        while let Some(i) = node.filter(|&i| !w[i]) {
            s[len] = i;
            len += 1;
            w[i] = true;
            node = parent[i];
        }

        // move the path to the output, keeping its order
        while len > 0 {
            top -= 1;
            len -= 1;
            s[top] = s[len];
        }
    }

    for &i in &s[top..n] {
        w[i] = false;
    }
    w[k] = false;

    Ok(top)
}
