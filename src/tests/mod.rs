//! Checks that span the sparse formats, the elimination tree and the solvers.

use faer::Mat;
use faer::rand::SeedableRng;
use faer::rand::rngs::StdRng;
use rstest::rstest;

use crate::E;
use crate::linalg::etree::{compute_elimination_tree, postorder, search_nz_rows_elim};
use crate::linalg::options::Triangle;
use crate::linalg::reach::ReachWorkspace;
use crate::linalg::triangular::{
    SparseSolveWorkspace, solve_dense, solve_sparse_matrix, solve_sparse_vector,
};
use crate::sparse::{CscMatrix, SparseFormat, TripletMatrix, random};

/// A diagonally dominant symmetric matrix with a random off-diagonal pattern.
fn random_spd(n: usize, nz_total: usize, rng: &mut StdRng) -> Mat<E> {
    let m = random::rectangle(n, n, nz_total, -1.0, 1.0, rng).to_dense();
    Mat::from_fn(n, n, |i, j| {
        let diag = if i == j { 2.0 * n as E } else { 0.0 };
        m[(i, j)] + m[(j, i)] + diag
    })
}

/// Dense Cholesky, lower factor.
fn cholesky(a: &Mat<E>) -> Mat<E> {
    let n = a.nrows();
    let mut l = Mat::<E>::zeros(n, n);
    for j in 0..n {
        let sum: E = (0..j).map(|k| l[(j, k)] * l[(j, k)]).sum();
        l[(j, j)] = (a[(j, j)] - sum).sqrt();
        for i in j + 1..n {
            let sum: E = (0..j).map(|k| l[(i, k)] * l[(j, k)]).sum();
            l[(i, j)] = (a[(i, j)] - sum) / l[(j, j)];
        }
    }
    l
}

fn is_ancestor(parent: &[Option<usize>], mut node: usize, ancestor: usize) -> bool {
    while let Some(p) = parent[node] {
        if p == ancestor {
            return true;
        }
        node = p;
    }
    false
}

/// Every non-zero of the numeric factor lies on a tree path and in the predicted row pattern.
#[rstest]
fn test_etree_predicts_cholesky_pattern(#[values(1, 2, 3, 4, 5)] seed: u64) {
    let rng = &mut StdRng::seed_from_u64(seed);
    let n = 9;
    let dense = random_spd(n, 12, rng);
    let a = CscMatrix::from_dense(dense.as_ref());
    let l = cholesky(&dense);

    let parent = compute_elimination_tree(&a, false);
    let mut s = vec![0; n];
    let mut w = vec![false; n];

    for k in 0..n {
        let top = search_nz_rows_elim(&a, k, &parent, &mut s, &mut w).unwrap();
        let pattern = &s[top..n];
        for j in 0..k {
            if l[(k, j)].abs() > 1e-12 {
                assert!(is_ancestor(&parent, j, k));
                assert!(pattern.contains(&j));
            }
        }
    }
}

/// The sparse solution of `L X = B` matches the dense one column by column.
#[rstest]
fn test_sparse_matrix_matches_dense(
    #[values(Triangle::Lower, Triangle::Upper)] triangle: Triangle,
    #[values(7, 8, 9)] seed: u64,
) {
    let rng = &mut StdRng::seed_from_u64(seed);
    let n = 12;
    let g = random::triangle(n, triangle, 40, -1.0, 1.0, rng);
    let b = random::rectangle(n, 4, 9, -1.0, 1.0, rng);

    let mut x = CscMatrix::new(n, 4);
    solve_sparse_matrix(&g, triangle, &b, &mut x, &mut SparseSolveWorkspace::new(n)).unwrap();

    for col in 0..4 {
        let mut dense: Vec<E> = (0..n).map(|row| b.get(row, col)).collect();
        solve_dense(&g, triangle, &mut dense).unwrap();
        for (row, value) in dense.iter().enumerate() {
            assert!((x.get(row, col) - value).abs() < 1e-10);
        }
    }
}

/// The reach covers every row where the solution is non-zero, and no row of an empty column.
#[rstest]
fn test_reach_covers_solution_support(#[values(11, 12, 13)] seed: u64) {
    let rng = &mut StdRng::seed_from_u64(seed);
    let n = 10;
    let g = random::triangle_lower(n, 25, -1.0, 1.0, rng);
    let b = random::rectangle(n, 2, 3, -1.0, 1.0, rng);
    let mut work = ReachWorkspace::new(n);
    let mut x = vec![0.0; n];

    for col in 0..2 {
        x.fill(0.0);
        let count = solve_sparse_vector(&g, Triangle::Lower, &b, col, &mut x, &mut work).unwrap();
        assert!(count >= b.row_idx_of_col(col).len());
        for (row, value) in x.iter().enumerate() {
            if *value != 0.0 {
                assert!(work.reach().contains(&row));
            }
        }
    }
}

/// A factor built as triplets, converted, and solved through the postordered tree of its
/// transpose pattern.
#[test]
fn test_triplet_factor_solve() {
    let mut triplets = TripletMatrix::new(4, 4);
    for i in 0..4 {
        triplets.add_item(i, i, 2.0);
    }
    triplets.add_item(2, 0, 1.0);
    triplets.add_item(3, 2, 1.0);
    // duplicates are summed on conversion
    triplets.add_item(3, 2, 1.0);

    let l = SparseFormat::from(triplets).into_csc();
    assert_eq!(l.get(3, 2), 2.0);
    assert!(l.is_triangular(Triangle::Lower));

    // the pattern of L' is the upper triangle of L + L'
    let parent = compute_elimination_tree(&l.transpose(), false);
    assert_eq!(parent, vec![Some(2), None, Some(3), None]);
    assert_eq!(postorder(&parent), vec![1, 0, 2, 3]);

    let mut x = vec![2.0, 2.0, 1.0, 0.0];
    solve_dense(&l, Triangle::Lower, &mut x).unwrap();
    assert_eq!(x, vec![1.0, 1.0, 0.0, 0.0]);
}
