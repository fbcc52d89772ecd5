//! Seeded random sparse matrices for tests and benchmarks, drawn with any `faer::rand`
//! generator (e.g. `StdRng`).

use faer::rand::Rng;
use faer::rand::seq::index;

use crate::E;
use crate::linalg::options::Triangle;
use crate::sparse::{CscMatrix, TripletMatrix};

/// A `nrows x ncols` matrix with `nz_total` entries (capped at the matrix size) at random
/// distinct positions, values uniform in `[min, max)`.
pub fn rectangle<R: Rng>(
    nrows: usize,
    ncols: usize,
    nz_total: usize,
    min: E,
    max: E,
    rng: &mut R,
) -> CscMatrix {
    let nz_total = nz_total.min(nrows * ncols);
    let cells = index::sample(rng, nrows * ncols, nz_total);

    let mut triplets = TripletMatrix::with_capacity(nrows, ncols, nz_total);
    for cell in cells {
        triplets.add_item(cell % nrows, cell / nrows, rng.random_range(min..max));
    }
    CscMatrix::from_triplets(&triplets)
}

/// A square triangular matrix with a full diagonal and up to `nz_total` entries in total.
///
/// Off-diagonal values are uniform in `[min, max)`. Diagonal values have a random sign and a
/// magnitude in `[1, 2)` so the factor stays well conditioned.
pub fn triangle<R: Rng>(
    n: usize,
    triangle: Triangle,
    nz_total: usize,
    min: E,
    max: E,
    rng: &mut R,
) -> CscMatrix {
    // strictly-triangular positions as (row, col) packed into row * n + col
    let cells: Vec<usize> = (0..n)
        .flat_map(|col| {
            let rows = match triangle {
                Triangle::Lower => col + 1..n,
                Triangle::Upper => 0..col,
            };
            rows.map(move |row| row * n + col)
        })
        .collect();
    let off_total = nz_total.saturating_sub(n).min(cells.len());
    let picked = index::sample(rng, cells.len(), off_total);

    let mut triplets = TripletMatrix::with_capacity(n, n, n + off_total);
    for i in 0..n {
        let magnitude: E = rng.random_range(1.0..2.0);
        let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        triplets.add_item(i, i, sign * magnitude);
    }
    for pos in picked {
        let cell = cells[pos];
        triplets.add_item(cell / n, cell % n, rng.random_range(min..max));
    }
    CscMatrix::from_triplets(&triplets)
}

pub fn triangle_lower<R: Rng>(
    n: usize,
    nz_total: usize,
    min: E,
    max: E,
    rng: &mut R,
) -> CscMatrix {
    triangle(n, Triangle::Lower, nz_total, min, max, rng)
}

pub fn triangle_upper<R: Rng>(
    n: usize,
    nz_total: usize,
    min: E,
    max: E,
    rng: &mut R,
) -> CscMatrix {
    triangle(n, Triangle::Upper, nz_total, min, max, rng)
}
