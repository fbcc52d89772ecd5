//! Sparse triangular solves on compressed sparse column matrices.
//!
//! - [`sparse`]: the CSC and triplet storage formats, conversions, random generators.
//! - [`linalg`]: reachability, elimination trees, and the triangular solvers.

pub type E = f64;
pub type I = usize;

pub mod linalg;
pub mod sparse;

#[cfg(test)]
mod tests;
