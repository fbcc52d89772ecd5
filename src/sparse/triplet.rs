//! Coordinate (triplet) storage, the convenient format for assembling a matrix before
//! converting it to [`CscMatrix`](crate::sparse::CscMatrix).

use crate::E;

/// One stored entry of a [`TripletMatrix`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TripletItem {
    pub row: usize,
    pub col: usize,
    pub value: E,
}

/// Unordered list of `(row, col, value)` entries. Duplicate coordinates are allowed and add up.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TripletMatrix {
    nrows: usize,
    ncols: usize,
    items: Vec<TripletItem>,
}

impl TripletMatrix {
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self::with_capacity(nrows, ncols, 0)
    }

    pub fn with_capacity(nrows: usize, ncols: usize, nnz: usize) -> Self {
        Self {
            nrows,
            ncols,
            items: Vec::with_capacity(nnz),
        }
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of stored items, duplicates counted separately.
    pub fn nnz(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[TripletItem] {
        &self.items
    }

    /// Appends an entry without looking for an existing one at the same coordinate.
    ///
    /// # Panics
    /// Panics if `(row, col)` lies outside the matrix.
    pub fn add_item(&mut self, row: usize, col: usize, value: E) {
        self.assert_in_bounds(row, col);
        self.items.push(TripletItem { row, col, value });
    }

    /// Sum of every item stored at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> E {
        self.assert_in_bounds(row, col);
        self.items
            .iter()
            .filter(|item| item.row == row && item.col == col)
            .map(|item| item.value)
            .sum()
    }

    /// Replaces whatever is stored at `(row, col)` with a single item holding `value`.
    pub fn set(&mut self, row: usize, col: usize, value: E) {
        self.remove(row, col);
        self.add_item(row, col, value);
    }

    /// Drops every item at `(row, col)`; a no-op when nothing is stored there.
    pub fn remove(&mut self, row: usize, col: usize) {
        self.assert_in_bounds(row, col);
        self.items
            .retain(|item| item.row != row || item.col != col);
    }

    pub fn zero(&mut self) {
        self.items.clear();
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_add_up() {
        let mut mat = TripletMatrix::new(2, 3);
        mat.add_item(1, 2, 1.5);
        mat.add_item(1, 2, 2.0);
        mat.add_item(0, 0, 4.0);

        assert_eq!(mat.nnz(), 3);
        assert_eq!(mat.get(1, 2), 3.5);
        assert_eq!(mat.get(0, 1), 0.0);
    }

    #[test]
    fn test_set_replaces_duplicates() {
        let mut mat = TripletMatrix::new(2, 2);
        mat.add_item(1, 1, 1.0);
        mat.add_item(1, 1, 1.0);
        mat.set(1, 1, 7.0);

        assert_eq!(mat.nnz(), 1);
        assert_eq!(mat.get(1, 1), 7.0);
    }

    #[test]
    fn test_remove() {
        let mut mat = TripletMatrix::new(2, 2);
        mat.add_item(0, 1, 1.0);
        mat.remove(0, 1);
        mat.remove(0, 1);
        assert_eq!(mat.nnz(), 0);
    }
}
