//! Elimination of constrained degrees of freedom and reinsertion of their values.
//!
//! All index lists must be strictly increasing. After eliminating, the remaining rows and
//! columns are renumbered contiguously in their original relative order.
use crate::linalg::{insert_entry, remove_columns, remove_entries, remove_rows, remove_rows_and_columns};
use crate::{Error, Result};
use nalgebra::{DMatrix, DVector};

pub fn eliminate_vector(v: DVector<f64>, indices: &[usize]) -> Result<DVector<f64>> {
    remove_entries(v, indices)
}

/// Removes the given rows and the same columns from a square matrix.
pub fn eliminate_square(m: DMatrix<f64>, indices: &[usize]) -> Result<DMatrix<f64>> {
    remove_rows_and_columns(m, indices)
}

/// Removes independent sets of rows and columns, as needed for matrices coupling two spaces.
pub fn eliminate_rectangular(m: DMatrix<f64>, row_indices: &[usize], column_indices: &[usize]) -> Result<DMatrix<f64>> {
    let m = remove_rows(m, row_indices)?;
    remove_columns(m, column_indices)
}

/// Restores eliminated entries, inserting `value_at(index)` at every index.
///
/// Insertion happens in increasing index order, so that every index refers to a position in the
/// full vector.
pub fn reinsert(v: DVector<f64>, indices: &[usize], value_at: impl Fn(usize) -> f64) -> Result<DVector<f64>> {
    if let Some(pair) = indices.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(Error::IndexOutOfRange {
            index: pair[1],
            len: v.len() + indices.len(),
        });
    }
    let mut v = v;
    for &index in indices {
        v = insert_entry(v, value_at(index), index)?;
    }
    Ok(v)
}
