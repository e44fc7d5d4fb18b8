//! Dense linear algebra helpers on top of `nalgebra`.
//!
//! Matrices and vectors are plain [`DMatrix<f64>`] and [`DVector<f64>`]. The functions here add
//! the index bookkeeping needed for eliminating constrained degrees of freedom and a direct
//! solver that works in place.
use crate::{Error, Result};
use nalgebra::{DMatrix, DVector};

/// Relative magnitude below which a pivot is considered zero.
///
/// The threshold for the pivot in row `k` is relative to the largest absolute entry of row `k` in
/// the matrix before factoring, so rows of very different magnitude are judged independently.
pub const PIVOT_TOLERANCE: f64 = 1e-10;

/// Elementwise sum of two matrices of equal shape.
pub fn try_add(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    if a.shape() != b.shape() {
        return Err(Error::DimensionMismatch {
            expected: a.shape(),
            actual: b.shape(),
        });
    }
    Ok(a + b)
}

pub fn scale(m: &DMatrix<f64>, s: f64) -> DMatrix<f64> {
    m * s
}

/// Checks that `indices` is strictly increasing and that every index is less than `len`.
fn check_sorted_indices(indices: &[usize], len: usize) -> Result<()> {
    if let Some(&last) = indices.last() {
        if last >= len {
            return Err(Error::IndexOutOfRange { index: last, len });
        }
    }
    for pair in indices.windows(2) {
        if pair[0] >= pair[1] {
            // An unsorted list is reported at the first offending position
            return Err(Error::IndexOutOfRange {
                index: pair[1],
                len,
            });
        }
    }
    Ok(())
}

/// Removes the rows with the given (strictly increasing) indices.
pub fn remove_rows(m: DMatrix<f64>, sorted_indices: &[usize]) -> Result<DMatrix<f64>> {
    check_sorted_indices(sorted_indices, m.nrows())?;
    Ok(m.remove_rows_at(sorted_indices))
}

/// Removes the columns with the given (strictly increasing) indices.
pub fn remove_columns(m: DMatrix<f64>, sorted_indices: &[usize]) -> Result<DMatrix<f64>> {
    check_sorted_indices(sorted_indices, m.ncols())?;
    Ok(m.remove_columns_at(sorted_indices))
}

/// Removes the same set of rows and columns from a square matrix.
pub fn remove_rows_and_columns(m: DMatrix<f64>, sorted_indices: &[usize]) -> Result<DMatrix<f64>> {
    if !m.is_square() {
        return Err(Error::DimensionMismatch {
            expected: (m.nrows(), m.nrows()),
            actual: m.shape(),
        });
    }
    let m = remove_rows(m, sorted_indices)?;
    remove_columns(m, sorted_indices)
}

/// Removes the entries with the given (strictly increasing) indices.
pub fn remove_entries(v: DVector<f64>, sorted_indices: &[usize]) -> Result<DVector<f64>> {
    check_sorted_indices(sorted_indices, v.len())?;
    Ok(v.remove_rows_at(sorted_indices))
}

pub fn remove_entry(v: DVector<f64>, index: usize) -> Result<DVector<f64>> {
    if index >= v.len() {
        return Err(Error::IndexOutOfRange { index, len: v.len() });
    }
    Ok(v.remove_row(index))
}

/// Inserts `value` so that it ends up at position `index`.
///
/// `index == v.len()` appends.
pub fn insert_entry(v: DVector<f64>, value: f64, index: usize) -> Result<DVector<f64>> {
    if index > v.len() {
        return Err(Error::IndexOutOfRange { index, len: v.len() });
    }
    Ok(v.insert_row(index, value))
}

/// Determinant by recursive cofactor expansion along the first row.
///
/// This has factorial complexity and is only meant for small matrices and for testing.
pub fn cofactor_determinant(m: &DMatrix<f64>) -> Result<f64> {
    if !m.is_square() {
        return Err(Error::DimensionMismatch {
            expected: (m.nrows(), m.nrows()),
            actual: m.shape(),
        });
    }
    Ok(cofactor_expansion(m))
}

fn cofactor_expansion(m: &DMatrix<f64>) -> f64 {
    match m.nrows() {
        0 => 1.0,
        1 => m[(0, 0)],
        2 => m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)],
        n => {
            let mut det = 0.0;
            let without_first_row = m.clone().remove_row(0);
            for j in 0..n {
                if m[(0, j)] == 0.0 {
                    continue;
                }
                let minor = without_first_row.clone().remove_column(j);
                let sign = if j % 2 == 0 { 1.0 } else { -1.0 };
                det += sign * m[(0, j)] * cofactor_expansion(&minor);
            }
            det
        }
    }
}

/// Solves `A x = b` by Doolittle LU factorization without pivoting.
///
/// The factorization is performed in place, so `a` holds the unit lower triangular factor
/// (below the diagonal) and the upper triangular factor (on and above the diagonal) on return,
/// also when an error is returned part-way.
pub fn lu_solve(a: &mut DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>> {
    let n = a.nrows();
    if !a.is_square() {
        return Err(Error::DimensionMismatch {
            expected: (n, n),
            actual: a.shape(),
        });
    }
    if b.len() != n {
        return Err(Error::DimensionMismatch {
            expected: (n, 1),
            actual: (b.len(), 1),
        });
    }
    if n == 0 {
        return Ok(DVector::zeros(0));
    }

    let row_scales: Vec<f64> = a.row_iter().map(|row| row.amax()).collect();

    for k in 0..n {
        let pivot = a[(k, k)];
        if !pivot.is_finite() || pivot.abs() <= PIVOT_TOLERANCE * row_scales[k] {
            return Err(Error::SingularSystem(format!(
                "pivot {pivot:e} in row {k} of a {n}x{n} system"
            )));
        }
        for i in k + 1..n {
            let l = a[(i, k)] / pivot;
            a[(i, k)] = l;
            if l != 0.0 {
                for j in k + 1..n {
                    a[(i, j)] -= l * a[(k, j)];
                }
            }
        }
    }

    // Forward substitution with the unit lower triangular factor
    let mut x = b.clone();
    for i in 1..n {
        let mut s = 0.0;
        for j in 0..i {
            s += a[(i, j)] * x[j];
        }
        x[i] -= s;
    }

    // Back substitution with the upper triangular factor
    for i in (0..n).rev() {
        let mut s = 0.0;
        for j in i + 1..n {
            s += a[(i, j)] * x[j];
        }
        x[i] = (x[i] - s) / a[(i, i)];
    }

    Ok(x)
}
