//! Dense eigendecomposition and SVD via `faer`.
//!
//! The coupled-mode Hamiltonian is a general (non-Hermitian) complex matrix,
//! so the full complex eigensolver is required. This module converts between
//! `ndarray` at the API boundary and `faer`'s native types internally.

use faer::complex_native::c64;
use ndarray::Array2;
use num_complex::Complex64;
use thiserror::Error;

/// Errors from the dense linear algebra layer.
#[derive(Debug, Error)]
pub enum EigenError {
    #[error("Matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("Eigendecomposition produced non-finite values for a {dim}x{dim} matrix")]
    NonConvergence { dim: usize },
}

/// Convert an ndarray complex matrix into a faer matrix.
fn to_faer(matrix: &Array2<Complex64>) -> faer::Mat<c64> {
    faer::Mat::<c64>::from_fn(matrix.nrows(), matrix.ncols(), |i, j| {
        let v = matrix[[i, j]];
        c64::new(v.re, v.im)
    })
}

/// Compute all eigenvalues of a general complex matrix.
///
/// The returned eigenvalues are unordered; callers must not rely on any
/// correspondence between positions across different matrices.
///
/// # Arguments
/// * `matrix` - A square N×N complex matrix.
pub fn eigenvalues(matrix: &Array2<Complex64>) -> Result<Vec<Complex64>, EigenError> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(EigenError::NotSquare { rows, cols });
    }

    let faer_mat = to_faer(matrix);
    let evals: Vec<c64> = faer_mat.eigenvalues();

    let result: Vec<Complex64> = evals
        .into_iter()
        .map(|v| Complex64::new(v.re, v.im))
        .collect();

    // faer's EVD has no fallible API at this level; non-convergence surfaces
    // as non-finite entries.
    if result.iter().any(|v| !v.re.is_finite() || !v.im.is_finite()) {
        return Err(EigenError::NonConvergence { dim: rows });
    }

    Ok(result)
}

/// Compute the singular values of a complex matrix, in descending order.
pub fn singular_values(matrix: &Array2<Complex64>) -> Vec<f64> {
    to_faer(matrix).singular_values()
}
