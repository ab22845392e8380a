//! Symmetric positive-definite linear algebra on `ndarray` storage.
//!
//! Purpose
//! -------
//! Provide the Cholesky-based inverse, log-determinant, and linear solves
//! needed by the Normal and Wishart families, plus the `vec`/`reshape`
//! conventions used to lay matrix parameters out inside natural-parameter
//! vectors.
//!
//! Key behaviors
//! -------------
//! - Copy `ndarray` matrices into `nalgebra::DMatrix<f64>` and factorize with
//!   [`nalgebra::Cholesky`]; all decompositions run in `f64` and results are
//!   cast back to the caller's scalar type.
//! - Symmetrize inputs before factorization so that round-off asymmetry in a
//!   natural-parameter block never makes a PD matrix look indefinite.
//! - Report factorization failure as [`ExpFamError::NotPositiveDefinite`]
//!   rather than returning NaNs.
//!
//! Conventions
//! -----------
//! - `vectorize` is column-major (`vec(A)` stacks columns). For the symmetric
//!   matrices this crate manipulates the order is immaterial, but it is fixed
//!   so that `unvectorize(vectorize(A)) == A` for any square `A`.
//! - No explicit generic `inv`/`det` is ever formed; every inverse goes
//!   through a Cholesky factor.
use crate::{
    errors::{ExpFamError, ExpFamResult},
    numerical_stability::transformations::SYMMETRY_TOL,
    scalar::{Scalar, cast, widen},
};
use nalgebra::{Cholesky, DMatrix, DVector, Dyn};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ShapeBuilder};

/// Return the side length of a square matrix or [`ExpFamError::NotSquare`].
pub fn check_square<T>(a: ArrayView2<'_, T>) -> ExpFamResult<usize> {
    let (rows, cols) = a.dim();
    if rows != cols {
        return Err(ExpFamError::NotSquare { rows, cols });
    }
    Ok(rows)
}

/// Fail with [`ExpFamError::DimensionMismatch`] unless `actual == expected`.
#[inline]
pub fn check_len(expected: usize, actual: usize) -> ExpFamResult<()> {
    if expected != actual {
        return Err(ExpFamError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

/// Overwrite `a` with `(A + Aᵀ) / 2` in place.
pub fn symmetrize<T: Scalar>(a: &mut Array2<T>) {
    let n = a.nrows();
    let half: T = cast(0.5);
    for i in 0..n {
        for j in (i + 1)..n {
            let m = (a[[i, j]] + a[[j, i]]) * half;
            a[[i, j]] = m;
            a[[j, i]] = m;
        }
    }
}

/// Relative asymmetry `max|A − Aᵀ| / max|A|` (0 for the zero matrix).
pub fn asymmetry<T: Scalar>(a: ArrayView2<'_, T>) -> f64 {
    let n = a.nrows();
    let mut scale = 0.0_f64;
    let mut diff = 0.0_f64;
    for i in 0..n {
        for j in 0..n {
            scale = scale.max(widen(a[[i, j]]).abs());
            diff = diff.max(widen(a[[i, j]] - a[[j, i]]).abs());
        }
    }
    if scale == 0.0 { 0.0 } else { diff / scale }
}

/// Column-major `vec(A)`.
pub fn vectorize<T: Scalar>(a: ArrayView2<'_, T>) -> Array1<T> {
    a.t().iter().copied().collect()
}

/// Inverse of [`vectorize`]: rebuild a `d×d` matrix from `d²` column-major entries.
pub fn unvectorize<T: Scalar>(v: ArrayView1<'_, T>, d: usize) -> ExpFamResult<Array2<T>> {
    check_len(d * d, v.len())?;
    Array2::from_shape_vec((d, d).f(), v.to_vec())
        .map_err(|_| ExpFamError::DimensionMismatch { expected: d * d, actual: v.len() })
}

/// Concatenate two vectors (`vcat`).
pub fn concat<T: Scalar>(a: ArrayView1<'_, T>, b: ArrayView1<'_, T>) -> Array1<T> {
    a.iter().chain(b.iter()).copied().collect()
}

/// Append one scalar to a vector.
pub fn push_scalar<T: Scalar>(a: ArrayView1<'_, T>, x: T) -> Array1<T> {
    a.iter().copied().chain(std::iter::once(x)).collect()
}

/// Outer product `x yᵀ`.
pub fn outer<T: Scalar>(x: ArrayView1<'_, T>, y: ArrayView1<'_, T>) -> Array2<T> {
    Array2::from_shape_fn((x.len(), y.len()), |(i, j)| x[i] * y[j])
}

/// Identity matrix of side `d`.
pub fn identity<T: Scalar>(d: usize) -> Array2<T> {
    Array2::eye(d)
}

/// Cholesky factor of the symmetrized `a`, computed in `f64`.
///
/// Parameters
/// ----------
/// - `a`: square matrix expected to be symmetric positive-definite.
/// - `context`: short label carried by the error (e.g. `"wishart scale"`).
///
/// Errors
/// ------
/// - `ExpFamError::NotSquare` when `a` is not square.
/// - `ExpFamError::NotPositiveDefinite` when the factorization fails.
pub fn cholesky<T: Scalar>(
    a: ArrayView2<'_, T>, context: &'static str,
) -> ExpFamResult<Cholesky<f64, Dyn>> {
    let n = check_square(a)?;
    let asym = asymmetry(a);
    if asym > SYMMETRY_TOL {
        log::debug!("{context}: symmetrizing matrix with relative asymmetry {asym:.3e}");
    }
    let m = DMatrix::<f64>::from_fn(n, n, |i, j| 0.5 * (widen(a[[i, j]]) + widen(a[[j, i]])));
    Cholesky::new(m).ok_or_else(|| {
        log::warn!("{context}: Cholesky factorization failed");
        ExpFamError::NotPositiveDefinite { context }
    })
}

/// `log det A` from a Cholesky factor: `2 Σ ln Lᵢᵢ`.
pub fn chol_logdet(chol: &Cholesky<f64, Dyn>) -> f64 {
    2.0 * chol.l_dirty().diagonal().iter().map(|d| d.ln()).sum::<f64>()
}

/// Inverse of a factorized matrix, symmetrized and cast to `T`.
pub fn chol_inverse<T: Scalar>(chol: &Cholesky<f64, Dyn>) -> Array2<T> {
    let inv = chol.inverse();
    let n = inv.nrows();
    Array2::from_shape_fn((n, n), |(i, j)| cast(0.5 * (inv[(i, j)] + inv[(j, i)])))
}

/// Lower-triangular Cholesky factor `L` (`A = L Lᵀ`) cast to `T`.
pub fn chol_lower<T: Scalar>(chol: &Cholesky<f64, Dyn>) -> Array2<T> {
    let l = chol.l();
    Array2::from_shape_fn((l.nrows(), l.ncols()), |(i, j)| cast(l[(i, j)]))
}

/// Solve `A x = b` with a factorized `A`.
pub fn chol_solve<T: Scalar>(chol: &Cholesky<f64, Dyn>, b: ArrayView1<'_, T>) -> Array1<T> {
    let rhs = DVector::<f64>::from_iterator(b.len(), b.iter().map(|&v| widen(v)));
    chol.solve(&rhs).iter().map(|&v| cast(v)).collect()
}

/// Inverse of an SPD matrix.
pub fn inv_pd<T: Scalar>(a: ArrayView2<'_, T>, context: &'static str) -> ExpFamResult<Array2<T>> {
    Ok(chol_inverse(&cholesky(a, context)?))
}

/// Log-determinant of an SPD matrix.
pub fn logdet_pd<T: Scalar>(a: ArrayView2<'_, T>, context: &'static str) -> ExpFamResult<T> {
    Ok(cast(chol_logdet(&cholesky(a, context)?)))
}

/// Inverse and log-determinant of an SPD matrix from a single factorization.
pub fn inv_logdet_pd<T: Scalar>(
    a: ArrayView2<'_, T>, context: &'static str,
) -> ExpFamResult<(Array2<T>, T)> {
    let chol = cholesky(a, context)?;
    Ok((chol_inverse(&chol), cast(chol_logdet(&chol))))
}
