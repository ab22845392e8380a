//! Numerical stability utilities.
//!
//! Provides safe implementations of the nonlinear transforms used by
//! reparameterized parameter storage, together with the shared tolerances
//! used across the crate. The softplus pair uses an explicit cutoff
//! (`x > 20`) beyond which `ln(1 + eˣ) ≈ x` to within `f64` precision.
//!
//! # Provided items
//! - [`SIMPLEX_TOL_FACTOR`]: multiplier on machine ε (times `D`) for the
//!   sum-to-one check of simplex points.
//! - [`SYMMETRY_TOL`]: relative asymmetry above which a matrix block handed to
//!   an update is reported before being symmetrized.
//! - [`FD_REL_TOL`]: default relative tolerance for finite-difference checks
//!   of the log-normalizer gradient.
//! - [`safe_softplus`] / [`safe_softplus_inv`] / [`softplus_inv_deriv`].
use crate::scalar::{Scalar, cast};

/// Multiplier on `ε(T)·D` used when checking that a point lies on the simplex.
pub const SIMPLEX_TOL_FACTOR: f64 = 4.0;

/// Relative asymmetry `max|A − Aᵀ| / max|A|` tolerated silently in matrix blocks.
pub const SYMMETRY_TOL: f64 = 1e-8;

/// Default relative tolerance for gradient checks against finite differences.
pub const FD_REL_TOL: f64 = 1e-4;

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// For sufficiently large `x`, `softplus(x) ≈ x`; otherwise it falls back to
/// `ln1p(exp(x))`, which keeps precision for large negative inputs.
///
/// # Parameters
/// - `x`: real input
///
/// # Returns
/// - `softplus(x)`, strictly positive for finite `x`.
pub fn safe_softplus<T: Scalar>(x: T) -> T {
    if x > cast(20.0) { x } else { x.exp().ln_1p() }
}

/// Stable inverse of softplus on `(0, ∞)`: solves `softplus(t) = x` for
/// `t = ln(exp(x) − 1)`, using `ln(expm1(x))` below the cutoff.
///
/// `x` must be finite and `> 0`; non-positive inputs yield NaN or `-∞`.
pub fn safe_softplus_inv<T: Scalar>(x: T) -> T {
    if x > cast(20.0) { x } else { x.exp_m1().ln() }
}

/// Derivative of [`safe_softplus_inv`]: `d/dx ln(eˣ − 1) = 1 / (1 − e⁻ˣ)`.
pub fn softplus_inv_deriv<T: Scalar>(x: T) -> T {
    T::one() / -(-x).exp_m1()
}
