//! numerical_stability — stable transforms, shared tolerances, and SPD linear algebra.
//!
//! Purpose
//! -------
//! Collect the low-level numerical routines every distribution relies on:
//! guarded softplus transforms for reparameterized storage, the crate-wide
//! tolerances, and Cholesky-based inverse / log-determinant helpers that keep
//! the Normal and Wishart families away from generic `inv`/`det`.
//!
//! Key behaviors
//! -------------
//! - Stable scalar transforms ([`safe_softplus`], [`safe_softplus_inv`],
//!   [`softplus_inv_deriv`]) generic over the crate's [`Scalar`] types.
//! - Centralized tolerances ([`SIMPLEX_TOL_FACTOR`], [`SYMMETRY_TOL`],
//!   [`FD_REL_TOL`]).
//! - SPD helpers in [`linalg`] that factorize once and reuse the factor for
//!   inverses, log-determinants, solves, and sampling.
//!
//! Invariants & assumptions
//! ------------------------
//! - Matrices handed to the SPD helpers are square; non-square inputs are
//!   reported as `ExpFamError::NotSquare`.
//! - Factorizations always run in `f64`, whatever the distribution's scalar.
//!
//! Conventions
//! -----------
//! - Matrix blocks inside natural-parameter vectors use column-major `vec`.
//! - This module never allocates randomness or touches global state; the only
//!   side effect is `log` output when a factorization fails.
//!
//! [`Scalar`]: crate::scalar::Scalar

pub mod linalg;
pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    FD_REL_TOL, SIMPLEX_TOL_FACTOR, SYMMETRY_TOL, safe_softplus, safe_softplus_inv,
    softplus_inv_deriv,
};
