//! diagnostics — numerical cross-checks of the analytic derivatives.
//!
//! Purpose
//! -------
//! Verify the two derivative identities the rest of the crate relies on:
//! `grad_log_norm` must be the gradient of `log_norm` with respect to η, and
//! a parameter's `jacobian` must be `∂ξ/∂η`. Both are compared against
//! central finite differences computed with the `finitediff` crate.
//!
//! Conventions
//! -----------
//! - Checks run in `f64`; reallocate `f32` distributions before checking.
//! - Deviations are relative with a unit floor: `|a − n| / max(1, |a|)`.
//!
//! Downstream usage
//! ----------------
//! - Unit tests of every distribution call [`check_grad_log_norm`].
//! - Callers implementing their own [`Parameter`](crate::parameter::Parameter)
//!   can validate it with [`check_jacobian`].

pub mod finite_diff;

pub use self::finite_diff::{check_grad_log_norm, check_jacobian, fd_grad_log_norm, fd_jacobian};
