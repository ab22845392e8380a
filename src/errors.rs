//! Errors for exponential-family distributions (shape checks, distributional
//! constraints, matrix factorization failures, and dict decoding).
//!
//! This module defines the crate-wide error type, [`ExpFamError`], and the
//! result alias [`ExpFamResult`]. Every fallible public operation returns
//! `ExpFamResult<T>`; errors are raised at the call that detects them and are
//! never retried or swallowed internally.
//!
//! ## Conventions
//! - **Indices are 0-based.**
//! - Offending values are reported as `f64` regardless of the scalar type the
//!   distribution is encoded with.
//! - Errors coming from `rand_distr` constructors are normalized to
//!   [`ExpFamError::InvalidDistributionParam`] with a human-readable reason.
use rand_distr::{ChiSquaredError, GammaError};

/// Crate-wide result alias for operations that may produce [`ExpFamError`].
pub type ExpFamResult<T> = Result<T, ExpFamError>;

/// Unified error type for exponential-family operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpFamError {
    // ---- Shape ----
    /// Vector or matrix size does not match the fixed support / parameter size.
    DimensionMismatch { expected: usize, actual: usize },

    /// A matrix argument is not square.
    NotSquare { rows: usize, cols: usize },

    // ---- Distributional constraints ----
    /// A value violates a distributional constraint.
    InvalidArgument { name: &'static str, value: f64, reason: &'static str },

    /// Cholesky factorization failed: the matrix is not symmetric positive-definite.
    NotPositiveDefinite { context: &'static str },

    // ---- Dict (de)serialization ----
    /// A required field is absent from a parameter dict.
    MissingField { field: &'static str },

    /// A field is present but cannot be decoded.
    InvalidField { field: &'static str, reason: String },

    // ---- Sampling ----
    /// A sampler rejected the standard parameters it was given.
    InvalidDistributionParam { reason: String },

    // ---- Diagnostics ----
    /// Analytic and finite-difference gradients disagree.
    GradientCheckFailed { index: usize, analytic: f64, numeric: f64 },
}

impl std::error::Error for ExpFamError {}

impl std::fmt::Display for ExpFamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Shape ----
            ExpFamError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {expected}, got {actual}")
            }
            ExpFamError::NotSquare { rows, cols } => {
                write!(f, "Matrix must be square; got {rows}x{cols}")
            }
            // ---- Distributional constraints ----
            ExpFamError::InvalidArgument { name, value, reason } => {
                write!(f, "Invalid argument `{name}` ({value}): {reason}")
            }
            ExpFamError::NotPositiveDefinite { context } => {
                write!(f, "Matrix is not positive-definite ({context})")
            }
            // ---- Dict (de)serialization ----
            ExpFamError::MissingField { field } => {
                write!(f, "Missing field `{field}` in parameter dict")
            }
            ExpFamError::InvalidField { field, reason } => {
                write!(f, "Field `{field}` could not be decoded: {reason}")
            }
            // ---- Sampling ----
            ExpFamError::InvalidDistributionParam { reason } => {
                write!(f, "Sampler rejected parameters: {reason}")
            }
            // ---- Diagnostics ----
            ExpFamError::GradientCheckFailed { index, analytic, numeric } => {
                write!(
                    f,
                    "Gradient check failed at index {index}: analytic {analytic}, finite-difference {numeric}"
                )
            }
        }
    }
}

impl From<GammaError> for ExpFamError {
    fn from(err: GammaError) -> ExpFamError {
        ExpFamError::InvalidDistributionParam { reason: format!("gamma: {err}") }
    }
}

impl From<ChiSquaredError> for ExpFamError {
    fn from(err: ChiSquaredError) -> ExpFamError {
        ExpFamError::InvalidDistributionParam { reason: format!("chi-squared: {err}") }
    }
}
