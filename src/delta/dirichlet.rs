//! Point mass on the probability simplex.
use super::DeltaDistribution;
use crate::{
    errors::{ExpFamError, ExpFamResult},
    numerical_stability::{SIMPLEX_TOL_FACTOR, linalg::check_len},
    scalar::{Scalar, cast, widen},
};
use ndarray::{Array1, ArrayView1};

/// δ-Dirichlet: all mass at `μ`, with `μᵢ ≥ 0` and `Σ μᵢ = 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaDirichlet<T: Scalar = f64> {
    mu: Array1<T>,
}

impl<T: Scalar> DeltaDirichlet<T> {
    /// Point mass at `mu`.
    ///
    /// Errors
    /// ------
    /// - `ExpFamError::InvalidArgument` when an entry is negative or not
    ///   finite, or when `|Σ μ − 1|` exceeds `SIMPLEX_TOL_FACTOR · D · ε(T)`.
    pub fn new(mu: Array1<T>) -> ExpFamResult<Self> {
        validate_simplex(mu.view())?;
        Ok(DeltaDirichlet { mu })
    }

    /// Point mass at the barycenter of the `d`-simplex.
    pub fn with_dim(d: usize) -> Self {
        DeltaDirichlet { mu: Array1::from_elem(d, cast(1.0 / d as f64)) }
    }
}

fn validate_simplex<T: Scalar>(mu: ArrayView1<'_, T>) -> ExpFamResult<()> {
    for &value in mu.iter() {
        if !value.is_finite() || value < T::zero() {
            return Err(ExpFamError::InvalidArgument {
                name: "mu",
                value: widen(value),
                reason: "simplex entries must be finite and >= 0",
            });
        }
    }
    let total = widen(mu.sum());
    let tol = SIMPLEX_TOL_FACTOR * mu.len() as f64 * widen(T::epsilon());
    if (total - 1.0).abs() > tol {
        return Err(ExpFamError::InvalidArgument {
            name: "mu",
            value: total,
            reason: "simplex entries must sum to 1",
        });
    }
    Ok(())
}

impl<T: Scalar> DeltaDistribution<T> for DeltaDirichlet<T> {
    type Sample = Array1<T>;

    fn dim(&self) -> usize {
        self.mu.len()
    }

    fn location(&self) -> &Array1<T> {
        &self.mu
    }

    /// Move to the mode `(η − 1) / Σ(η − 1)` of `Dirichlet(η)`.
    fn update(&mut self, eta: ArrayView1<'_, T>) -> ExpFamResult<()> {
        check_len(self.dim(), eta.len())?;
        if let Some(&bad) = eta.iter().find(|&&e| !e.is_finite() || e < T::one()) {
            log::warn!("delta dirichlet: rejected natural parameter entry {}", widen(bad));
            return Err(ExpFamError::InvalidArgument {
                name: "eta",
                value: widen(bad),
                reason: "every entry must be >= 1 for the Dirichlet mode to exist",
            });
        }
        let shifted = eta.mapv(|e| e - T::one());
        let total = shifted.sum();
        if total <= T::zero() {
            log::warn!("delta dirichlet: all-ones natural parameter has no unique mode");
            return Err(ExpFamError::InvalidArgument {
                name: "eta",
                value: 1.0,
                reason: "an all-ones natural parameter has no unique mode",
            });
        }
        self.mu = shifted / total;
        Ok(())
    }

    fn stats(&self, x: &Array1<T>) -> ExpFamResult<Array1<T>> {
        check_len(self.dim(), x.len())?;
        Ok(x.mapv(|v| v.ln()))
    }

    fn grad_log_norm(&self) -> Array1<T> {
        self.mu.mapv(|v| v.ln())
    }
}
