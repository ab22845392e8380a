//! Normal distribution with full covariance.
//!
//! Purpose
//! -------
//! Gaussian family `N(μ, Σ)` in natural form
//!
//! ```text
//! η    = [Λμ, −½ vec(Λ)],            Λ = Σ⁻¹
//! T(x) = [x, vec(x xᵀ)]
//! h(x) = −½ D ln(2π)
//! A(η) = ½ (ln det Σ + μᵀ Λ μ)
//! ∇A   = [μ, vec(Σ + μ μᵀ)]          = (E[x], E[x xᵀ])
//! ```
//!
//! Invariants & assumptions
//! ------------------------
//! - `Σ` is symmetric positive-definite; every inverse and log-determinant
//!   goes through one Cholesky factorization, and a matrix that fails it is
//!   reported as `ExpFamError::NotPositiveDefinite`.
//! - The precision block of an incoming η is symmetrized before factorizing.
//! - Cached `(μ, Σ, ln det Σ, Λμ)` always describe the stored η.
use super::ExpFamily;
use crate::{
    errors::ExpFamResult,
    numerical_stability::linalg::{
        check_len, chol_inverse, chol_logdet, chol_solve, cholesky, concat, identity, outer,
        unvectorize, vectorize,
    },
    parameter::{DefaultParameter, Parameter},
    scalar::{Scalar, cast, recast, widen},
};
use nalgebra::DVector;
use ndarray::{Array1, Array2, ArrayView1, s};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use std::f64::consts::PI;

/// `N(μ, Σ)` with parameter storage `P`.
#[derive(Debug, Clone, PartialEq)]
pub struct Normal<T: Scalar = f64, P: Parameter<T> = DefaultParameter<T>> {
    param: P,
    mean: Array1<T>,
    cov: Array2<T>,
    logdet_cov: T,
    precision_mean: Array1<T>,
}

impl<T: Scalar> Normal<T> {
    /// Normal with mean `mean` and covariance `cov`.
    ///
    /// Errors
    /// ------
    /// - `ExpFamError::DimensionMismatch` unless `len(μ) == rows(Σ) == cols(Σ)`.
    /// - `ExpFamError::NotPositiveDefinite` when `Σ` fails Cholesky.
    pub fn new(mean: Array1<T>, cov: Array2<T>) -> ExpFamResult<Self> {
        Self::from_std_param(mean, cov)
    }

    /// Normal with the given mean and identity covariance.
    pub fn from_mean(mean: Array1<T>) -> ExpFamResult<Self> {
        let d = mean.len();
        Self::from_std_param(mean, identity(d))
    }

    /// Standard normal in `d` dimensions.
    pub fn with_dim(d: usize) -> ExpFamResult<Self> {
        Self::from_mean(Array1::zeros(d))
    }
}

impl<T: Scalar, P: Parameter<T>> Normal<T, P> {
    /// Build from standard parameters, storing η through `P`.
    pub fn from_std_param(mean: Array1<T>, cov: Array2<T>) -> ExpFamResult<Self> {
        let d = mean.len();
        check_len(d, cov.nrows())?;
        check_len(d, cov.ncols())?;
        let chol = cholesky(cov.view(), "normal covariance")?;
        let precision: Array2<T> = chol_inverse(&chol);
        let precision_mean = precision.dot(&mean);
        let eta =
            concat(precision_mean.view(), vectorize((&precision * cast::<T>(-0.5)).view()).view());
        let param = P::from_natural(eta)?;
        Ok(Normal { param, mean, cov, logdet_cov: cast(chol_logdet(&chol)), precision_mean })
    }

    /// Build from a natural parameter of length `d + d²`.
    pub fn from_natural(eta: Array1<T>, d: usize) -> ExpFamResult<Self> {
        let (mean, cov, logdet_cov) = std_param_from(eta.view(), d)?;
        let precision_mean = eta.slice(s![..d]).to_owned();
        let param = P::from_natural(eta)?;
        Ok(Normal { param, mean, cov, logdet_cov, precision_mean })
    }

    pub fn parameter(&self) -> &P {
        &self.param
    }

    /// Standard parameters `(μ, Σ)`.
    pub fn std_param(&self) -> (Array1<T>, Array2<T>) {
        (self.mean.clone(), self.cov.clone())
    }

    pub fn covariance(&self) -> &Array2<T> {
        &self.cov
    }

    /// Non-vectorized gradient `(μ, Σ + μμᵀ)`.
    pub fn grad_log_norm_parts(&self) -> (Array1<T>, Array2<T>) {
        let second = &self.cov + &outer(self.mean.view(), self.mean.view());
        (self.mean.clone(), second)
    }

    /// Split a vector laid out like η into its vector and matrix blocks.
    pub fn split_grad(&self, grad: ArrayView1<'_, T>) -> ExpFamResult<(Array1<T>, Array2<T>)> {
        let d = self.dim();
        check_len(d + d * d, grad.len())?;
        Ok((grad.slice(s![..d]).to_owned(), unvectorize(grad.slice(s![d..]), d)?))
    }

    /// Copy re-encoded with scalar `U`.
    pub fn reallocate<U: Scalar>(&self) -> Normal<U, P::Cast<U>> {
        Normal {
            param: self.param.reallocate(),
            mean: self.mean.mapv(recast),
            cov: self.cov.mapv(recast),
            logdet_cov: recast(self.logdet_cov),
            precision_mean: self.precision_mean.mapv(recast),
        }
    }
}

/// Recover `(μ, Σ, ln det Σ)` from `η = [Λμ, −½ vec(Λ)]`.
pub(crate) fn std_param_from<T: Scalar>(
    eta: ArrayView1<'_, T>, d: usize,
) -> ExpFamResult<(Array1<T>, Array2<T>, T)> {
    check_len(d + d * d, eta.len())?;
    let precision = unvectorize(eta.slice(s![d..]), d)? * cast::<T>(-2.0);
    let chol = cholesky(precision.view(), "normal precision")?;
    let mean = chol_solve(&chol, eta.slice(s![..d]));
    Ok((mean, chol_inverse(&chol), cast(-chol_logdet(&chol))))
}

impl<T: Scalar, P: Parameter<T>> ExpFamily<T> for Normal<T, P> {
    type Sample = Array1<T>;

    fn dim(&self) -> usize {
        self.mean.len()
    }

    fn natural_param(&self) -> Array1<T> {
        self.param.natural_form()
    }

    fn update(&mut self, eta: ArrayView1<'_, T>) -> ExpFamResult<()> {
        let d = self.dim();
        let (mean, cov, logdet_cov) = std_param_from(eta, d)?;
        self.param.set_natural(eta)?;
        self.precision_mean = eta.slice(s![..d]).to_owned();
        self.mean = mean;
        self.cov = cov;
        self.logdet_cov = logdet_cov;
        log::debug!("normal update: dim={d}, logdet(cov)={:.6}", widen(self.logdet_cov));
        Ok(())
    }

    fn base_measure(&self, x: &Array1<T>) -> ExpFamResult<T> {
        check_len(self.dim(), x.len())?;
        Ok(cast(-0.5 * self.dim() as f64 * (2.0 * PI).ln()))
    }

    fn stats(&self, x: &Array1<T>) -> ExpFamResult<Array1<T>> {
        check_len(self.dim(), x.len())?;
        Ok(concat(x.view(), vectorize(outer(x.view(), x.view()).view()).view()))
    }

    fn log_norm(&self) -> T {
        cast::<T>(0.5) * (self.logdet_cov + self.mean.dot(&self.precision_mean))
    }

    fn grad_log_norm(&self) -> Array1<T> {
        let (first, second) = self.grad_log_norm_parts();
        concat(first.view(), vectorize(second.view()).view())
    }

    fn mean(&self) -> Array1<T> {
        self.mean.clone()
    }

    fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> ExpFamResult<Vec<Array1<T>>> {
        let d = self.dim();
        let chol = cholesky(self.cov.view(), "normal covariance")?;
        let lower = chol.l();
        let mut draws = Vec::with_capacity(n);
        for _ in 0..n {
            let z = DVector::<f64>::from_fn(d, |_, _| StandardNormal.sample(rng));
            let y = &lower * z;
            draws.push(Array1::from_shape_fn(d, |i| self.mean[i] + cast::<T>(y[i])));
        }
        Ok(draws)
    }
}
