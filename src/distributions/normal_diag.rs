//! Normal distribution with diagonal covariance.
//!
//! Same family as [`Normal`](super::Normal) with every `D×D` operation
//! reduced to elementwise arithmetic on the variance vector `v`:
//!
//! ```text
//! η    = [μ / v, −½ / v]
//! T(x) = [x, x²]
//! A(η) = ½ Σ ln vᵢ + ½ Σ μᵢ² / vᵢ
//! ∇A   = [μ, v + μ²]
//! ```
use super::ExpFamily;
use crate::{
    errors::{ExpFamError, ExpFamResult},
    numerical_stability::linalg::{check_len, concat},
    parameter::{DefaultParameter, Parameter},
    scalar::{Scalar, cast, recast, widen},
};
use ndarray::{Array1, Array2, ArrayView1, Zip, s};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use std::f64::consts::PI;

/// `N(μ, diag(v))` with parameter storage `P`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalDiag<T: Scalar = f64, P: Parameter<T> = DefaultParameter<T>> {
    param: P,
    mean: Array1<T>,
    var: Array1<T>,
}

impl<T: Scalar> NormalDiag<T> {
    /// Diagonal normal with mean `mean` and variances `var` (finite, `> 0`).
    pub fn new(mean: Array1<T>, var: Array1<T>) -> ExpFamResult<Self> {
        Self::from_std_param(mean, var)
    }

    /// Diagonal normal with the given mean and unit variances.
    pub fn from_mean(mean: Array1<T>) -> ExpFamResult<Self> {
        let var = Array1::ones(mean.len());
        Self::from_std_param(mean, var)
    }

    /// Standard normal in `d` dimensions.
    pub fn with_dim(d: usize) -> ExpFamResult<Self> {
        Self::from_mean(Array1::zeros(d))
    }
}

impl<T: Scalar, P: Parameter<T>> NormalDiag<T, P> {
    pub fn from_std_param(mean: Array1<T>, var: Array1<T>) -> ExpFamResult<Self> {
        check_len(mean.len(), var.len())?;
        validate_variance(var.view())?;
        let eta = natural_from(mean.view(), var.view());
        Ok(NormalDiag { param: P::from_natural(eta)?, mean, var })
    }

    /// Build from a natural parameter of length `2d`.
    pub fn from_natural(eta: Array1<T>, d: usize) -> ExpFamResult<Self> {
        let (mean, var) = std_param_from(eta.view(), d)?;
        Ok(NormalDiag { param: P::from_natural(eta)?, mean, var })
    }

    pub fn parameter(&self) -> &P {
        &self.param
    }

    /// Standard parameters `(μ, v)`.
    pub fn std_param(&self) -> (Array1<T>, Array1<T>) {
        (self.mean.clone(), self.var.clone())
    }

    pub fn variance(&self) -> &Array1<T> {
        &self.var
    }

    /// Full `D×D` covariance `diag(v)`, built on demand.
    pub fn covariance(&self) -> Array2<T> {
        Array2::from_diag(&self.var)
    }

    /// Non-vectorized gradient `(μ, v + μ²)`.
    pub fn grad_log_norm_parts(&self) -> (Array1<T>, Array1<T>) {
        (self.mean.clone(), &self.var + &self.mean.mapv(|m| m * m))
    }

    /// Split a vector laid out like η into its two length-`D` blocks.
    pub fn split_grad(&self, grad: ArrayView1<'_, T>) -> ExpFamResult<(Array1<T>, Array1<T>)> {
        let d = self.dim();
        check_len(2 * d, grad.len())?;
        Ok((grad.slice(s![..d]).to_owned(), grad.slice(s![d..]).to_owned()))
    }

    pub fn reallocate<U: Scalar>(&self) -> NormalDiag<U, P::Cast<U>> {
        NormalDiag {
            param: self.param.reallocate(),
            mean: self.mean.mapv(recast),
            var: self.var.mapv(recast),
        }
    }
}

fn validate_variance<T: Scalar>(var: ArrayView1<'_, T>) -> ExpFamResult<()> {
    for &value in var.iter() {
        if !value.is_finite() || value <= T::zero() {
            return Err(ExpFamError::InvalidArgument {
                name: "var",
                value: widen(value),
                reason: "variances must be finite and > 0",
            });
        }
    }
    Ok(())
}

fn natural_from<T: Scalar>(mean: ArrayView1<'_, T>, var: ArrayView1<'_, T>) -> Array1<T> {
    let half: T = cast(0.5);
    concat((&mean / &var).view(), var.mapv(|v| -half / v).view())
}

/// Recover `(μ, v)` from `η = [μ/v, −½/v]`; the second block must be negative.
pub(crate) fn std_param_from<T: Scalar>(
    eta: ArrayView1<'_, T>, d: usize,
) -> ExpFamResult<(Array1<T>, Array1<T>)> {
    check_len(2 * d, eta.len())?;
    let two: T = cast(2.0);
    let var = eta.slice(s![d..]).mapv(|b| T::one() / (-two * b));
    validate_variance(var.view())?;
    let mean = &var * &eta.slice(s![..d]);
    Ok((mean, var))
}

impl<T: Scalar, P: Parameter<T>> ExpFamily<T> for NormalDiag<T, P> {
    type Sample = Array1<T>;

    fn dim(&self) -> usize {
        self.mean.len()
    }

    fn natural_param(&self) -> Array1<T> {
        self.param.natural_form()
    }

    fn update(&mut self, eta: ArrayView1<'_, T>) -> ExpFamResult<()> {
        let (mean, var) = std_param_from(eta, self.dim())?;
        self.param.set_natural(eta)?;
        self.mean = mean;
        self.var = var;
        Ok(())
    }

    fn base_measure(&self, x: &Array1<T>) -> ExpFamResult<T> {
        check_len(self.dim(), x.len())?;
        Ok(cast(-0.5 * self.dim() as f64 * (2.0 * PI).ln()))
    }

    fn stats(&self, x: &Array1<T>) -> ExpFamResult<Array1<T>> {
        check_len(self.dim(), x.len())?;
        Ok(concat(x.view(), x.mapv(|v| v * v).view()))
    }

    fn log_norm(&self) -> T {
        let half: T = cast(0.5);
        let mut acc = T::zero();
        Zip::from(&self.mean).and(&self.var).for_each(|&m, &v| acc += v.ln() + m * m / v);
        half * acc
    }

    fn grad_log_norm(&self) -> Array1<T> {
        let (first, second) = self.grad_log_norm_parts();
        concat(first.view(), second.view())
    }

    fn mean(&self) -> Array1<T> {
        self.mean.clone()
    }

    fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> ExpFamResult<Vec<Array1<T>>> {
        let d = self.dim();
        let scale = self.var.mapv(|v| v.sqrt());
        let mut draws = Vec::with_capacity(n);
        for _ in 0..n {
            let mut x = Array1::<T>::zeros(d);
            for i in 0..d {
                let z: f64 = StandardNormal.sample(rng);
                x[i] = self.mean[i] + scale[i] * cast::<T>(z);
            }
            draws.push(x);
        }
        Ok(draws)
    }
}
