//! Wishart distribution over symmetric positive-definite matrices.
//!
//! Purpose
//! -------
//! Conjugate prior over `D×D` precision matrices. With scale `W` and degrees
//! of freedom `v > D − 1`:
//!
//! ```text
//! η    = [−½ vec(W⁻¹), v/2]
//! T(X) = [vec(X), ln det X]
//! h(X) = −½ (D−1) ln det X − ¼ D (D−1) ln π
//! A(η) = ½ (−v ln det M + v D ln 2) + Σᵢ₌₁ᴰ ln Γ(½ (v + 1 − i)),   M = −2 reshape(η₁)
//! ∇A   = [vec(v W), Σᵢ ψ((v + 1 − i)/2) + D ln 2 + ln det W]
//! ```
//!
//! Key behaviors
//! -------------
//! - `log_norm` is evaluated from η (through `v = 2η₂` and `ln det M`), never
//!   from a materialized `W`.
//! - Inverses and log-determinants go through Cholesky; a scale or natural
//!   block that is not SPD is reported as `ExpFamError::NotPositiveDefinite`.
//! - Samples use the Bartlett decomposition `X = L A Aᵀ Lᵀ` with `W = L Lᵀ`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `v > D − 1` at all times; constructors and `update` reject anything else
//!   with `ExpFamError::InvalidArgument`.
//! - Cached `(W, v, ln det W)` always describe the stored η.
use super::ExpFamily;
use crate::{
    errors::{ExpFamError, ExpFamResult},
    numerical_stability::linalg::{
        check_len, check_square, chol_inverse, chol_logdet, cholesky, identity, logdet_pd,
        push_scalar, unvectorize, vectorize,
    },
    parameter::{DefaultParameter, Parameter},
    scalar::{Scalar, cast, recast, widen},
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2, ArrayView1, s};
use rand::Rng;
use rand_distr::{ChiSquared, Distribution, StandardNormal};
use statrs::function::gamma::{digamma, ln_gamma};
use std::f64::consts::{LN_2, PI};

/// `Wishart(W, v)` with parameter storage `P`.
#[derive(Debug, Clone, PartialEq)]
pub struct Wishart<T: Scalar = f64, P: Parameter<T> = DefaultParameter<T>> {
    param: P,
    scale: Array2<T>,
    dof: T,
    logdet_scale: T,
}

impl<T: Scalar> Wishart<T> {
    /// Wishart with scale `scale` (square, SPD) and `dof > D − 1`.
    pub fn new(scale: Array2<T>, dof: T) -> ExpFamResult<Self> {
        Self::from_std_param(scale, dof)
    }

    /// Identity scale with `v = D` degrees of freedom.
    pub fn with_dim(d: usize) -> ExpFamResult<Self> {
        Self::from_std_param(identity(d), cast(d as f64))
    }
}

impl<T: Scalar, P: Parameter<T>> Wishart<T, P> {
    pub fn from_std_param(scale: Array2<T>, dof: T) -> ExpFamResult<Self> {
        let d = check_square(scale.view())?;
        validate_dof(dof, d)?;
        let chol = cholesky(scale.view(), "wishart scale")?;
        let inv_scale: Array2<T> = chol_inverse(&chol);
        let half: T = cast(0.5);
        let eta = push_scalar(vectorize((&inv_scale * -half).view()).view(), dof * half);
        let logdet_scale = cast(chol_logdet(&chol));
        Ok(Wishart { param: P::from_natural(eta)?, scale, dof, logdet_scale })
    }

    /// Build from a natural parameter of length `d² + 1`.
    pub fn from_natural(eta: Array1<T>, d: usize) -> ExpFamResult<Self> {
        let (scale, dof, logdet_scale) = decode_natural(eta.view(), d)?;
        Ok(Wishart { param: P::from_natural(eta)?, scale, dof, logdet_scale })
    }

    /// Inverse map `η ↦ (W, v)`: `M = −2 reshape(η₁)`, `W = M⁻¹`, `v = 2η₂`.
    pub fn std_param_from(eta: ArrayView1<'_, T>, d: usize) -> ExpFamResult<(Array2<T>, T)> {
        let (scale, dof, _) = decode_natural(eta, d)?;
        Ok((scale, dof))
    }

    pub fn parameter(&self) -> &P {
        &self.param
    }

    /// Standard parameters `(W, v)`.
    pub fn std_param(&self) -> (Array2<T>, T) {
        (self.scale.clone(), self.dof)
    }

    /// Split a vector laid out like η into its matrix block and trailing scalar.
    pub fn split_grad(&self, grad: ArrayView1<'_, T>) -> ExpFamResult<(Array2<T>, T)> {
        let d = self.dim();
        check_len(d * d + 1, grad.len())?;
        Ok((unvectorize(grad.slice(s![..d * d]), d)?, grad[d * d]))
    }

    pub fn reallocate<U: Scalar>(&self) -> Wishart<U, P::Cast<U>> {
        Wishart {
            param: self.param.reallocate(),
            scale: self.scale.mapv(recast),
            dof: recast(self.dof),
            logdet_scale: recast(self.logdet_scale),
        }
    }

    fn check_support(&self, x: &Array2<T>) -> ExpFamResult<()> {
        let d = check_square(x.view())?;
        check_len(self.dim(), d)
    }
}

fn validate_dof<T: Scalar>(dof: T, d: usize) -> ExpFamResult<()> {
    if !dof.is_finite() || widen(dof) <= d as f64 - 1.0 {
        return Err(ExpFamError::InvalidArgument {
            name: "dof",
            value: widen(dof),
            reason: "Wishart degrees of freedom must exceed D - 1",
        });
    }
    Ok(())
}

/// Decode `η` into `(W, v, ln det W)` with one Cholesky of `M = −2 reshape(η₁)`.
fn decode_natural<T: Scalar>(eta: ArrayView1<'_, T>, d: usize) -> ExpFamResult<(Array2<T>, T, T)> {
    check_len(d * d + 1, eta.len())?;
    let dof = eta[d * d] * cast(2.0);
    validate_dof(dof, d)?;
    let m = unvectorize(eta.slice(s![..d * d]), d)? * cast::<T>(-2.0);
    let chol = cholesky(m.view(), "wishart natural block")?;
    Ok((chol_inverse(&chol), dof, cast(-chol_logdet(&chol))))
}

/// `Σᵢ₌₁ᴰ f((v + 1 − i) / 2)` evaluated in `f64`.
fn sum_over_dims(v: f64, d: usize, f: impl Fn(f64) -> f64) -> f64 {
    (1..=d).map(|i| f(0.5 * (v + 1.0 - i as f64))).sum()
}

impl<T: Scalar, P: Parameter<T>> ExpFamily<T> for Wishart<T, P> {
    type Sample = Array2<T>;

    fn dim(&self) -> usize {
        self.scale.nrows()
    }

    fn natural_param(&self) -> Array1<T> {
        self.param.natural_form()
    }

    fn update(&mut self, eta: ArrayView1<'_, T>) -> ExpFamResult<()> {
        let d = self.dim();
        let (scale, dof, logdet_scale) = decode_natural(eta, d)?;
        self.param.set_natural(eta)?;
        self.scale = scale;
        self.dof = dof;
        self.logdet_scale = logdet_scale;
        log::debug!("wishart update: dim={d}, dof={:.6}", widen(dof));
        Ok(())
    }

    fn base_measure(&self, x: &Array2<T>) -> ExpFamResult<T> {
        self.check_support(x)?;
        let d = self.dim() as f64;
        let logdet_x = widen(logdet_pd(x.view(), "wishart support point")?);
        Ok(cast(-0.5 * (d - 1.0) * logdet_x - 0.25 * d * (d - 1.0) * PI.ln()))
    }

    fn stats(&self, x: &Array2<T>) -> ExpFamResult<Array1<T>> {
        self.check_support(x)?;
        let logdet_x = logdet_pd(x.view(), "wishart support point")?;
        Ok(push_scalar(vectorize(x.view()).view(), logdet_x))
    }

    fn log_norm(&self) -> T {
        let d = self.dim();
        let eta = self.param.natural_form();
        let v = 2.0 * widen(eta[d * d]);
        let logdet_m = -widen(self.logdet_scale);
        let value = 0.5 * (-v * logdet_m + v * d as f64 * LN_2)
            + sum_over_dims(v, d, ln_gamma);
        cast(value)
    }

    fn grad_log_norm(&self) -> Array1<T> {
        let d = self.dim();
        let v = widen(self.dof);
        let expected_logdet = sum_over_dims(v, d, digamma)
            + d as f64 * LN_2
            + widen(self.logdet_scale);
        push_scalar(vectorize((&self.scale * self.dof).view()).view(), cast(expected_logdet))
    }

    fn mean(&self) -> Array2<T> {
        &self.scale * self.dof
    }

    fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> ExpFamResult<Vec<Array2<T>>> {
        let d = self.dim();
        let v = widen(self.dof);
        let chol = cholesky(self.scale.view(), "wishart scale")?;
        let lower = chol.l();
        let chi = (0..d).map(|i| ChiSquared::new(v - i as f64)).collect::<Result<Vec<_>, _>>()?;
        let mut draws = Vec::with_capacity(n);
        for _ in 0..n {
            let mut a = DMatrix::<f64>::zeros(d, d);
            for i in 0..d {
                a[(i, i)] = chi[i].sample(rng).sqrt();
                for j in 0..i {
                    a[(i, j)] = StandardNormal.sample(rng);
                }
            }
            let la = &lower * a;
            let x = &la * la.transpose();
            draws.push(Array2::from_shape_fn((d, d), |(i, j)| cast(0.5 * (x[(i, j)] + x[(j, i)]))));
        }
        Ok(draws)
    }

    /// Wishart log density.
    ///
    /// The exact density carries `(v − D − 1)/2 · ln det X`, one `ln det X`
    /// below what `base_measure + ⟨η, T(X)⟩` contributes.
    fn log_pdf(&self, x: &Array2<T>) -> ExpFamResult<T> {
        let stats = self.stats(x)?;
        let logdet_x = stats[stats.len() - 1];
        Ok(self.base_measure(x)? + self.natural_param().dot(&stats) - self.log_norm() - logdet_x)
    }
}
