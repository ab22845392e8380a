//! Dirichlet distribution over the probability simplex.
//!
//! The natural parameter is the concentration vector α itself, the
//! sufficient statistic is `log x`, and
//!
//! ```text
//! A(α)  = Σ ln Γ(αᵢ) − ln Γ(Σ αᵢ)
//! ∇A(α) = ψ(αᵢ) − ψ(Σ αᵢ) = E[log xᵢ]
//! ```
use super::{ExpFamily, digamma_t, ln_gamma_t};
use crate::{
    errors::{ExpFamError, ExpFamResult},
    numerical_stability::linalg::check_len,
    parameter::{DefaultParameter, Parameter},
    scalar::{Scalar, cast, recast, widen},
};
use ndarray::{Array1, ArrayView1};
use rand::Rng;
use rand_distr::{Distribution, Gamma, Open01};

/// Dirichlet(α) with parameter storage `P`.
///
/// Fields
/// ------
/// - `param`: storage of η = α.
/// - `alpha`: cached concentration, always equal to `param.natural_form()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dirichlet<T: Scalar = f64, P: Parameter<T> = DefaultParameter<T>> {
    param: P,
    alpha: Array1<T>,
}

impl<T: Scalar> Dirichlet<T> {
    /// Dirichlet with concentration `alpha` (every entry finite and `> 0`).
    pub fn new(alpha: Array1<T>) -> ExpFamResult<Self> {
        Self::from_natural(alpha)
    }

    /// Dirichlet with unit concentration over a `d`-dimensional simplex.
    pub fn with_dim(d: usize) -> Self {
        let alpha = Array1::ones(d);
        Dirichlet { param: DefaultParameter::new(alpha.clone()), alpha }
    }
}

impl<T: Scalar, P: Parameter<T>> Dirichlet<T, P> {
    /// Build from a natural parameter, stored through `P`.
    pub fn from_natural(eta: Array1<T>) -> ExpFamResult<Self> {
        validate_concentration(eta.view())?;
        let param = P::from_natural(eta.clone())?;
        Ok(Dirichlet { param, alpha: eta })
    }

    pub fn parameter(&self) -> &P {
        &self.param
    }

    /// Standard parameter α.
    pub fn std_param(&self) -> Array1<T> {
        self.alpha.clone()
    }

    /// Elementwise base-measure terms `−log xᵢ`; their sum is [`ExpFamily::base_measure`].
    pub fn base_measure_terms(&self, x: &Array1<T>) -> ExpFamResult<Array1<T>> {
        check_len(self.dim(), x.len())?;
        Ok(x.mapv(|v| -v.ln()))
    }

    /// Copy re-encoded with scalar `U`.
    pub fn reallocate<U: Scalar>(&self) -> Dirichlet<U, P::Cast<U>> {
        Dirichlet { param: self.param.reallocate(), alpha: self.alpha.mapv(recast) }
    }
}

fn validate_concentration<T: Scalar>(alpha: ArrayView1<'_, T>) -> ExpFamResult<()> {
    for &value in alpha.iter() {
        if !value.is_finite() || value <= T::zero() {
            return Err(ExpFamError::InvalidArgument {
                name: "alpha",
                value: widen(value),
                reason: "Dirichlet concentration must be finite and > 0",
            });
        }
    }
    Ok(())
}

impl<T: Scalar, P: Parameter<T>> ExpFamily<T> for Dirichlet<T, P> {
    type Sample = Array1<T>;

    fn dim(&self) -> usize {
        self.alpha.len()
    }

    fn natural_param(&self) -> Array1<T> {
        self.param.natural_form()
    }

    fn update(&mut self, eta: ArrayView1<'_, T>) -> ExpFamResult<()> {
        check_len(self.dim(), eta.len())?;
        validate_concentration(eta)?;
        self.param.set_natural(eta)?;
        self.alpha.assign(&eta);
        Ok(())
    }

    fn base_measure(&self, x: &Array1<T>) -> ExpFamResult<T> {
        Ok(self.base_measure_terms(x)?.sum())
    }

    fn stats(&self, x: &Array1<T>) -> ExpFamResult<Array1<T>> {
        check_len(self.dim(), x.len())?;
        Ok(x.mapv(|v| v.ln()))
    }

    fn log_norm(&self) -> T {
        let total = self.alpha.sum();
        self.alpha.iter().map(|&a| ln_gamma_t(a)).fold(T::zero(), |acc, v| acc + v)
            - ln_gamma_t(total)
    }

    fn grad_log_norm(&self) -> Array1<T> {
        let psi_total = digamma_t(self.alpha.sum());
        self.alpha.mapv(|a| digamma_t(a) - psi_total)
    }

    fn mean(&self) -> Array1<T> {
        &self.alpha / self.alpha.sum()
    }

    fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> ExpFamResult<Vec<Array1<T>>> {
        let gammas = self
            .alpha
            .iter()
            .map(|&a| LogGamma::new(widen(a)))
            .collect::<ExpFamResult<Vec<_>>>()?;
        let mut draws = Vec::with_capacity(n);
        let mut log_g = vec![0.0_f64; gammas.len()];
        for _ in 0..n {
            for (slot, dist) in log_g.iter_mut().zip(&gammas) {
                *slot = dist.sample_ln(rng);
            }
            let max = log_g.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let total: f64 = log_g.iter().map(|&l| (l - max).exp()).sum();
            draws.push(log_g.iter().map(|&l| cast((l - max).exp() / total)).collect());
        }
        Ok(draws)
    }
}

/// Draws `ln g` for `g ~ Gamma(α, 1)` without underflow.
///
/// For α < 1 the draw uses `g = g' · U^{1/α}` with `g' ~ Gamma(α + 1, 1)`,
/// so `ln g = ln g' + ln U / α` stays finite even when `g` itself rounds to 0.
struct LogGamma {
    gamma: Gamma<f64>,
    inv_alpha: Option<f64>,
}

impl LogGamma {
    fn new(alpha: f64) -> ExpFamResult<Self> {
        if alpha < 1.0 {
            Ok(LogGamma { gamma: Gamma::new(alpha + 1.0, 1.0)?, inv_alpha: Some(alpha.recip()) })
        } else {
            Ok(LogGamma { gamma: Gamma::new(alpha, 1.0)?, inv_alpha: None })
        }
    }

    fn sample_ln<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let ln_g = self.gamma.sample(rng).ln();
        match self.inv_alpha {
            Some(inv) => {
                let u: f64 = Open01.sample(rng);
                ln_g + u.ln() * inv
            }
            None => ln_g,
        }
    }
}
