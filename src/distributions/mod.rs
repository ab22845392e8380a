//! distributions — stochastic exponential-family distributions.
//!
//! Purpose
//! -------
//! Define the [`ExpFamily`] capability set and its four implementations:
//! [`Dirichlet`], [`Wishart`], [`Normal`] (full covariance), and
//! [`NormalDiag`] (diagonal covariance). Each one maps between natural
//! parameters η and standard parameters, evaluates sufficient statistics,
//! base measure, log-normalizer `A(η)` and its gradient `∇A(η) = E[T(x)]`,
//! and draws samples from its standard parameters.
//!
//! Key behaviors
//! -------------
//! - Every distribution is generic over a scalar `T` and a parameter storage
//!   `P: Parameter<T>` (identity by default). `update` is the only mutator: it
//!   validates η, recomputes the cached standard parameters, and only then
//!   writes η through `P::set_natural`.
//! - `log_pdf` is provided once for the whole family as
//!   `h(x) + ⟨η, T(x)⟩ − A(η)`.
//! - Sampling honors a caller-supplied `rand::Rng`; `sample_seeded` builds a
//!   `StdRng` from an optional seed for reproducible draws.
//!
//! Invariants & assumptions
//! ------------------------
//! - The support dimension `D` and the natural-parameter length are fixed at
//!   construction. Inputs of the wrong size fail with
//!   `ExpFamError::DimensionMismatch`.
//! - A failed `update` leaves the distribution exactly as it was.
//! - Cached standard parameters always correspond to the stored η.
//!
//! Conventions
//! -----------
//! - Matrix blocks inside η and inside statistics use column-major `vec`.
//! - Special functions are evaluated in `f64` through `statrs`.
//!
//! Testing notes
//! -------------
//! - Each submodule checks its closed forms on hand-computable inputs, the
//!   natural ↔ standard round trip, idempotence of `update(natural_param())`,
//!   and `grad_log_norm` against finite differences of `log_norm`
//!   (see `diagnostics::finite_diff`).

mod dirichlet;
pub(crate) mod normal;
pub(crate) mod normal_diag;
mod wishart;

pub use self::dirichlet::Dirichlet;
pub use self::normal::Normal;
pub use self::normal_diag::NormalDiag;
pub use self::wishart::Wishart;

use crate::{
    errors::ExpFamResult,
    scalar::{Scalar, cast, widen},
};
use ndarray::{Array1, ArrayView1};
use rand::{Rng, SeedableRng, rngs::StdRng};
use statrs::function::gamma::{digamma, ln_gamma};

/// Capability set of a stochastic exponential-family distribution.
///
/// Density: `p(x) = exp(h(x) + ⟨η, T(x)⟩ − A(η))` with `h` the log base
/// measure, `T` the sufficient statistics, and `A` the log-normalizer.
pub trait ExpFamily<T: Scalar> {
    /// Type of a point of the support (vector or matrix).
    type Sample;

    /// Support dimension `D`.
    fn dim(&self) -> usize;

    /// η, the natural parameter.
    fn natural_param(&self) -> Array1<T>;

    /// Replace the natural parameter with `eta` and refresh cached state.
    fn update(&mut self, eta: ArrayView1<'_, T>) -> ExpFamResult<()>;

    /// Log base measure `h(x)`.
    fn base_measure(&self, x: &Self::Sample) -> ExpFamResult<T>;

    /// Sufficient statistics `T(x)`, laid out like η.
    fn stats(&self, x: &Self::Sample) -> ExpFamResult<Array1<T>>;

    /// Log-normalizer `A(η)`.
    fn log_norm(&self) -> T;

    /// `∇A(η)`, equal to `E[T(x)]`.
    fn grad_log_norm(&self) -> Array1<T>;

    /// Expected value of the random variable.
    fn mean(&self) -> Self::Sample;

    /// Draw `n` independent samples using `rng`.
    fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> ExpFamResult<Vec<Self::Sample>>;

    /// Draw `n` samples from a `StdRng` seeded with `seed` (OS entropy when `None`).
    fn sample_seeded(&self, n: usize, seed: Option<u64>) -> ExpFamResult<Vec<Self::Sample>> {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        self.sample(n, &mut rng)
    }

    /// Log density `h(x) + ⟨η, T(x)⟩ − A(η)`.
    fn log_pdf(&self, x: &Self::Sample) -> ExpFamResult<T> {
        let stats = self.stats(x)?;
        Ok(self.base_measure(x)? + self.natural_param().dot(&stats) - self.log_norm())
    }
}

// ---- Special functions in scalar space ----

#[inline]
pub(crate) fn ln_gamma_t<T: Scalar>(x: T) -> T {
    cast(ln_gamma(widen(x)))
}

#[inline]
pub(crate) fn digamma_t<T: Scalar>(x: T) -> T {
    cast(digamma(widen(x)))
}
