//! delta — degenerate point-mass ("δ") members of each family.
//!
//! Purpose
//! -------
//! A δ distribution concentrates all of its mass on a single location. It is
//! the limit of its stochastic counterpart as the spread vanishes and serves
//! as a point estimate inside the same algebra: it answers `grad_log_norm`
//! (the expected sufficient statistics, here simply `T(location)`) and
//! accepts a natural-parameter `update`, which moves the location to the
//! mode (or mean) of the stochastic distribution with that η.
//!
//! Key behaviors
//! -------------
//! - [`DeltaDirichlet`]: location on the simplex; update to the Dirichlet mode.
//! - [`DeltaWishart`]: SPD location; update to the Wishart mode `(v − D − 1) W`.
//! - [`DeltaNormal`] / [`DeltaNormalDiag`]: update to the Gaussian mean.
//!
//! Invariants & assumptions
//! ------------------------
//! - δ distributions have no parameter object, no log-normalizer, no base
//!   measure, and no sampler. They implement [`DeltaDistribution`], which is
//!   disjoint from [`ExpFamily`](crate::distributions::ExpFamily), so those
//!   operations are absent at compile time.
//! - `update` validates before writing; a rejected η leaves the location
//!   unchanged and is logged at `warn` level.
//! - `grad_log_norm` uses the same layout as the stochastic counterpart.

mod dirichlet;
mod normal;
mod normal_diag;
mod wishart;

pub use self::dirichlet::DeltaDirichlet;
pub use self::normal::DeltaNormal;
pub use self::normal_diag::DeltaNormalDiag;
pub use self::wishart::DeltaWishart;

use crate::{errors::ExpFamResult, scalar::Scalar};
use ndarray::{Array1, ArrayView1};

/// Capability set of a point-mass distribution.
pub trait DeltaDistribution<T: Scalar> {
    /// Type of the location (vector or matrix).
    type Sample;

    /// Support dimension `D`.
    fn dim(&self) -> usize;

    /// The single point carrying all of the mass.
    fn location(&self) -> &Self::Sample;

    /// Move the location to the point implied by the natural parameter `eta`.
    fn update(&mut self, eta: ArrayView1<'_, T>) -> ExpFamResult<()>;

    /// Sufficient statistics `T(x)`, laid out like the stochastic counterpart's η.
    fn stats(&self, x: &Self::Sample) -> ExpFamResult<Array1<T>>;

    /// `T(location)`, the expectation of the statistics under the point mass.
    fn grad_log_norm(&self) -> Array1<T>;
}
