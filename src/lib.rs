//! rust_expfamily — exponential-family distribution algebra.
//!
//! Purpose
//! -------
//! Provide the per-distribution building blocks a variational or
//! conjugate-update inference engine consumes: natural ↔ standard parameter
//! maps, sufficient statistics, base measures, log-normalizers and their
//! gradients (the expected sufficient statistics), and sampling, for the
//! Dirichlet, Wishart, full-covariance Normal, and diagonal Normal families
//! together with their degenerate point-mass ("δ") limits.
//!
//! Key behaviors
//! -------------
//! - [`distributions`]: stochastic families implementing [`ExpFamily`].
//! - [`delta`]: point-mass families implementing [`DeltaDistribution`].
//! - [`parameter`]: storage of natural parameters, either as-is
//!   ([`DefaultParameter`]) or through a softplus reparameterization
//!   ([`SoftplusParameter`]), with Jacobians and dict persistence.
//! - [`numerical_stability`]: Cholesky-based SPD algebra, `vec` layout, and
//!   stable softplus transforms.
//! - [`diagnostics`]: finite-difference checks of `grad_log_norm` and of
//!   parameter Jacobians.
//!
//! Invariants & assumptions
//! ------------------------
//! - Support dimension and scalar type are fixed at construction.
//! - `update` is the only mutator of a distribution; it validates the
//!   incoming η completely before changing anything.
//! - Fallible operations return [`ExpFamResult`]; nothing panics on bad
//!   input and nothing is retried internally.
//!
//! Conventions
//! -----------
//! - Matrix blocks of natural parameters and statistics use column-major
//!   `vec`.
//! - Logging goes through the `log` facade; the crate never installs a
//!   logger.
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each module; `tests/` holds cross-family
//!   properties (gradient identity, round trips, δ limits, persistence).

pub mod delta;
pub mod diagnostics;
pub mod distributions;
pub mod errors;
pub mod numerical_stability;
pub mod parameter;
pub mod scalar;

pub use crate::delta::{
    DeltaDirichlet, DeltaDistribution, DeltaNormal, DeltaNormalDiag, DeltaWishart,
};
pub use crate::distributions::{Dirichlet, ExpFamily, Normal, NormalDiag, Wishart};
pub use crate::errors::{ExpFamError, ExpFamResult};
pub use crate::parameter::{DefaultParameter, Dict, Parameter, SoftplusParameter};
pub use crate::scalar::Scalar;
