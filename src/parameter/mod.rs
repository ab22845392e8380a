//! parameter — storage of a distribution's natural parameter.
//!
//! Purpose
//! -------
//! Decouple *how* a natural-parameter vector η is stored from *what* the
//! distributions compute with it. A [`Parameter`] owns exactly one numeric
//! vector ξ (the real form) and exposes η (the natural form) as a derivation
//! of that same storage, together with the Jacobian ∂ξ/∂η used to carry
//! natural-space steps into storage space.
//!
//! Key behaviors
//! -------------
//! - [`DefaultParameter`]: identity map, ξ ≡ η.
//! - [`SoftplusParameter`]: for strictly positive η, stores ξ = softplus⁻¹(η)
//!   so that any real ξ maps back to a valid η.
//! - `reallocate::<U>()` copies the storage into another scalar type.
//! - `to_dict` / `from_dict` round-trip exactly the stored fields through a
//!   [`Dict`] (`{"xi": [...]}`).
//!
//! Invariants & assumptions
//! ------------------------
//! - The length of a parameter is fixed at construction; `set_natural` with a
//!   different length fails with `ExpFamError::DimensionMismatch` and leaves
//!   the storage untouched.
//! - `natural_form` and `real_form` always describe the same parameter;
//!   mutating through `set_natural` updates both.
//!
//! Downstream usage
//! ----------------
//! - Stochastic distributions are generic over `P: Parameter<T>` and route
//!   every `update` through [`Parameter::set_natural`].
//! - Callers holding a natural-space step (e.g. a natural-gradient update)
//!   use [`Parameter::transport`] to obtain the matching step on ξ.

mod default;
mod softplus;

pub use self::default::DefaultParameter;
pub use self::softplus::SoftplusParameter;

use crate::{
    errors::{ExpFamError, ExpFamResult},
    numerical_stability::linalg::check_len,
    scalar::{Scalar, widen},
};
use ndarray::{Array1, Array2, ArrayView1};
use serde_json::Value;

/// Structural representation used by `to_dict` / `from_dict`.
pub type Dict = serde_json::Map<String, Value>;

/// Key under which the stored vector ξ is written.
pub const XI_KEY: &str = "xi";

/// Storage for a natural-parameter vector with a (possibly non-identity)
/// real-form reparameterization.
pub trait Parameter<T: Scalar>: Clone + std::fmt::Debug {
    /// The same parameter type re-encoded with scalar `U`.
    type Cast<U: Scalar>: Parameter<U>;

    /// Build a parameter whose natural form is `eta`.
    fn from_natural(eta: Array1<T>) -> ExpFamResult<Self>;

    /// η, the canonical exponential-family parameter.
    fn natural_form(&self) -> Array1<T>;

    /// ξ, the stored representation.
    fn real_form(&self) -> Array1<T>;

    /// ∂ξ/∂η as a `len × len` matrix.
    fn jacobian(&self) -> Array2<T>;

    /// Replace the parameter so that its natural form becomes `eta`.
    fn set_natural(&mut self, eta: ArrayView1<'_, T>) -> ExpFamResult<()>;

    /// Length of the natural-parameter vector.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Map a step `dη` in natural space to the first-order step `J·dη` on ξ.
    fn transport(&self, d_eta: ArrayView1<'_, T>) -> ExpFamResult<Array1<T>> {
        check_len(self.len(), d_eta.len())?;
        Ok(self.jacobian().dot(&d_eta))
    }

    /// Copy with storage cast to scalar type `U`; `self` is not modified.
    fn reallocate<U: Scalar>(&self) -> Self::Cast<U>;

    /// Structural dict holding exactly the stored fields.
    fn to_dict(&self) -> Dict;

    /// Rebuild from a dict produced by [`Parameter::to_dict`].
    fn from_dict(dict: &Dict) -> ExpFamResult<Self>;
}

/// Encode a stored vector under `key`.
pub(crate) fn encode_vector<T: Scalar>(dict: &mut Dict, key: &str, v: ArrayView1<'_, T>) {
    let values = v.iter().map(|&x| Value::from(widen(x))).collect();
    dict.insert(key.to_string(), Value::Array(values));
}

/// Decode the vector stored under `key`.
pub(crate) fn decode_vector<T: Scalar>(dict: &Dict, key: &'static str) -> ExpFamResult<Array1<T>> {
    let raw = dict.get(key).ok_or(ExpFamError::MissingField { field: key })?;
    let values: Vec<T> = serde_json::from_value(raw.clone())
        .map_err(|err| ExpFamError::InvalidField { field: key, reason: err.to_string() })?;
    Ok(Array1::from(values))
}
