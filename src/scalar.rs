//! Scalar encoding types for distribution storage.
//!
//! Every distribution is generic over a floating-point type `T: Scalar`
//! (`f32` or `f64`). Special functions (`ln Γ`, `ψ`) and matrix
//! factorizations are evaluated in `f64` and cast back to `T`; the helpers
//! here centralize those casts so call sites stay free of `Option` handling.
use ndarray::NdFloat;
use num_traits::FromPrimitive;
use serde::de::DeserializeOwned;

/// Floating-point type usable as a distribution's encoding type.
pub trait Scalar: NdFloat + FromPrimitive + Default + DeserializeOwned {}

impl Scalar for f32 {}
impl Scalar for f64 {}

/// Cast an `f64` into `T`; values that cannot be represented become NaN.
#[inline]
pub fn cast<T: Scalar>(x: f64) -> T {
    T::from_f64(x).unwrap_or_else(T::nan)
}

/// Widen `x` to `f64`.
#[inline]
pub fn widen<T: Scalar>(x: T) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}

/// Cast between two scalar types through `f64`.
#[inline]
pub fn recast<T: Scalar, U: Scalar>(x: T) -> U {
    cast(widen(x))
}
