//! Softplus reparameterization for strictly positive natural parameters.
//!
//! Stores ξ = softplus⁻¹(η) so that every real ξ decodes to a valid η > 0.
//! Useful for families whose natural parameter lives on (0, ∞)ᴰ, such as
//! the Dirichlet concentration, when a caller takes unconstrained steps on ξ.
use super::{Dict, Parameter, XI_KEY, decode_vector, encode_vector};
use crate::{
    errors::{ExpFamError, ExpFamResult},
    numerical_stability::{
        linalg::check_len,
        transformations::{safe_softplus, safe_softplus_inv, softplus_inv_deriv},
    },
    scalar::{Scalar, recast, widen},
};
use ndarray::{Array1, Array2, ArrayView1, Zip};

/// Parameter with η = softplus(ξ).
///
/// Invariants
/// ----------
/// - Every entry of the natural form is finite and `> 0`; constructors and
///   `set_natural` reject anything else with `ExpFamError::InvalidArgument`.
/// - The Jacobian ∂ξ/∂η is diagonal with entries `1 / (1 − e^{−η})`.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftplusParameter<T: Scalar> {
    xi: Array1<T>,
}

impl<T: Scalar> SoftplusParameter<T> {
    /// Wrap an unconstrained vector ξ directly.
    pub fn from_real(xi: Array1<T>) -> Self {
        SoftplusParameter { xi }
    }
}

fn validate_positive<T: Scalar>(eta: ArrayView1<'_, T>) -> ExpFamResult<()> {
    for &value in eta.iter() {
        if !value.is_finite() || value <= T::zero() {
            return Err(ExpFamError::InvalidArgument {
                name: "eta",
                value: widen(value),
                reason: "softplus parameters require finite, strictly positive entries",
            });
        }
    }
    Ok(())
}

impl<T: Scalar> Parameter<T> for SoftplusParameter<T> {
    type Cast<U: Scalar> = SoftplusParameter<U>;

    fn from_natural(eta: Array1<T>) -> ExpFamResult<Self> {
        validate_positive(eta.view())?;
        Ok(SoftplusParameter { xi: eta.mapv(safe_softplus_inv) })
    }

    fn natural_form(&self) -> Array1<T> {
        self.xi.mapv(safe_softplus)
    }

    fn real_form(&self) -> Array1<T> {
        self.xi.clone()
    }

    fn jacobian(&self) -> Array2<T> {
        Array2::from_diag(&self.natural_form().mapv(softplus_inv_deriv))
    }

    fn set_natural(&mut self, eta: ArrayView1<'_, T>) -> ExpFamResult<()> {
        check_len(self.xi.len(), eta.len())?;
        validate_positive(eta)?;
        Zip::from(&mut self.xi).and(&eta).for_each(|x, &e| *x = safe_softplus_inv(e));
        Ok(())
    }

    fn len(&self) -> usize {
        self.xi.len()
    }

    fn transport(&self, d_eta: ArrayView1<'_, T>) -> ExpFamResult<Array1<T>> {
        check_len(self.xi.len(), d_eta.len())?;
        let scale = self.natural_form().mapv(softplus_inv_deriv);
        Ok(&scale * &d_eta)
    }

    fn reallocate<U: Scalar>(&self) -> SoftplusParameter<U> {
        SoftplusParameter { xi: self.xi.mapv(recast) }
    }

    fn to_dict(&self) -> Dict {
        let mut dict = Dict::new();
        encode_vector(&mut dict, XI_KEY, self.xi.view());
        dict
    }

    fn from_dict(dict: &Dict) -> ExpFamResult<Self> {
        Ok(SoftplusParameter { xi: decode_vector(dict, XI_KEY)? })
    }
}
