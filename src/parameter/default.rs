//! Identity parameter: the stored vector is the natural parameter.
use super::{Dict, Parameter, XI_KEY, decode_vector, encode_vector};
use crate::{
    errors::ExpFamResult,
    numerical_stability::linalg::{check_len, identity},
    scalar::{Scalar, recast},
};
use ndarray::{Array1, Array2, ArrayView1};

/// Parameter with ξ ≡ η.
///
/// `natural_form` and `real_form` return copies of the same vector and the
/// Jacobian is the identity.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultParameter<T: Scalar> {
    xi: Array1<T>,
}

impl<T: Scalar> DefaultParameter<T> {
    pub fn new(xi: Array1<T>) -> Self {
        DefaultParameter { xi }
    }

    /// Borrow the stored vector without copying.
    pub fn view(&self) -> ArrayView1<'_, T> {
        self.xi.view()
    }
}

impl<T: Scalar> Parameter<T> for DefaultParameter<T> {
    type Cast<U: Scalar> = DefaultParameter<U>;

    fn from_natural(eta: Array1<T>) -> ExpFamResult<Self> {
        Ok(DefaultParameter { xi: eta })
    }

    fn natural_form(&self) -> Array1<T> {
        self.xi.clone()
    }

    fn real_form(&self) -> Array1<T> {
        self.xi.clone()
    }

    fn jacobian(&self) -> Array2<T> {
        identity(self.xi.len())
    }

    fn set_natural(&mut self, eta: ArrayView1<'_, T>) -> ExpFamResult<()> {
        check_len(self.xi.len(), eta.len())?;
        self.xi.assign(&eta);
        Ok(())
    }

    fn len(&self) -> usize {
        self.xi.len()
    }

    fn transport(&self, d_eta: ArrayView1<'_, T>) -> ExpFamResult<Array1<T>> {
        check_len(self.xi.len(), d_eta.len())?;
        Ok(d_eta.to_owned())
    }

    fn reallocate<U: Scalar>(&self) -> DefaultParameter<U> {
        DefaultParameter { xi: self.xi.mapv(recast) }
    }

    fn to_dict(&self) -> Dict {
        let mut dict = Dict::new();
        encode_vector(&mut dict, XI_KEY, self.xi.view());
        dict
    }

    fn from_dict(dict: &Dict) -> ExpFamResult<Self> {
        Ok(DefaultParameter { xi: decode_vector(dict, XI_KEY)? })
    }
}
