//! Point mass on a symmetric positive-definite matrix.
use super::DeltaDistribution;
use crate::{
    distributions::Wishart,
    errors::{ExpFamError, ExpFamResult},
    numerical_stability::linalg::{
        check_len, check_square, identity, logdet_pd, push_scalar, vectorize,
    },
    scalar::{Scalar, cast, widen},
};
use ndarray::{Array1, Array2, ArrayView1};

/// δ-Wishart: all mass at the SPD matrix `X`.
///
/// `ln det X` is cached next to the location since every gradient evaluation
/// needs it.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaWishart<T: Scalar = f64> {
    x: Array2<T>,
    logdet_x: T,
}

impl<T: Scalar> DeltaWishart<T> {
    /// Point mass at `x`.
    ///
    /// Errors
    /// ------
    /// - `ExpFamError::NotSquare` / `ExpFamError::NotPositiveDefinite` when `x`
    ///   is not a square SPD matrix.
    pub fn new(x: Array2<T>) -> ExpFamResult<Self> {
        check_square(x.view())?;
        let logdet_x = logdet_pd(x.view(), "delta wishart location")?;
        Ok(DeltaWishart { x, logdet_x })
    }

    /// Point mass at the `d×d` identity.
    pub fn with_dim(d: usize) -> Self {
        DeltaWishart { x: identity(d), logdet_x: T::zero() }
    }
}

impl<T: Scalar> DeltaDistribution<T> for DeltaWishart<T> {
    type Sample = Array2<T>;

    fn dim(&self) -> usize {
        self.x.nrows()
    }

    fn location(&self) -> &Array2<T> {
        &self.x
    }

    /// Move to the mode `(v − D − 1) W` of the Wishart with natural parameter `η`.
    fn update(&mut self, eta: ArrayView1<'_, T>) -> ExpFamResult<()> {
        let d = self.dim();
        let (scale, dof) = Wishart::<T>::std_param_from(eta, d).inspect_err(|err| {
            log::warn!("delta wishart: rejected natural parameter: {err}");
        })?;
        let factor = widen(dof) - d as f64 - 1.0;
        if factor <= 0.0 {
            log::warn!("delta wishart: dof {} leaves the Wishart without a mode", widen(dof));
            return Err(ExpFamError::InvalidArgument {
                name: "dof",
                value: widen(dof),
                reason: "the Wishart mode requires dof > D + 1",
            });
        }
        let x = scale * cast::<T>(factor);
        let logdet_x = logdet_pd(x.view(), "delta wishart location")?;
        self.x = x;
        self.logdet_x = logdet_x;
        Ok(())
    }

    fn stats(&self, x: &Array2<T>) -> ExpFamResult<Array1<T>> {
        check_len(self.dim(), check_square(x.view())?)?;
        let logdet = logdet_pd(x.view(), "delta wishart support point")?;
        Ok(push_scalar(vectorize(x.view()).view(), logdet))
    }

    fn grad_log_norm(&self) -> Array1<T> {
        push_scalar(vectorize(self.x.view()).view(), self.logdet_x)
    }
}
