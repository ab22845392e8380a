//! Point mass in `ℝᴰ` updated through full-covariance Gaussian natural parameters.
use super::DeltaDistribution;
use crate::{
    distributions::normal::std_param_from,
    errors::ExpFamResult,
    numerical_stability::linalg::{check_len, concat, outer, vectorize},
    scalar::Scalar,
};
use ndarray::{Array1, ArrayView1};

/// δ-Normal: all mass at `μ`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaNormal<T: Scalar = f64> {
    mu: Array1<T>,
}

impl<T: Scalar> DeltaNormal<T> {
    pub fn new(mu: Array1<T>) -> Self {
        DeltaNormal { mu }
    }

    /// Point mass at the origin of `ℝᵈ`.
    pub fn with_dim(d: usize) -> Self {
        DeltaNormal { mu: Array1::zeros(d) }
    }
}

impl<T: Scalar> DeltaDistribution<T> for DeltaNormal<T> {
    type Sample = Array1<T>;

    fn dim(&self) -> usize {
        self.mu.len()
    }

    fn location(&self) -> &Array1<T> {
        &self.mu
    }

    /// Move to the mean `Λ⁻¹ η₁` of `N` with natural parameter `η`.
    fn update(&mut self, eta: ArrayView1<'_, T>) -> ExpFamResult<()> {
        let (mean, _, _) = std_param_from(eta, self.dim()).inspect_err(|err| {
            log::warn!("delta normal: rejected natural parameter: {err}");
        })?;
        self.mu = mean;
        Ok(())
    }

    fn stats(&self, x: &Array1<T>) -> ExpFamResult<Array1<T>> {
        check_len(self.dim(), x.len())?;
        Ok(concat(x.view(), vectorize(outer(x.view(), x.view()).view()).view()))
    }

    fn grad_log_norm(&self) -> Array1<T> {
        concat(self.mu.view(), vectorize(outer(self.mu.view(), self.mu.view()).view()).view())
    }
}
