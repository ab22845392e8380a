//! Point mass in `ℝᴰ` updated through diagonal Gaussian natural parameters.
use super::DeltaDistribution;
use crate::{
    distributions::normal_diag::std_param_from,
    errors::ExpFamResult,
    numerical_stability::linalg::{check_len, concat},
    scalar::Scalar,
};
use ndarray::{Array1, ArrayView1};

/// δ-NormalDiag: all mass at `μ`; statistics are `[x, x²]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaNormalDiag<T: Scalar = f64> {
    mu: Array1<T>,
}

impl<T: Scalar> DeltaNormalDiag<T> {
    pub fn new(mu: Array1<T>) -> Self {
        DeltaNormalDiag { mu }
    }

    pub fn with_dim(d: usize) -> Self {
        DeltaNormalDiag { mu: Array1::zeros(d) }
    }
}

impl<T: Scalar> DeltaDistribution<T> for DeltaNormalDiag<T> {
    type Sample = Array1<T>;

    fn dim(&self) -> usize {
        self.mu.len()
    }

    fn location(&self) -> &Array1<T> {
        &self.mu
    }

    fn update(&mut self, eta: ArrayView1<'_, T>) -> ExpFamResult<()> {
        let (mean, _) = std_param_from(eta, self.dim()).inspect_err(|err| {
            log::warn!("delta normal_diag: rejected natural parameter: {err}");
        })?;
        self.mu = mean;
        Ok(())
    }

    fn stats(&self, x: &Array1<T>) -> ExpFamResult<Array1<T>> {
        check_len(self.dim(), x.len())?;
        Ok(concat(x.view(), x.mapv(|v| v * v).view()))
    }

    fn grad_log_norm(&self) -> Array1<T> {
        concat(self.mu.view(), self.mu.mapv(|v| v * v).view())
    }
}
