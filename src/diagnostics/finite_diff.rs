//! diagnostics::finite_diff — central-difference checks of analytic derivatives.
//!
//! Purpose
//! -------
//! Approximate `∇A(η)` and `∂ξ/∂η` numerically and compare them against the
//! closed forms exposed by [`ExpFamily::grad_log_norm`] and
//! [`Parameter::jacobian`].
//!
//! Key behaviors
//! -------------
//! - The objective handed to `finitediff` clones the distribution, applies
//!   the perturbed η through `update`, and returns `log_norm`.
//! - `finitediff` closures must return plain `f64`, so any error raised by a
//!   perturbed `update` is captured in a shared `RefCell` slot and the
//!   closure returns `NaN`. The first captured error is returned after the
//!   difference pass.
//!
//! Invariants & assumptions
//! ------------------------
//! - The η being differentiated must lie in the interior of the natural
//!   parameter space so that the ±h perturbations stay valid.
//! - Matrix blocks of η are perturbed one entry at a time. Updates
//!   symmetrize those blocks, so each off-diagonal entry receives half of
//!   the symmetric derivative, which is exactly what the analytic gradient
//!   reports at a symmetric point.
use crate::{
    distributions::ExpFamily,
    errors::{ExpFamError, ExpFamResult},
    parameter::Parameter,
};
use finitediff::FiniteDiff;
use ndarray::{Array1, Array2, ArrayView1};
use std::cell::RefCell;

/// Central-difference gradient of `log_norm` with respect to η.
///
/// Errors
/// ------
/// - The first error raised by `update` at a perturbed η.
pub fn fd_grad_log_norm<D>(dist: &D) -> ExpFamResult<Array1<f64>>
where
    D: ExpFamily<f64> + Clone,
{
    let eta = dist.natural_param();
    let closure_err: RefCell<Option<ExpFamError>> = RefCell::new(None);
    let log_norm_at = |eta: &Array1<f64>| -> f64 {
        let mut probe = dist.clone();
        match probe.update(eta.view()) {
            Ok(()) => probe.log_norm(),
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                f64::NAN
            }
        }
    };
    let grad = eta.central_diff(&log_norm_at);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    Ok(grad)
}

/// Compare `grad_log_norm` with [`fd_grad_log_norm`].
///
/// Returns the largest relative deviation `|a − n| / max(1, |a|)`.
///
/// Errors
/// ------
/// - `ExpFamError::GradientCheckFailed` at the first component whose
///   deviation exceeds `tol` (or is not finite).
/// - Any error raised while differencing.
pub fn check_grad_log_norm<D>(dist: &D, tol: f64) -> ExpFamResult<f64>
where
    D: ExpFamily<f64> + Clone,
{
    let numeric = fd_grad_log_norm(dist)?;
    let analytic = dist.grad_log_norm();
    let worst = compare(analytic.view(), numeric.view(), tol)?;
    log::debug!("gradient check passed: max relative deviation {worst:.3e}");
    Ok(worst)
}

/// Central-difference Jacobian `∂ξ/∂η` of a parameter at its current value.
///
/// Entry `(i, j)` is `∂ξᵢ/∂ηⱼ`, obtained by differencing the map
/// `η ↦ P::from_natural(η).real_form()` once per component of ξ.
pub fn fd_jacobian<P: Parameter<f64>>(param: &P) -> ExpFamResult<Array2<f64>> {
    let eta = param.natural_form();
    let n = eta.len();
    let closure_err: RefCell<Option<ExpFamError>> = RefCell::new(None);
    let mut jac = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        let component = |eta: &Array1<f64>| -> f64 {
            match P::from_natural(eta.clone()) {
                Ok(p) => p.real_form()[i],
                Err(e) => {
                    closure_err.borrow_mut().get_or_insert(e);
                    f64::NAN
                }
            }
        };
        jac.row_mut(i).assign(&eta.central_diff(&component));
    }
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    Ok(jac)
}

/// Compare `jacobian` with [`fd_jacobian`] entry by entry (row-major order).
pub fn check_jacobian<P: Parameter<f64>>(param: &P, tol: f64) -> ExpFamResult<f64> {
    let numeric = fd_jacobian(param)?;
    let analytic = param.jacobian();
    let analytic: Array1<f64> = analytic.iter().copied().collect();
    let numeric: Array1<f64> = numeric.iter().copied().collect();
    compare(analytic.view(), numeric.view(), tol)
}

fn compare(
    analytic: ArrayView1<'_, f64>, numeric: ArrayView1<'_, f64>, tol: f64,
) -> ExpFamResult<f64> {
    if analytic.len() != numeric.len() {
        return Err(ExpFamError::DimensionMismatch {
            expected: analytic.len(),
            actual: numeric.len(),
        });
    }
    let mut worst = 0.0_f64;
    for (index, (&a, &n)) in analytic.iter().zip(numeric.iter()).enumerate() {
        let dev = (a - n).abs() / a.abs().max(1.0);
        if !dev.is_finite() || dev > tol {
            return Err(ExpFamError::GradientCheckFailed { index, analytic: a, numeric: n });
        }
        worst = worst.max(dev);
    }
    Ok(worst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        distributions::{Dirichlet, Normal},
        numerical_stability::FD_REL_TOL,
        parameter::{DefaultParameter, SoftplusParameter},
    };
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - the finite-difference gradient on a closed-form case,
    // - error capture when a perturbed update leaves the parameter space,
    // - detection of a wrong analytic derivative,
    // - Jacobian checks for the identity and softplus parameters.
    //
    // Per-distribution gradient checks live next to each distribution.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The numeric gradient of a Dirichlet log-normalizer matches digammas.
    //
    // Given
    // -----
    // - α = [2, 5].
    //
    // Expect
    // ------
    // - `check_grad_log_norm` succeeds with deviation below `FD_REL_TOL`.
    fn dirichlet_gradient_passes() {
        let d = Dirichlet::new(array![2.0_f64, 5.0]).unwrap();
        let worst = check_grad_log_norm(&d, FD_REL_TOL).unwrap();
        assert!(worst < FD_REL_TOL);
        assert_eq!(fd_grad_log_norm(&d).unwrap().len(), 2);
    }

    #[test]
    // Purpose
    // -------
    // Errors raised by perturbed updates surface instead of a NaN gradient.
    //
    // Given
    // -----
    // - α = [1e-12, 1]; the backward step on α₁ leaves the positive orthant.
    //
    // Expect
    // ------
    // - `fd_grad_log_norm` returns `InvalidArgument`.
    fn perturbed_update_error_is_captured() {
        let d = Dirichlet::new(array![1e-12_f64, 1.0]).unwrap();
        let err = fd_grad_log_norm(&d).unwrap_err();
        assert!(matches!(err, ExpFamError::InvalidArgument { name: "alpha", .. }));
    }

    #[test]
    fn mismatching_gradients_are_reported() {
        let err = compare(array![1.0, 2.0].view(), array![1.0, 2.5].view(), 1e-4).unwrap_err();
        assert!(matches!(err, ExpFamError::GradientCheckFailed { index: 1, .. }));
        assert!(compare(array![1.0].view(), array![1.0, 2.0].view(), 1e-4).is_err());
    }

    #[test]
    // Purpose
    // -------
    // A full-covariance Normal passes even though its precision block is
    // perturbed one (asymmetric) entry at a time.
    //
    // Given
    // -----
    // - μ = [0.5, 1], Σ = [[1, 0.4], [0.4, 2]].
    //
    // Expect
    // ------
    // - Check succeeds.
    fn normal_gradient_passes() {
        let n = Normal::new(array![0.5_f64, 1.0], array![[1.0, 0.4], [0.4, 2.0]]).unwrap();
        check_grad_log_norm(&n, FD_REL_TOL).unwrap();
    }

    #[test]
    fn parameter_jacobians_match() {
        let identity = DefaultParameter::new(array![0.3_f64, -1.0, 4.0]);
        check_jacobian(&identity, FD_REL_TOL).unwrap();
        let softplus = SoftplusParameter::from_natural(array![0.3_f64, 1.7, 25.0]).unwrap();
        check_jacobian(&softplus, FD_REL_TOL).unwrap();
        let jac = fd_jacobian(&softplus).unwrap();
        assert!(jac[[0, 1]].abs() < 1e-8);
    }
}
