//! Integration tests for the exponential-family algebra.
//!
//! Purpose
//! -------
//! - Validate the properties every family must share through the public
//!   API only: the natural ↔ standard round trip, idempotent self-updates,
//!   and the gradient identity `∇A(η) = E[T(x)]`.
//! - Check the point-mass families as limits of their stochastic
//!   counterparts, and parameter persistence through dicts and JSON.
//!
//! Coverage
//! --------
//! - `distributions`: Dirichlet, Wishart, Normal, NormalDiag with default and
//!   softplus parameter storage, `f64` and `f32` encodings.
//! - `delta`: δ-Dirichlet, δ-Wishart, δ-Normal, δ-NormalDiag updates driven
//!   by stochastic natural parameters.
//! - `parameter`: `to_dict` / `from_dict`, `transport`.
//! - `diagnostics::finite_diff`: gradient and Jacobian checks.
//!
//! Exclusions
//! ----------
//! - Closed-form edge cases of single families and error-path details;
//!   those are covered by the unit tests next to each module.
use approx::assert_relative_eq;
use ndarray::{Array1, Array2, array};
use rust_expfamily::{
    DefaultParameter, DeltaDirichlet, DeltaDistribution, DeltaNormal, DeltaNormalDiag,
    DeltaWishart, Dirichlet, ExpFamError, ExpFamily, Normal, NormalDiag, Parameter,
    SoftplusParameter, Wishart,
    diagnostics::{check_grad_log_norm, check_jacobian},
    numerical_stability::FD_REL_TOL,
};
use serde_json::Value;
use statrs::function::gamma::ln_gamma;
use std::f64::consts::PI;

/// Purpose
/// -------
/// Assert two equally long sequences agree entry by entry.
///
/// Parameters
/// ----------
/// - `a`, `b`: values to compare, in the same iteration order.
/// - `eps`: absolute tolerance per entry.
fn assert_all_close<'a>(
    a: impl IntoIterator<Item = &'a f64>, b: impl IntoIterator<Item = &'a f64>, eps: f64,
) {
    let a: Vec<f64> = a.into_iter().copied().collect();
    let b: Vec<f64> = b.into_iter().copied().collect();
    assert_eq!(a.len(), b.len(), "length mismatch");
    for (i, (x, y)) in a.iter().zip(&b).enumerate() {
        assert!((x - y).abs() <= eps, "entry {i}: {x} vs {y}");
    }
}

/// Purpose
/// -------
/// A small, well-conditioned SPD matrix family indexed by `k` so that tests
/// can loop over several distinct scale/covariance matrices.
fn spd(k: usize) -> Array2<f64> {
    let c = 0.1 * k as f64;
    array![[1.0 + c, 0.3 - c, 0.1], [0.3 - c, 2.0, 0.2 * c], [0.1, 0.2 * c, 0.5 + c]]
}

#[test]
// Purpose
// -------
// Reproduce the reference closed-form values listed for each family.
//
// Given
// -----
// - `Dirichlet([1, 2, 3])`, `Normal([0, 0])`, `Wishart(I₂, 2)`,
//   `δDirichlet([0.5, 0.5])` and `δDirichlet([0.4, 0.5])`.
//
// Expect
// ------
// - Dirichlet log-normalizer and mean match their closed forms.
// - The standard normal has `log_norm == 0` and `h(x) = −ln 2π`.
// - Wishart `std_param_from` recovers `W ≈ I`, `v ≈ 2`.
// - The δ-Dirichlet accepts the first location and rejects the second.
fn reference_values() {
    let d = Dirichlet::new(array![1.0, 2.0, 3.0]).expect("valid concentration");
    let expected = ln_gamma(1.0) + ln_gamma(2.0) + ln_gamma(3.0) - ln_gamma(6.0);
    assert_relative_eq!(d.log_norm(), expected, max_relative = 1e-12);
    assert_all_close(d.mean().iter(), array![1.0 / 6.0, 2.0 / 6.0, 3.0 / 6.0].iter(), 1e-12);

    let n = Normal::from_mean(array![0.0, 0.0]).expect("identity covariance");
    assert_eq!(n.log_norm(), 0.0);
    assert_relative_eq!(n.base_measure(&array![1.0, 2.0]).unwrap(), -(2.0 * PI).ln());
    assert!(matches!(
        n.stats(&array![1.0, 2.0, 3.0]),
        Err(ExpFamError::DimensionMismatch { expected: 2, actual: 3 })
    ));

    let w = Wishart::new(Array2::eye(2), 2.0).expect("valid Wishart");
    let (scale, dof) = Wishart::<f64>::std_param_from(w.natural_param().view(), 2).unwrap();
    assert_all_close(scale.iter(), Array2::<f64>::eye(2).iter(), 1e-12);
    assert_relative_eq!(dof, 2.0, max_relative = 1e-12);

    assert!(DeltaDirichlet::new(array![0.5, 0.5]).is_ok());
    assert!(matches!(
        DeltaDirichlet::new(array![0.4, 0.5]),
        Err(ExpFamError::InvalidArgument { .. })
    ));
}

#[test]
// Purpose
// -------
// Natural and standard parameterizations are mutual inverses for every
// family, over several parameter values.
//
// Given
// -----
// - Three SPD matrices from `spd(k)`, matching means, variances, and
//   concentrations.
//
// Expect
// ------
// - Rebuilding each distribution from `natural_param()` reproduces its
//   standard parameters within 1e-10.
fn natural_standard_round_trip_all_families() {
    for k in 0..3 {
        let shift = k as f64;
        let alpha = array![0.5 + shift, 1.5, 3.0 + 0.5 * shift];
        let dir = Dirichlet::new(alpha.clone()).unwrap();
        let back = Dirichlet::<f64>::from_natural(dir.natural_param()).unwrap();
        assert_all_close(back.std_param().iter(), alpha.iter(), 1e-12);

        let mean = array![shift, -1.0, 0.5];
        let normal = Normal::new(mean.clone(), spd(k)).unwrap();
        let back = Normal::<f64>::from_natural(normal.natural_param(), 3).unwrap();
        let (mu, sigma) = back.std_param();
        assert_all_close(mu.iter(), mean.iter(), 1e-10);
        assert_all_close(sigma.iter(), spd(k).iter(), 1e-10);

        let var = array![0.5, 1.0 + shift, 2.0];
        let diag = NormalDiag::new(mean.clone(), var.clone()).unwrap();
        let back = NormalDiag::<f64>::from_natural(diag.natural_param(), 3).unwrap();
        let (mu, v) = back.std_param();
        assert_all_close(mu.iter(), mean.iter(), 1e-12);
        assert_all_close(v.iter(), var.iter(), 1e-12);

        let wishart = Wishart::new(spd(k), 3.5 + shift).unwrap();
        let back = Wishart::<f64>::from_natural(wishart.natural_param(), 3).unwrap();
        let (scale, dof) = back.std_param();
        assert_all_close(scale.iter(), spd(k).iter(), 1e-10);
        assert_relative_eq!(dof, 3.5 + shift, max_relative = 1e-12);
    }
}

#[test]
// Purpose
// -------
// `grad_log_norm` equals the finite-difference gradient of `log_norm` for
// every family and both parameter storages.
//
// Given
// -----
// - One instance of each family with default storage, plus a
//   softplus-stored Dirichlet.
//
// Expect
// ------
// - `check_grad_log_norm` succeeds at `FD_REL_TOL` for all of them.
fn gradient_identity_all_families() {
    let dir = Dirichlet::new(array![0.8, 2.0, 4.5]).unwrap();
    check_grad_log_norm(&dir, FD_REL_TOL).expect("dirichlet gradient");

    let sp_dir =
        Dirichlet::<f64, SoftplusParameter<f64>>::from_natural(array![0.8, 2.0, 4.5]).unwrap();
    check_grad_log_norm(&sp_dir, FD_REL_TOL).expect("softplus dirichlet gradient");

    let normal = Normal::new(array![0.2, -0.4, 1.0], spd(1)).unwrap();
    check_grad_log_norm(&normal, FD_REL_TOL).expect("normal gradient");

    let diag = NormalDiag::new(array![0.2, -0.4], array![0.7, 1.9]).unwrap();
    check_grad_log_norm(&diag, FD_REL_TOL).expect("diagonal normal gradient");

    let wishart = Wishart::new(spd(2), 4.0).unwrap();
    check_grad_log_norm(&wishart, FD_REL_TOL).expect("wishart gradient");
}

#[test]
// Purpose
// -------
// `mean()` agrees with the first-moment block of `grad_log_norm`.
//
// Given
// -----
// - A Normal, a NormalDiag, and a Wishart.
//
// Expect
// ------
// - Normal / NormalDiag: the first `D` gradient entries equal `mean()`.
// - Wishart: the matrix block of the gradient equals `mean() = v W`.
fn mean_matches_first_moment_block() {
    let normal = Normal::new(array![1.0, 2.0, -3.0], spd(0)).unwrap();
    let (first, _) = normal.split_grad(normal.grad_log_norm().view()).unwrap();
    assert_all_close(first.iter(), normal.mean().iter(), 1e-14);

    let diag = NormalDiag::new(array![1.0, -2.0], array![0.5, 3.0]).unwrap();
    let (first, _) = diag.split_grad(diag.grad_log_norm().view()).unwrap();
    assert_all_close(first.iter(), diag.mean().iter(), 1e-14);

    let wishart = Wishart::new(spd(1), 5.0).unwrap();
    let (block, _) = wishart.split_grad(wishart.grad_log_norm().view()).unwrap();
    assert_all_close(block.iter(), wishart.mean().iter(), 1e-12);
}

#[test]
// Purpose
// -------
// `update(natural_param())` leaves every family unchanged.
//
// Given
// -----
// - One instance of each family.
//
// Expect
// ------
// - `log_norm` and `grad_log_norm` are identical (to round-off) after the
//   self-update.
fn self_update_is_idempotent() {
    fn check<D: ExpFamily<f64> + Clone>(mut dist: D) {
        let before = dist.clone();
        dist.update(before.natural_param().view()).expect("self-update");
        assert_relative_eq!(dist.log_norm(), before.log_norm(), max_relative = 1e-10);
        assert_all_close(dist.grad_log_norm().iter(), before.grad_log_norm().iter(), 1e-10);
    }
    check(Dirichlet::new(array![0.3, 7.0]).unwrap());
    check(Normal::new(array![0.0, 1.0, 2.0], spd(2)).unwrap());
    check(NormalDiag::new(array![0.0, 1.0], array![4.0, 0.25]).unwrap());
    check(Wishart::new(spd(0), 3.0).unwrap());
}

#[test]
// Purpose
// -------
// Each δ family is the zero-spread limit of its stochastic counterpart.
//
// Given
// -----
// - Stochastic distributions whose mode or mean is a known location.
//
// Expect
// ------
// - Updating the δ family with their η moves it to that location.
// - For a Normal with covariance `s·I`, the stochastic gradient differs from
//   the δ-Normal gradient only by `s` on the diagonal of the second block.
fn delta_families_track_their_stochastic_limits() {
    let mut dd = DeltaDirichlet::<f64>::with_dim(3);
    dd.update(array![2.0, 3.0, 5.0].view()).unwrap();
    assert_all_close(dd.location().iter(), array![1.0 / 7.0, 2.0 / 7.0, 4.0 / 7.0].iter(), 1e-12);
    assert!(matches!(
        dd.update(array![0.5, 3.0, 2.0].view()),
        Err(ExpFamError::InvalidArgument { .. })
    ));

    let mu = array![0.5, -1.5];
    let s = 1e-3;
    let normal = Normal::new(mu.clone(), Array2::eye(2) * s).unwrap();
    let mut dn = DeltaNormal::<f64>::with_dim(2);
    dn.update(normal.natural_param().view()).unwrap();
    assert_all_close(dn.location().iter(), mu.iter(), 1e-10);
    let diff = &normal.grad_log_norm() - &dn.grad_log_norm();
    assert_all_close(diff.iter(), array![0.0, 0.0, s, 0.0, 0.0, s].iter(), 1e-9);

    let diag = NormalDiag::new(mu.clone(), array![s, s]).unwrap();
    let mut ddiag = DeltaNormalDiag::<f64>::with_dim(2);
    ddiag.update(diag.natural_param().view()).unwrap();
    assert_all_close(ddiag.location().iter(), mu.iter(), 1e-12);

    let wishart = Wishart::new(spd(1), 7.0).unwrap();
    let mut dw = DeltaWishart::<f64>::with_dim(3);
    dw.update(wishart.natural_param().view()).unwrap();
    let mode = spd(1) * (7.0 - 3.0 - 1.0);
    assert_all_close(dw.location().iter(), mode.iter(), 1e-10);
}

#[test]
// Purpose
// -------
// Parameter storage persists through dicts and JSON text and rebuilds an
// equivalent distribution.
//
// Given
// -----
// - A Normal with default storage and a Dirichlet with softplus storage.
//
// Expect
// ------
// - `from_dict(to_dict())` reproduces the stored vector exactly.
// - The JSON text round trip preserves `log_norm`.
// - A dict without `"xi"` fails with `MissingField`.
fn parameter_persistence_round_trip() {
    let normal = Normal::new(array![1.0, 0.0, -1.0], spd(0)).unwrap();
    let dict = normal.parameter().to_dict();
    let restored = DefaultParameter::<f64>::from_dict(&dict).unwrap();
    assert_eq!(&restored, normal.parameter());

    let text = serde_json::to_string(&Value::Object(dict)).unwrap();
    let parsed: Value = serde_json::from_str(&text).unwrap();
    let reparsed = DefaultParameter::<f64>::from_dict(parsed.as_object().unwrap()).unwrap();
    let rebuilt = Normal::<f64>::from_natural(reparsed.natural_form(), 3).unwrap();
    assert_relative_eq!(rebuilt.log_norm(), normal.log_norm(), max_relative = 1e-12);

    let dir = Dirichlet::<f64, SoftplusParameter<f64>>::from_natural(array![0.5, 2.0]).unwrap();
    let restored = SoftplusParameter::<f64>::from_dict(&dir.parameter().to_dict()).unwrap();
    assert_eq!(restored.real_form(), dir.parameter().real_form());

    let empty = rust_expfamily::Dict::new();
    assert!(matches!(
        SoftplusParameter::<f64>::from_dict(&empty),
        Err(ExpFamError::MissingField { field: "xi" })
    ));
}

#[test]
// Purpose
// -------
// A natural-space step transported into storage space and applied there
// lands where the same step applied in natural space would, to first order.
//
// Given
// -----
// - A softplus-stored Dirichlet with α = [1.2, 0.6, 3.0] and a small step.
//
// Expect
// ------
// - `softplus(ξ + J·dη) ≈ α + dη` within 1e-6; the Jacobian passes the
//   finite-difference check.
fn transported_steps_agree_to_first_order() {
    let dir =
        Dirichlet::<f64, SoftplusParameter<f64>>::from_natural(array![1.2, 0.6, 3.0]).unwrap();
    let param = dir.parameter();
    check_jacobian(param, FD_REL_TOL).expect("softplus jacobian");

    let step = array![1e-4, -2e-4, 5e-5];
    let moved_xi = &param.real_form() + &param.transport(step.view()).unwrap();
    let moved = SoftplusParameter::from_real(moved_xi);
    let target: Array1<f64> = &dir.natural_param() + &step;
    assert_all_close(moved.natural_form().iter(), target.iter(), 1e-6);
}

#[test]
// Purpose
// -------
// Reallocating to `f32` keeps every family usable and numerically close.
//
// Given
// -----
// - `f64` Dirichlet, Normal, NormalDiag, and Wishart instances.
//
// Expect
// ------
// - The `f32` copies report `log_norm` within single-precision tolerance.
fn reallocation_to_single_precision() {
    let dir = Dirichlet::new(array![1.0, 2.0, 3.0]).unwrap();
    let dir32: Dirichlet<f32> = dir.reallocate();
    assert_relative_eq!(dir32.log_norm() as f64, dir.log_norm(), max_relative = 1e-5);

    let normal = Normal::new(array![0.1, 0.2, 0.3], spd(1)).unwrap();
    let normal32: Normal<f32> = normal.reallocate();
    assert_relative_eq!(normal32.log_norm() as f64, normal.log_norm(), max_relative = 1e-5);

    let diag = NormalDiag::new(array![0.1, 0.2], array![0.3, 0.4]).unwrap();
    let diag32: NormalDiag<f32> = diag.reallocate();
    assert_relative_eq!(diag32.log_norm() as f64, diag.log_norm(), max_relative = 1e-5);

    let wishart = Wishart::new(spd(0), 4.0).unwrap();
    let wishart32: Wishart<f32> = wishart.reallocate();
    assert_relative_eq!(wishart32.log_norm() as f64, wishart.log_norm(), max_relative = 1e-5);
}
