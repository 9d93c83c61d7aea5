//! loglik_optimizer::finite_diff — finite-difference gradient and Hessian helpers.
//!
//! Purpose
//! -------
//! Provide finite-difference gradient and Hessian approximations around a
//! parameter vector, together with validation and symmetry cleanup, so that
//! the rest of the optimizer can request derivatives without depending
//! directly on the `finitediff` API.
//!
//! Key behaviors
//! -------------
//! - Compute forward-difference gradients with error capture and post-hoc
//!   validation via [`run_fd_diff`] (the adapter's fallback path).
//! - Construct central-difference Hessians, falling back to forward
//!   differences when validation fails, via [`compute_hessian`].
//! - Enforce symmetry of Hessian matrices in-place.
//!
//! Invariants & assumptions
//! ------------------------
//! - Any error raised by the objective during finite differencing is routed
//!   into the shared `closure_err` cell and treated as a hard failure.
//! - Returned gradients and Hessians satisfy [`validate_grad`] and
//!   [`validate_hessian`].
//!
//! Conventions
//! -----------
//! - Differences are taken with respect to the unconstrained vector `Theta`;
//!   reparameterization (softplus) is handled by the model layer.
//!
//! Testing notes
//! -------------
//! - Unit tests cover successful and failing paths for gradient and Hessian
//!   validation plus the in-place symmetrization.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, Theta,
        types::Hessian,
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Forward-difference gradient of `func` at `theta`, with error capture.
///
/// `func` is expected to park any evaluation error in `closure_err` and
/// return `NaN`. The cell is cleared on entry and inspected afterwards.
///
/// # Errors
/// - The captured error, converted through `From<argmin::core::Error>`.
/// - `OptError::GradientDimMismatch` / `OptError::InvalidGradient` from
///   [`validate_grad`].
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

/// Finite-difference Hessian of a gradient map `f` at `theta`.
///
/// Central differences are tried first; on any validation failure the
/// forward-difference Hessian is computed and validated instead. The
/// accepted matrix is symmetrized before it is returned.
///
/// # Errors
/// - `OptError::HessianDimMismatch` / `OptError::InvalidHessian` when the
///   forward-difference fallback also fails validation.
///
/// # Examples
/// ```rust
/// # use ndarray::Array1;
/// # use rust_pointprocess::optimization::loglik_optimizer::Theta;
/// # use rust_pointprocess::optimization::loglik_optimizer::finite_diff::compute_hessian;
/// let grad_fn = |theta: &Theta| theta.mapv(|x| 2.0 * x);
/// let theta: Theta = Array1::from(vec![1.0_f64, 2.0]);
/// let hess = compute_hessian(&grad_fn, &theta).unwrap();
/// assert_eq!(hess.shape(), &[2, 2]);
/// ```
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut hess = theta.central_hessian(f);
    if validate_hessian(&hess, dim).is_err() {
        hess = theta.forward_hessian(f);
        validate_hessian(&hess, dim)?;
    }
    symmetrize_hess(&mut hess);
    Ok(hess)
}

// ---- Helper methods ----

/// Average each off-diagonal pair `(i, j)` / `(j, i)`; the diagonal is kept.
fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}
