//! Validation helpers for log-likelihood optimization.
//!
//! This module centralizes common consistency checks used across the
//! optimizer interface:
//!
//! - **Option checks**: [`verify_tol_grad`], [`verify_tol_cost`] and
//!   [`verify_learning_rate`] ensure numeric settings are finite and strictly
//!   positive when provided.
//! - **Gradient validation**: [`validate_grad`] enforces correct dimension
//!   and finite entries.
//! - **Parameter estimates**: [`validate_theta_hat`] ensures a candidate
//!   `theta_hat` exists and contains only finite values.
//! - **Objective values**: [`validate_value`] checks log-likelihood outputs
//!   for finiteness.
//! - **Hessians**: [`validate_hessian`] checks shape and finiteness.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{Grad, Theta, types::Hessian},
};

/// Validate the optional gradient‐norm tolerance.
///
/// - Accepts `None` (no stopping rule on gradient).
/// - If `Some`, the value must be **finite** and **strictly positive**.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional cost‐change tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the fixed step size `η` of a descent update.
///
/// # Errors
/// Returns [`OptError::InvalidLearningRate`] if `η` is non-finite or ≤ 0.0.
pub fn verify_learning_rate(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::InvalidLearningRate {
            value,
            reason: "Learning rate must be finite.",
        });
    }
    if value <= 0.0 {
        return Err(OptError::InvalidLearningRate {
            value,
            reason: "Learning rate must be positive.",
        });
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index/value/reason of the first
///   offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector (`theta_hat`).
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let theta = theta_hat.ok_or(OptError::MissingThetaHat)?;
    if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::InvalidThetaHat {
            index,
            value,
            reason: "Parameter estimates must be finite.",
        });
    }
    Ok(theta)
}

/// Validate that a scalar log-likelihood value is finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

/// Validate the shape and entries of a Hessian matrix.
///
/// # Errors
/// - [`OptError::HessianDimMismatch`] if dimensions do not match `dim`.
/// - [`OptError::InvalidHessian`] if any entry is non-finite, with offending
///   row/col indices and value.
pub fn validate_hessian(hessian: &Hessian, dim: usize) -> OptResult<()> {
    if hessian.nrows() != dim || hessian.ncols() != dim {
        return Err(OptError::HessianDimMismatch {
            expected: dim,
            found: (hessian.nrows(), hessian.ncols()),
        });
    }
    for ((i, j), &value) in hessian.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidHessian { row: i, col: j, value });
        }
    }
    Ok(())
}
