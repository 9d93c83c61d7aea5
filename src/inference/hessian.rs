//! inference::hessian — observed-information standard errors.
//!
//! Purpose
//! -------
//! Turn a gradient map of an average cost into per-parameter standard errors:
//! differentiate the gradient once more with finite differences to get the
//! observed information `J(θ̂)`, then read the diagonal of its pseudoinverse.
//!
//! Key behaviors
//! -------------
//! - [`compute_hessian`] (central differences, forward fallback, then
//!   symmetrized) builds `J(θ̂)` from `f: θ ↦ ∇c(θ)`.
//! - The `ndarray` matrix is copied into a `nalgebra::DMatrix` and
//!   decomposed with `symmetric_eigen`; no explicit inverse is formed.
//! - Eigenvalues at or below [`EIGEN_EPS`] are dropped, so weakly identified
//!   directions contribute nothing instead of exploding.
//!
//! Conventions
//! -----------
//! - `f` is the gradient of the **cost** (negative average log-likelihood),
//!   so `J(θ̂)` is positive semi-definite near a maximum of `ℓ`.
//! - Results are on the same scale as `f`; callers rescale for totals.
//! - Errors are reported via [`OptResult<T>`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{Grad, Theta, finite_diff::compute_hessian},
    numerical_stability::transformations::EIGEN_EPS,
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Standard errors of `θ̂` from the observed information of a cost gradient.
///
/// `Var(θ̂_i) = Σ_{k: λ_k > EIGEN_EPS} Q[i,k]² / λ_k`, where `J = Q Λ Qᵀ`.
///
/// # Errors
/// - Any error from [`compute_hessian`], e.g. a non-finite Hessian when the
///   gradient map returns NaN.
///
/// # Example
/// ```rust
/// # use ndarray::array;
/// # use rust_pointprocess::inference::hessian::calc_standard_errors;
/// let a = array![[4.0, 0.0], [0.0, 1.0]];
/// let f = |theta: &ndarray::Array1<f64>| a.dot(theta);
/// let se = calc_standard_errors(&f, &array![1.0, -1.0]).unwrap();
/// assert!((se[0] - 0.5).abs() < 1e-6);
/// assert!((se[1] - 1.0).abs() < 1e-6);
/// ```
pub fn calc_standard_errors<F: Fn(&Theta) -> Grad>(f: &F, theta_hat: &Theta) -> OptResult<Array1<f64>> {
    let obs_info = compute_hessian(f, theta_hat)?;
    Ok(pinv_diagonal(to_dmatrix(&obs_info)).mapv(f64::sqrt))
}

fn to_dmatrix(obs_info: &Array2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(obs_info.nrows(), obs_info.ncols(), |i, j| obs_info[[i, j]])
}

/// Diagonal of the eigen-truncated pseudoinverse of a symmetric matrix.
fn pinv_diagonal(obs_info: DMatrix<f64>) -> Array1<f64> {
    let n = obs_info.nrows();
    let eigen = obs_info.symmetric_eigen();
    let (q, eigenvals) = (eigen.eigenvectors, eigen.eigenvalues);
    Array1::from_shape_fn(n, |i| {
        eigenvals
            .iter()
            .enumerate()
            .filter(|(_, lambda)| **lambda > EIGEN_EPS)
            .map(|(k, &lambda)| q[(i, k)] * q[(i, k)] / lambda)
            .sum()
    })
}
