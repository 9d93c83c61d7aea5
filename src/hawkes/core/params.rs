//! Hawkes parameterization: model-space parameters and the optimizer-space
//! vector θ.
//!
//! ## Mapping conventions
//! - θ has layout `[μ, β, σx, σy]` and every slot is `softplus⁻¹` of the
//!   matching parameter, so any finite θ maps to strictly positive values.
//! - The Jacobian of `θ ↦ params` is diagonal with entries `logistic(θ_j)`;
//!   [`theta_jacobian`] returns that diagonal for the chain rule.
//!
//! ## Invariants validated by constructors
//! - `μ, β, σx, σy` finite and `> 0`
//! - `theta.len() == N_PARAMS` with finite entries
use crate::{
    hawkes::{
        core::validation::{validate_positive, validate_theta},
        errors::HawkesResult,
    },
    optimization::numerical_stability::transformations::{
        safe_logistic, safe_softplus, safe_softplus_inv,
    },
};
use ndarray::{Array1, ArrayView1};

/// Number of free parameters `(μ, β, σx, σy)`.
pub const N_PARAMS: usize = 4;

/// Parameter names in θ order, used for error messages and reports.
pub const PARAM_NAMES: [&str; N_PARAMS] = ["mu", "beta", "sigma_x", "sigma_y"];

/// Constrained model-space parameters of the spatio-temporal Hawkes process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HawkesParams {
    /// Base intensity μ > 0.
    pub mu: f64,
    /// Temporal decay β > 0.
    pub beta: f64,
    /// Spatial bandwidth along x, σx > 0.
    pub sigma_x: f64,
    /// Spatial bandwidth along y, σy > 0.
    pub sigma_y: f64,
}

impl HawkesParams {
    /// # Errors
    /// - [`HawkesError::InvalidParam`](crate::hawkes::errors::HawkesError::InvalidParam)
    ///   naming the first non-finite or non-positive value.
    pub fn new(mu: f64, beta: f64, sigma_x: f64, sigma_y: f64) -> HawkesResult<Self> {
        for (name, value) in PARAM_NAMES.iter().zip([mu, beta, sigma_x, sigma_y]) {
            validate_positive(name, value)?;
        }
        Ok(Self { mu, beta, sigma_x, sigma_y })
    }

    /// Starting point of a fresh training run: μ = 0.1, β = 1, σx = σy = 0.1.
    pub fn initial() -> Self {
        Self { mu: 0.1, beta: 1.0, sigma_x: 0.1, sigma_y: 0.1 }
    }

    /// Map an optimizer-space vector back to validated parameters.
    ///
    /// # Errors
    /// - `ThetaLengthMismatch` / `InvalidThetaInput` for malformed θ.
    /// - `InvalidParam` if softplus underflows to zero (θ far below −700).
    pub fn from_theta(theta: ArrayView1<'_, f64>) -> HawkesResult<Self> {
        validate_theta(theta, N_PARAMS)?;
        Self::new(
            safe_softplus(theta[0]),
            safe_softplus(theta[1]),
            safe_softplus(theta[2]),
            safe_softplus(theta[3]),
        )
    }

    /// Optimizer-space representation `θ_j = softplus⁻¹(param_j)`.
    pub fn to_theta(&self) -> Array1<f64> {
        self.to_array().mapv(safe_softplus_inv)
    }

    /// Parameters as `[μ, β, σx, σy]`.
    pub fn to_array(&self) -> Array1<f64> {
        Array1::from(vec![self.mu, self.beta, self.sigma_x, self.sigma_y])
    }
}

impl Default for HawkesParams {
    fn default() -> Self {
        Self::initial()
    }
}

/// Diagonal of `∂params/∂θ`, i.e. `logistic(θ_j)` per slot.
pub fn theta_jacobian(theta: ArrayView1<'_, f64>) -> Array1<f64> {
    theta.mapv(safe_logistic)
}
