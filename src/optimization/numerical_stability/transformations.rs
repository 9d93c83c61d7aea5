//! Numerical stability utilities.
//!
//! Safe implementations of the positivity transforms used to map the
//! unconstrained optimizer vector onto strictly positive model parameters.
//! Explicit cutoffs (`x > 20.0`, `x < -20.0`) keep `f64` arithmetic in a
//! well-conditioned regime.
//!
//! # Provided items
//! - [`safe_softplus(x)`]: `ln(1 + exp(x))`, ℝ → (0, ∞).
//! - [`safe_softplus_inv(x)`]: its inverse, (0, ∞) → ℝ.
//! - [`safe_logistic(x)`]: `1 / (1 + exp(-x))`, the derivative of softplus.
//! - [`EIGEN_EPS`]: eigenvalue floor for pseudo-inverses.

/// Eigenvalues at or below this magnitude are treated as zero when forming
/// pseudo-inverses of observed-information matrices.
pub const EIGEN_EPS: f64 = 1e-10;

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// - For `x > 20`, `softplus(x) ≈ x` to machine precision.
/// - Otherwise `ln1p(exp(x))`, which stays accurate for large negative `x`.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

/// Stable inverse of softplus on `(0, ∞)`: `t = ln(exp(x) - 1)`.
///
/// - For `x > 20`, `t ≈ x`.
/// - Otherwise `ln(expm1(x))`, avoiding cancellation for small `x`.
///
/// `x` must be finite and `> 0`; callers validate before mapping.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp_m1().ln() }
}

/// Numerically stable logistic `σ(x) = 1 / (1 + exp(-x))`.
///
/// Equals `d softplus(x) / dx`; used for the chain rule from parameter space
/// back to θ-space. Branches on the sign of `x` so `exp` never overflows.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}
