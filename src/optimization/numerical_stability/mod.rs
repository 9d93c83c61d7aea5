//! numerical_stability — numerically robust parameter transforms.
//!
//! Purpose
//! -------
//! Collect the stable scalar transforms that map the unconstrained optimizer
//! vector onto strictly positive model parameters, plus the shared eigenvalue
//! tolerance used by inference.
//!
//! Key behaviors
//! -------------
//! - `safe_softplus` / `safe_softplus_inv` map ℝ ↔ (0, ∞) without
//!   overflow or catastrophic cancellation.
//! - `safe_logistic` supplies the softplus derivative for chain-rule
//!   gradients and delta-method standard errors.
//!
//! Conventions
//! -----------
//! - Pure functions over `f64`; no logging, I/O, or global state.
//! - Domain validation (positivity, finiteness) happens in the model layer.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{EIGEN_EPS, safe_logistic, safe_softplus, safe_softplus_inv};

pub mod prelude {
    pub use super::transformations::{EIGEN_EPS, safe_logistic, safe_softplus, safe_softplus_inv};
}
