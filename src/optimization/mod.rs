//! optimization — MLE stack, numerical helpers, and unified error surface.
//!
//! Purpose
//! -------
//! Provide a cohesive optimization layer for model fitting, combining an
//! Argmin-backed log-likelihood optimizer, numerically stable parameter
//! transforms, and a single error/result surface. Callers implement a
//! log-likelihood, choose a step size and stopping rules, and obtain fitted
//! parameters and diagnostics without touching backend solver details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **maximizing log-likelihoods** `ℓ(θ)`
//!   (`loglik_optimizer`): one-step updates for mini-batch training and
//!   iterate-to-tolerance runs for full-batch fits.
//! - Supply shared numerical primitives (`numerical_stability`) for mapping
//!   unconstrained parameters into strictly positive model space.
//! - Normalize configuration issues, numerical failures, model failures,
//!   and backend solver errors into a single enum (`errors::OptError`) with a
//!   common result alias (`OptResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimizers operate in an unconstrained parameter space `θ` and assume
//!   that inputs are finite once validation has passed; invalid states are
//!   reported as `OptError`, not panics.
//! - Model failures (e.g. a non-positive intensity) travel through argmin
//!   unchanged and abort the run.
//!
//! Conventions
//! -----------
//! - All solvers conceptually maximize `ℓ(θ)` by minimizing an internal cost
//!   `c(θ) = -ℓ(θ)`; user-facing APIs and outcomes are expressed in terms
//!   of `ℓ`.
//! - Parameters, gradients, and Hessians are `ndarray` aliases (`Theta`,
//!   `Grad`, `Hessian`).
//! - Logging is limited to `tracing::debug!` of the starting point when
//!   `verbose` is set; reporting progress is the caller's job.
//!
//! Downstream usage
//! ----------------
//! - Model code implements `LogLikelihood` and calls `ascent_step` or
//!   `maximize` with a parameter vector, data payload, and `MLEOptions`.
//! - Inference code reuses `loglik_optimizer::finite_diff::compute_hessian`
//!   and `numerical_stability::EIGEN_EPS`.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; the Hawkes integration tests
//!   exercise the full stack.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_pointprocess::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
