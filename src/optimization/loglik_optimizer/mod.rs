//! loglik_optimizer — MLE-friendly, argmin-powered log-likelihood optimizer.
//!
//! Purpose
//! -------
//! Provide a high-level, Argmin-backed optimization layer for **maximizing
//! log-likelihoods** `ℓ(θ)`. Callers implement a single trait,
//! [`LogLikelihood`], and invoke [`maximize`] (iterate to tolerance) or
//! [`ascent_step`] (exactly one update, as used by mini-batch training).
//!
//! Key behaviors
//! -------------
//! - Convert user-supplied log-likelihoods `ℓ(θ)` into Argmin-compatible
//!   cost functions `c(θ) = -ℓ(θ)` via [`adapter::ArgMinAdapter`].
//! - Run a fixed-step gradient-descent solver ([`descent::FixedStepDescent`])
//!   built from [`MLEOptions`] by [`builders`] and executed by
//!   [`run::run_descent`].
//! - Fall back to finite differences ([`finite_diff`]) when the model has no
//!   analytic gradient.
//! - Centralize configuration ([`Tolerances`], [`MLEOptions`]) and validation
//!   logic ([`validation`]) so downstream code can assume sane, finite inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - The optimizer **always maximizes** `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`;
//!   user code implements `ℓ(θ)` and `∇ℓ(θ)`, **never** the cost directly.
//! - [`LogLikelihood::value`] and [`LogLikelihood::grad`] report invalid
//!   inputs as recoverable [`OptError`](crate::optimization::errors::OptError)
//!   values, not panics.
//! - Configuration types are validated on construction.
//!
//! Conventions
//! -----------
//! - Parameters live in an unconstrained space as [`Theta`]; any mapping to
//!   constrained model parameters happens in the model layer.
//! - Diagnostics (including [`OptimOutcome::value`]) are expressed in terms
//!   of `ℓ`, never the cost.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover sign conventions ([`adapter`]), the
//!   update rule and stopping rules ([`descent`]), option wiring
//!   ([`builders`]), outcome reporting ([`run`], [`api`]), and
//!   finite-difference validation ([`finite_diff`], [`validation`]).
//! - The Hawkes trainer exercises [`ascent_step`] end to end.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod descent;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::{ascent_step, maximize};
pub use self::traits::{
    DEFAULT_LEARNING_RATE, LogLikelihood, MLEOptions, OptimOutcome, Tolerances,
};
pub use self::types::{Cost, FnEvalMap, Grad, Theta};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::api::{ascent_step, maximize};
    pub use super::traits::{LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
