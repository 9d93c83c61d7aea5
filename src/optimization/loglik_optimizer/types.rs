//! loglik_optimizer::types — shared numeric aliases.
//!
//! Purpose
//! -------
//! Centralize the core numeric types used by the log-likelihood optimizer so
//! the rest of the optimization code can stay agnostic to `ndarray` and
//! Argmin generics.
//!
//! Key behaviors
//! -------------
//! - Define canonical aliases for parameter vectors, gradients, Hessians,
//!   and scalar costs (`Theta`, `Grad`, `Hessian`, `Cost`).
//! - Provide a standard map type for Argmin function-evaluation counters
//!   (`FnEvalMap`) and the iteration-state alias every solver in this crate
//!   runs on (`DescentState`).
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` are column vectors with length equal to the number
//!   of free parameters.
//! - `Hessian` is a dense `theta.len() × theta.len()` matrix when used.
//!
//! Testing notes
//! -------------
//! - Type aliases only; exercised by the surrounding optimizer tests.
use argmin::core::IterState;
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Parameter vector `θ` for log-likelihood optimization.
pub type Theta = Array1<f64>;

/// Gradient vector `∇ℓ(θ)` or `∇c(θ)`, matching the shape of `Theta`.
pub type Grad = Array1<f64>;

/// Dense Hessian matrix; `n × n` for `n = Theta.len()`.
pub type Hessian = Array2<f64>;

/// Scalar objective value. Inside argmin this is the cost `c(θ) = -ℓ(θ)`.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps human-readable counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Argmin iteration state for first-order solvers over `(Theta, Grad, f64)`.
pub type DescentState = IterState<Theta, Grad, (), (), (), f64>;
