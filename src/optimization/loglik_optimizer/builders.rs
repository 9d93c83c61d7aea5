//! loglik_optimizer::builders — solver construction from crate options.
//!
//! Purpose
//! -------
//! Hide argmin's solver wiring behind a single builder that applies crate
//! level options ([`MLEOptions`]) so that entry points can request a
//! configured solver without touching argmin-specific types.
//!
//! Conventions
//! -----------
//! - The builder does **not** set an initial parameter vector or
//!   `max_iters`; these are runtime concerns applied by the runner.
//! - Errors are always reported via [`OptResult`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{descent::FixedStepDescent, traits::MLEOptions},
};

/// Construct a [`FixedStepDescent`] from `opts`.
///
/// Consults `opts.learning_rate` and the optional `tol_grad` / `tol_cost`
/// stopping rules. `opts.tols.max_iter` is left to the runner.
///
/// # Errors
/// - `OptError::InvalidLearningRate`, `OptError::InvalidTolGrad`,
///   `OptError::InvalidTolCost` when the options were assembled by hand
///   with invalid values.
pub fn build_fixed_step_descent(opts: &MLEOptions) -> OptResult<FixedStepDescent> {
    let mut solver = FixedStepDescent::new(opts.learning_rate)?;
    if let Some(tol) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(tol)?;
    }
    if let Some(tol) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(tol)?;
    }
    Ok(solver)
}
