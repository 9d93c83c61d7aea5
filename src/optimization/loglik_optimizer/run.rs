//! Execution helper that runs an `argmin` solver on a log-likelihood problem and
//! returns a crate-friendly [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        LogLikelihood, MLEOptions, OptimOutcome, Theta, adapter::ArgMinAdapter,
        types::DescentState,
    },
};
use argmin::core::{CostFunction, Executor, Gradient, Solver, State};
use argmin_math::ArgminL2Norm;
use tracing::debug;

/// Run an `argmin` optimization for a log-likelihood problem.
///
/// Wires up the adapted problem, the solver, the starting point `theta0`
/// (consumed), the optional iteration cap, and (behind the `obs_slog`
/// feature) a terminal observer. The **last** iterate and its cost are
/// reported, which for fixed-step descent is the point the caller continues
/// from.
///
/// # Feature flags
/// With `obs_slog` enabled and `opts.verbose == true`, a slog observer is
/// attached with `ObserverMode::Always`.
///
/// # Errors
/// - Propagates argmin runtime errors and model errors raised inside the
///   cost/gradient via `From<argmin::core::Error>`.
/// - Propagates validation errors encountered when constructing
///   [`OptimOutcome`].
pub fn run_descent<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, DescentState>,
{
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let mut optimizer = Executor::new(problem, solver).configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    let cost = result.get_cost();
    OptimOutcome::new(result.take_param(), -cost, termination, iterations, function_counts, grad)
}

// ---- Helper Methods ----

fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: LogLikelihood,
{
    let ll0 = -problem.cost(theta0)?;
    let grad_norm = problem.gradient(theta0).ok().map(|g| g.l2_norm());
    debug!(loglik = ll0, grad_norm = ?grad_norm, "optimizer starting point");
    Ok(())
}
