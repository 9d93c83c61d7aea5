//! Public API surface for log-likelihood maximization.
//!
//! - [`LogLikelihood`]: trait users implement for their model.
//! - [`MLEOptions`] and [`Tolerances`]: configuration for the optimizer.
//! - [`OptimOutcome`]: normalized result returned by [`maximize`] and
//!   [`ascent_step`].
//!
//! Convention: we *maximize* a user log-likelihood `ℓ(θ)` by minimizing the cost
//! `c(θ) = -ℓ(θ)`. If an analytic gradient is provided, it should be the gradient
//! of the log-likelihood (`∇ℓ(θ)`); the adapter flips the sign as needed.
//!
//! [`maximize`]: crate::optimization::loglik_optimizer::maximize
//! [`ascent_step`]: crate::optimization::loglik_optimizer::ascent_step
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Cost, FnEvalMap, Grad, Theta,
        validation::{
            validate_theta_hat, validate_value, verify_learning_rate, verify_tol_cost,
            verify_tol_grad,
        },
    },
};
use argmin::core::TerminationStatus;
use argmin_math::ArgminL2Norm;

/// Default fixed step size of the descent update.
pub const DEFAULT_LEARNING_RATE: f64 = 1e-3;

/// User-implemented log-likelihood interface.
///
/// You maximize `ℓ(θ)`; internally we minimize the cost `c(θ) = -ℓ(θ)`.
/// If you provide an analytic gradient, return the gradient of the
/// log-likelihood `∇ℓ(θ)` (the adapter flips the sign to match the cost).
///
/// - `type Data`: per-model data carried into `value`/`grad`/`check`.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate `ℓ(θ)`.
/// - `check(&Theta, &Data) -> OptResult<()>`: reject obviously invalid
///   `θ`/`data` pairs. Called once before optimization.
///
/// Optional:
/// - `grad(&Theta, &Data) -> OptResult<Grad>`: analytic gradient `∇ℓ(θ)`.
///   If not implemented, finite differences are used automatically.
pub trait LogLikelihood {
    type Data: 'static;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `tols: Tolerances` — stopping rules and iteration limits.
/// - `learning_rate: f64` — fixed step size `η` in `θ ← θ − η ∇c(θ)`.
/// - `verbose: bool` — if `true`, attaches an observer (behind the `obs_slog`
///   feature) and logs the starting point.
///
/// Default:
/// - `tols`: `tol_grad = 1e-6`, `tol_cost = None`, `max_iter = 300`
/// - `learning_rate`: [`DEFAULT_LEARNING_RATE`]
/// - `verbose`: `false`
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub learning_rate: f64,
    pub verbose: bool,
}

impl MLEOptions {
    /// Create a new set of optimizer options.
    ///
    /// # Errors
    /// - [`OptError::InvalidLearningRate`] when `learning_rate` is not finite
    ///   and strictly positive.
    pub fn new(tols: Tolerances, learning_rate: f64, verbose: bool) -> OptResult<Self> {
        verify_learning_rate(learning_rate)?;
        Ok(Self { tols, learning_rate, verbose })
    }

    /// Same step size and verbosity, but stop after exactly one update.
    ///
    /// Used by mini-batch training, where every batch contributes a single
    /// descent step regardless of the full-run tolerances.
    pub fn single_step(&self) -> Self {
        Self {
            tols: Tolerances { tol_grad: None, tol_cost: None, max_iter: Some(1) },
            learning_rate: self.learning_rate,
            verbose: self.verbose,
        }
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-6), tol_cost: None, max_iter: Some(300) },
            learning_rate: DEFAULT_LEARNING_RATE,
            verbose: false,
        }
    }
}

/// Numerical tolerances and iteration limits used by the optimizer.
///
/// - `tol_grad`: terminate when the gradient norm falls below this threshold.
/// - `tol_cost`: terminate when the change in cost falls below this threshold.
/// - `max_iter`: hard cap on the number of iterations.
///
/// Any field can be `None` but **at least one** of the three must be provided
/// (see [`Tolerances::new`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Rules
    /// - At least one of `tol_grad`, `tol_cost`, or `max_iter` must be `Some`.
    /// - If provided, tolerances must be **finite and strictly positive**.
    /// - If provided, `max_iter` must be `> 0`.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Canonical result returned by the optimizer entry points.
///
/// - `theta_hat`: last iterate of the descent (fixed-step descent keeps no
///   separate "best" point).
/// - `value`: **log-likelihood** `ℓ(θ̂)` at that iterate (not the cost).
/// - `converged`: `true` if the solver reported a terminating status other
///   than `NotTerminated`.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by `argmin`.
/// - `grad_norm`: norm of the last gradient, if present.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated [`OptimOutcome`] from raw solver state.
    ///
    /// # Errors
    /// - Propagates validation errors for `theta_hat` (missing / non-finite)
    ///   or `value` (non-finite).
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus,
        iterations: u64, fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = match termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            other => (true, format!("{other:?}")),
        };
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self {
            theta_hat,
            value,
            converged,
            status,
            iterations: iterations as usize,
            fn_evals,
            grad_norm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argmin::core::TerminationReason;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // `Tolerances::new` requires at least one stopping rule and rejects a
    // zero iteration cap.
    //
    // Given
    // -----
    // - All-`None` tolerances and `max_iter = Some(0)`.
    //
    // Expect
    // ------
    // - `NoTolerancesProvided` and `InvalidMaxIter` respectively.
    fn tolerances_new_rejects_empty_and_zero_iterations() {
        assert_eq!(Tolerances::new(None, None, None), Err(OptError::NoTolerancesProvided));
        assert!(matches!(
            Tolerances::new(None, None, Some(0)),
            Err(OptError::InvalidMaxIter { max_iter: 0, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // `single_step` keeps the step size but caps the run at one update.
    //
    // Given
    // -----
    // - Options with `learning_rate = 1e-4` and a 300-iteration cap.
    //
    // Expect
    // ------
    // - Derived options have `max_iter = Some(1)`, no tolerance rules, and the
    //   same learning rate.
    fn single_step_caps_iterations_at_one() {
        // Arrange
        let tols = Tolerances::new(Some(1e-6), None, Some(300)).unwrap();
        let opts = MLEOptions::new(tols, 1e-4, false).unwrap();

        // Act
        let step = opts.single_step();

        // Assert
        assert_eq!(step.tols.max_iter, Some(1));
        assert_eq!(step.tols.tol_grad, None);
        assert_eq!(step.learning_rate, 1e-4);
    }

    #[test]
    // Purpose
    // -------
    // `OptimOutcome::new` maps termination states and computes the gradient
    // norm.
    //
    // Given
    // -----
    // - A solver-converged status and gradient (3, 4).
    //
    // Expect
    // ------
    // - `converged == true`, `grad_norm == Some(5.0)`.
    fn optim_outcome_reports_status_and_grad_norm() {
        // Arrange
        let status = TerminationStatus::Terminated(TerminationReason::SolverConverged);

        // Act
        let out = OptimOutcome::new(
            Some(array![0.5, 0.5]),
            -1.0,
            status,
            7,
            FnEvalMap::new(),
            Some(array![3.0, 4.0]),
        )
        .unwrap();

        // Assert
        assert!(out.converged);
        assert_eq!(out.iterations, 7);
        assert_eq!(out.grad_norm, Some(5.0));
    }
}
