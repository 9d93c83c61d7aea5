//! loglik_optimizer::descent — fixed-step gradient descent as an argmin solver.
//!
//! Purpose
//! -------
//! Provide the plain first-order update `θ ← θ − η ∇c(θ)` as an argmin
//! [`Solver`], so that mini-batch training and full-batch maximization share
//! the same executor, observers, counters, and error plumbing.
//!
//! Key behaviors
//! -------------
//! - `init` only checks that a starting point exists; it does **not** evaluate
//!   the cost.
//! - Each iteration evaluates the gradient at the current iterate, takes one
//!   step of size `η`, then evaluates the cost **once** at the new iterate.
//!   That cost is what the state (and therefore the caller) sees.
//! - Optional stopping rules on the gradient norm and on the change in cost
//!   between consecutive iterates; the iteration cap lives on the executor.
//!
//! Invariants & assumptions
//! ------------------------
//! - The stored gradient always belongs to the iterate *before* the latest
//!   update.
//! - The solver keeps no "best so far" logic of its own; the runner reads the
//!   last iterate.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        types::{DescentState, Grad, Theta},
        validation::{verify_learning_rate, verify_tol_cost, verify_tol_grad},
    },
};
use argmin::core::{
    ArgminError, CostFunction, Error, Gradient, KV, Problem, Solver, State, TerminationReason,
    TerminationStatus,
};
use argmin_math::ArgminL2Norm;
use serde::{Deserialize, Serialize};

/// Gradient descent with a constant step size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedStepDescent {
    learning_rate: f64,
    tol_grad: Option<f64>,
    tol_cost: Option<f64>,
}

impl FixedStepDescent {
    /// Build a solver with step size `learning_rate` and no stopping rules.
    ///
    /// # Errors
    /// - `OptError::InvalidLearningRate` for non-finite or non-positive steps.
    pub fn new(learning_rate: f64) -> OptResult<Self> {
        verify_learning_rate(learning_rate)?;
        Ok(Self { learning_rate, tol_grad: None, tol_cost: None })
    }

    /// Stop once `‖∇c(θ)‖₂ < tol`.
    pub fn with_tolerance_grad(mut self, tol: f64) -> OptResult<Self> {
        verify_tol_grad(Some(tol))?;
        self.tol_grad = Some(tol);
        Ok(self)
    }

    /// Stop once `|c(θ_{k}) − c(θ_{k−1})| < tol`.
    pub fn with_tolerance_cost(mut self, tol: f64) -> OptResult<Self> {
        verify_tol_cost(Some(tol))?;
        self.tol_cost = Some(tol);
        Ok(self)
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn tolerances(&self) -> (Option<f64>, Option<f64>) {
        (self.tol_grad, self.tol_cost)
    }
}

impl<O> Solver<O, DescentState> for FixedStepDescent
where
    O: CostFunction<Param = Theta, Output = f64> + Gradient<Param = Theta, Gradient = Grad>,
{
    const NAME: &'static str = "Fixed-step gradient descent";

    fn init(
        &mut self, _problem: &mut Problem<O>, state: DescentState,
    ) -> Result<(DescentState, Option<KV>), Error> {
        if state.get_param().is_none() {
            return Err(ArgminError::NotInitialized {
                text: "Fixed-step descent requires an initial parameter vector.".to_string(),
            }
            .into());
        }
        Ok((state, None))
    }

    fn next_iter(
        &mut self, problem: &mut Problem<O>, mut state: DescentState,
    ) -> Result<(DescentState, Option<KV>), Error> {
        let param = state.take_param().ok_or_else(|| ArgminError::NotInitialized {
            text: "Parameter vector missing from iteration state.".to_string(),
        })?;
        let grad = problem.gradient(&param)?;
        let eta = self.learning_rate;
        let next = &param - &grad.mapv(|g| eta * g);
        let cost = problem.cost(&next)?;
        Ok((state.param(next).gradient(grad).cost(cost), None))
    }

    fn terminate(&mut self, state: &DescentState) -> TerminationStatus {
        if let (Some(tol), Some(grad)) = (self.tol_grad, state.get_gradient()) {
            if grad.l2_norm() < tol {
                return TerminationStatus::Terminated(TerminationReason::SolverConverged);
            }
        }
        if let Some(tol) = self.tol_cost {
            let prev = state.get_prev_cost();
            let cost = state.get_cost();
            if prev.is_finite() && cost.is_finite() && (prev - cost).abs() < tol {
                return TerminationStatus::Terminated(TerminationReason::SolverConverged);
            }
        }
        TerminationStatus::NotTerminated
    }
}
