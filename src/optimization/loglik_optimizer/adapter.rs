//! Adapter that exposes a user `LogLikelihood` as an `argmin` problem.
//!
//! We convert a *maximization* of a log-likelihood `ℓ(θ)` into a *minimization*
//! problem by defining the cost as `c(θ) = -ℓ(θ)`. Analytic gradients (if
//! provided by the user) are negated accordingly. If a gradient is not
//! provided, we finite-difference the **cost** closure, so no sign flip is
//! needed in that branch.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        finite_diff::run_fd_diff,
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges a user `LogLikelihood` to `argmin`'s `CostFunction` and `Gradient`.
///
/// - `CostFunction::cost` returns `-ℓ(θ)` (negative log-likelihood).
/// - `Gradient::gradient` returns:
///   - `-∇ℓ(θ)` if the user provides an analytic gradient, or
///   - a finite-difference gradient of the cost (no sign flip needed).
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a user `LogLikelihood` and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `c(θ) = -ℓ(θ)`.
    ///
    /// # Errors
    /// - Propagates any `OptError` from the user's `value`.
    /// - `OptError::NonFiniteCost` if the value is not finite.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(-output)
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at `θ`.
    ///
    /// - Analytic branch: validate `grad(θ, data)` and return its negation.
    /// - Fallback branch (`GradientNotImplemented`): central differences of
    ///   the cost closure; if a cost evaluation failed or the result is not
    ///   finite, retry once with forward differences.
    ///
    /// The FD closure must return `f64`, so evaluation errors are parked in
    /// `closure_err` and the closure returns `NaN`.
    ///
    /// # Errors
    /// - Propagates user errors from `grad` (other than `GradientNotImplemented`).
    /// - Propagates errors raised by cost evaluations during FD.
    /// - Returns validation errors for wrong dimension or non-finite entries.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_func = |theta: &Theta| -> f64 {
                    match self.cost(theta) {
                        Ok(val) => val,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                let fd_grad = theta.central_diff(&cost_func);
                if closure_err.borrow().is_none() && validate_grad(&fd_grad, dim).is_ok() {
                    return Ok(fd_grad);
                }
                Ok(run_fd_diff(theta, &cost_func, &closure_err)?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use ndarray::array;

    // Concave quadratic ℓ(θ) = -Σ (θ_i - 1)², optionally with analytic gradient.
    struct Quadratic {
        analytic: bool,
    }

    impl LogLikelihood for Quadratic {
        type Data = ();

        fn value(&self, theta: &Theta, _data: &()) -> OptResult<f64> {
            Ok(-theta.mapv(|t| (t - 1.0).powi(2)).sum())
        }

        fn check(&self, _theta: &Theta, _data: &()) -> OptResult<()> {
            Ok(())
        }

        fn grad(&self, theta: &Theta, _data: &()) -> OptResult<Grad> {
            if self.analytic {
                Ok(theta.mapv(|t| -2.0 * (t - 1.0)))
            } else {
                Err(OptError::GradientNotImplemented)
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // The adapter reports the cost as the negated log-likelihood.
    //
    // Given
    // -----
    // - ℓ(θ) = -Σ(θ_i - 1)² at θ = (0, 0), so ℓ = -2.
    //
    // Expect
    // ------
    // - `cost(θ) == 2.0`.
    fn cost_is_negated_loglik() {
        // Arrange
        let model = Quadratic { analytic: true };
        let adapter = ArgMinAdapter::new(&model, &());

        // Act
        let cost = adapter.cost(&array![0.0, 0.0]).unwrap();

        // Assert
        assert_eq!(cost, 2.0);
    }

    #[test]
    // Purpose
    // -------
    // Analytic and finite-difference branches agree on the cost gradient.
    //
    // Given
    // -----
    // - The same quadratic with and without an analytic gradient, θ = (0, 3).
    //
    // Expect
    // ------
    // - Both gradients ≈ ∇c = (−2, 4).
    fn analytic_and_fd_gradients_agree() {
        // Arrange
        let analytic = Quadratic { analytic: true };
        let numeric = Quadratic { analytic: false };
        let theta = array![0.0, 3.0];

        // Act
        let g_a = ArgMinAdapter::new(&analytic, &()).gradient(&theta).unwrap();
        let g_n = ArgMinAdapter::new(&numeric, &()).gradient(&theta).unwrap();

        // Assert
        assert!((g_a[0] + 2.0).abs() < 1e-12 && (g_a[1] - 4.0).abs() < 1e-12);
        assert!((g_n[0] + 2.0).abs() < 1e-5 && (g_n[1] - 4.0).abs() < 1e-5);
    }
}
