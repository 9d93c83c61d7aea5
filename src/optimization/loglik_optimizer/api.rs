//! High-level entry points for maximizing a user-provided `LogLikelihood`.
//!
//! Both functions wrap the model in an `ArgMinAdapter` (which *minimizes*
//! `-ℓ(θ)`), build a [`FixedStepDescent`](super::descent::FixedStepDescent)
//! from the options, and delegate the run to [`run_descent`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::build_fixed_step_descent,
        run::run_descent,
        traits::{LogLikelihood, MLEOptions},
    },
};

/// Maximize a log-likelihood `ℓ(θ)` by fixed-step gradient ascent.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - Iterates `θ ← θ + η ∇ℓ(θ)` until one of `opts.tols` fires.
///
/// # Errors
/// - Propagates any error from `f.check`, the builder, or the run.
///
/// # Returns
/// An [`OptimOutcome`] holding the last iterate, `ℓ` there, the termination
/// status, and evaluation counters.
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use rust_pointprocess::optimization::{
///     errors::OptResult,
///     loglik_optimizer::{maximize, LogLikelihood, MLEOptions, Theta, Tolerances},
/// };
///
/// struct MyLL;
/// impl LogLikelihood for MyLL {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let tols = Tolerances::new(Some(1e-6), None, Some(500))?;
/// let opts = MLEOptions::new(tols, 0.1, false)?;
/// let out = maximize(&MyLL, array![0.1, -0.2, 0.3], &(), &opts)?;
/// println!("θ̂ = {:?}", out.theta_hat);
/// # Ok::<(), rust_pointprocess::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    let solver = build_fixed_step_descent(opts)?;
    run_descent(theta0, opts, problem, solver)
}

/// Take exactly one ascent step `θ₁ = θ₀ + η ∇ℓ(θ₀)`.
///
/// The tolerances in `opts` are ignored; only `learning_rate` and `verbose`
/// are used. `ℓ` is evaluated once, at `θ₁`, and returned as
/// [`OptimOutcome::value`].
///
/// # Errors
/// - Propagates any error from `f.check`, the gradient at `θ₀`, or the
///   evaluation at `θ₁`.
pub fn ascent_step<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    let opts = opts.single_step();
    maximize(f, theta0, data, &opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError,
        loglik_optimizer::{Grad, Tolerances},
    };
    use ndarray::array;

    // ℓ(θ) = -Σ (θ_i - c_i)², c = (1, -2).
    struct Shifted;

    impl LogLikelihood for Shifted {
        type Data = ();
        fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
            Ok(-((theta[0] - 1.0).powi(2) + (theta[1] + 2.0).powi(2)))
        }
        fn check(&self, theta: &Theta, _: &()) -> OptResult<()> {
            if theta.len() != 2 {
                return Err(OptError::ThetaLengthMismatch { expected: 2, actual: theta.len() });
            }
            Ok(())
        }
        fn grad(&self, theta: &Theta, _: &()) -> OptResult<Grad> {
            Ok(array![-2.0 * (theta[0] - 1.0), -2.0 * (theta[1] + 2.0)])
        }
    }

    #[test]
    // Purpose
    // -------
    // Full maximization reaches the optimum of a concave quadratic.
    //
    // Given
    // -----
    // - ℓ maximized at (1, -2), θ₀ = (0, 0), η = 0.1, tol_grad = 1e-8.
    //
    // Expect
    // ------
    // - θ̂ ≈ (1, -2), ℓ(θ̂) ≈ 0, converged.
    fn maximize_reaches_quadratic_optimum() {
        // Arrange
        let tols = Tolerances::new(Some(1e-8), None, Some(10_000)).unwrap();
        let opts = MLEOptions::new(tols, 0.1, false).unwrap();

        // Act
        let out = maximize(&Shifted, array![0.0, 0.0], &(), &opts).unwrap();

        // Assert
        assert!(out.converged);
        assert!((out.theta_hat[0] - 1.0).abs() < 1e-6);
        assert!((out.theta_hat[1] + 2.0).abs() < 1e-6);
        assert!(out.value.abs() < 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // `ascent_step` moves uphill by exactly `η ∇ℓ(θ₀)` and reports ℓ there.
    //
    // Given
    // -----
    // - θ₀ = (0, 0): ∇ℓ = (2, -4); η = 0.1.
    //
    // Expect
    // ------
    // - θ₁ = (0.2, -0.4); value = -(0.8² + 1.6²) = -3.2; one iteration.
    fn ascent_step_moves_uphill_once() {
        // Arrange
        let opts = MLEOptions::new(Tolerances::new(Some(1e-8), None, None).unwrap(), 0.1, false)
            .unwrap();

        // Act
        let out = ascent_step(&Shifted, array![0.0, 0.0], &(), &opts).unwrap();

        // Assert
        assert_eq!(out.iterations, 1);
        assert!((out.theta_hat[0] - 0.2).abs() < 1e-12);
        assert!((out.theta_hat[1] + 0.4).abs() < 1e-12);
        assert!((out.value + 3.2).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // `check` runs before anything else.
    //
    // Given
    // -----
    // - A length-3 starting point for a 2-parameter model.
    //
    // Expect
    // ------
    // - `ThetaLengthMismatch` from `check`.
    fn maximize_runs_check_first() {
        let result = maximize(&Shifted, array![0.0, 0.0, 0.0], &(), &MLEOptions::default());

        assert_eq!(result, Err(OptError::ThetaLengthMismatch { expected: 2, actual: 3 }));
    }
}
