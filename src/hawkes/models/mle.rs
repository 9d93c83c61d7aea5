//! Hawkes MLE trainer: mini-batch gradient descent over a prefix-scan
//! log-likelihood.
//!
//! This module wires an [`IntensityModel`] to the `LogLikelihood` trait and
//! owns the parameter state of a training run. Parameters live in
//! unconstrained space, `param_j = softplus(θ_j)`, so every iterate is a
//! valid `(μ, β, σx, σy)`.
//!
//! Key ideas:
//! - `ℓ(θ) = Σ_b LL_b / B` for a batch of `B` sequences; the optimizer
//!   minimizes `−ℓ(θ)`, i.e. the cost.
//! - The gradient is the sum of per-prefix analytic gradients, mapped to
//!   θ-space with the diagonal softplus Jacobian.
//! - Each batch gets exactly one fixed-step update; the cost is evaluated
//!   once, at the updated parameters, and that value is recorded.
//! - Any failure aborts the run; the costs of the batches completed in the
//!   failing epoch travel with the error.
use crate::{
    hawkes::{
        core::{
            data::EventBatch,
            intensity::{IntensityModel, SpatialTemporalHawkes},
            options::HawkesOptions,
            params::{HawkesParams, N_PARAMS, theta_jacobian},
            scan::{batch_log_likelihood, batch_log_likelihood_grad},
            validation::validate_theta,
        },
        errors::{HawkesError, HawkesResult},
        models::batching::EpochPlan,
    },
    inference::hessian::calc_standard_errors,
    optimization::{
        errors::OptResult,
        loglik_optimizer::{Grad, LogLikelihood, OptimOutcome, Theta, ascent_step},
    },
};
use ndarray::Array1;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::cell::RefCell;
use tracing::{debug, info};

/// Average cost of one epoch, with the per-batch costs it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochSummary {
    pub epoch: usize,
    pub n_batches: usize,
    pub batch_size: usize,
    /// Post-update cost of every batch, in the order they were taken.
    pub batch_costs: Vec<f64>,
    pub avg_cost: f64,
}

/// Outcome of [`HawkesMLE::train`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    pub epochs: Vec<EpochSummary>,
    pub params: HawkesParams,
}

impl TrainReport {
    /// Per-epoch average costs, in epoch order.
    pub fn avg_costs(&self) -> Vec<f64> {
        self.epochs.iter().map(|e| e.avg_cost).collect()
    }
}

/// Maximum-likelihood trainer for a spatio-temporal point process.
///
/// # Notes
/// - `theta` is `None` until [`HawkesMLE::initialize`] (or a cold-start
///   [`HawkesMLE::train`]) installs `options.init`.
/// - The shuffle RNG is seeded once at construction and advances across
///   `train` calls, so warm-started runs see new permutations.
#[derive(Debug, Clone)]
pub struct HawkesMLE<M: IntensityModel = SpatialTemporalHawkes> {
    model: M,
    options: HawkesOptions,
    theta: Option<Theta>,
    rng: ChaCha8Rng,
    /// Outcome of the most recent optimizer step.
    pub results: Option<OptimOutcome>,
}

impl<M: IntensityModel> HawkesMLE<M> {
    pub fn new(model: M, options: HawkesOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { model, options, theta: None, rng, results: None }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn options(&self) -> &HawkesOptions {
        &self.options
    }

    /// Current optimizer-space parameters, if initialized.
    pub fn theta(&self) -> Option<&Theta> {
        self.theta.as_ref()
    }

    /// Reset the parameters to `options.init`.
    pub fn initialize(&mut self) {
        self.theta = Some(self.options.init.to_theta());
        self.results = None;
        debug!(init = ?self.options.init, "parameters initialized");
    }

    pub fn set_params(&mut self, params: HawkesParams) {
        self.theta = Some(params.to_theta());
    }

    /// Current model-space parameters.
    ///
    /// # Errors
    /// - [`HawkesError::ModelNotInitialized`] before any initialization.
    pub fn params(&self) -> HawkesResult<HawkesParams> {
        let theta = self.theta.as_ref().ok_or(HawkesError::ModelNotInitialized)?;
        HawkesParams::from_theta(theta.view())
    }

    /// Total log-likelihood `Σ_b LL_b` of a batch of exactly `batch_size`
    /// sequences at `params`.
    ///
    /// # Errors
    /// - [`HawkesError::BatchSizeMismatch`] for a batch of the wrong size.
    /// - Any model error raised while scanning.
    pub fn build_log_likelihood(&self, batch: &EventBatch, params: &HawkesParams) -> HawkesResult<f64> {
        self.check_batch(batch)?;
        batch_log_likelihood(&self.model, batch, self.options.cutoff, params)
    }

    /// Cost `−Σ_b LL_b / B` at `params`.
    pub fn cost_at(&self, batch: &EventBatch, params: &HawkesParams) -> HawkesResult<f64> {
        Ok(-self.build_log_likelihood(batch, params)? / self.options.batch_size as f64)
    }

    /// Cost at the current parameters.
    pub fn cost(&self, batch: &EventBatch) -> HawkesResult<f64> {
        self.cost_at(batch, &self.params()?)
    }

    /// One fixed-step descent update on `batch`; returns the cost at the
    /// updated parameters.
    ///
    /// # Errors
    /// - [`HawkesError::ModelNotInitialized`] before any initialization.
    /// - Batch-size, model, and optimizer errors.
    pub fn step(&mut self, batch: &EventBatch) -> HawkesResult<f64> {
        let theta0 = self.theta.clone().ok_or(HawkesError::ModelNotInitialized)?;
        let outcome = ascent_step(&*self, theta0, batch, &self.options.mle_opts)?;
        let cost = -outcome.value;
        self.theta = Some(outcome.theta_hat.clone());
        self.results = Some(outcome);
        Ok(cost)
    }

    /// Train for `epochs` passes over `expert_sequences`.
    ///
    /// ## Steps
    /// 1. Check that at least one full batch exists.
    /// 2. Cold start (`warm_start == false`): install `options.init`.
    ///    Warm start: continue from the current parameters.
    /// 3. Per epoch: shuffle, cut into `floor(n / B)` batches, take one step
    ///    per batch, log the average post-update cost.
    /// 4. Log and return the final parameters.
    ///
    /// ## Errors
    /// - [`HawkesError::InsufficientData`] when `n < B`.
    /// - [`HawkesError::ModelNotInitialized`] for a warm start without
    ///   parameters.
    /// - [`HawkesError::TrainingAborted`] when a batch step fails.
    pub fn train(
        &mut self, epochs: usize, expert_sequences: &EventBatch, warm_start: bool,
    ) -> HawkesResult<TrainReport> {
        let n_data = expert_sequences.n_sequences();
        let batch_size = self.options.batch_size;
        if n_data < batch_size {
            return Err(HawkesError::InsufficientData { n_data, batch_size });
        }
        if !warm_start {
            self.initialize();
            info!(init = ?self.options.init, "cold start");
        } else if self.theta.is_none() {
            return Err(HawkesError::ModelNotInitialized);
        }

        let mut summaries = Vec::with_capacity(epochs);
        for epoch in 0..epochs {
            let plan = EpochPlan::shuffled(n_data, batch_size, &mut self.rng)?;
            let mut batch_costs = Vec::with_capacity(plan.n_batches());
            for (batch_idx, indices) in plan.batches().enumerate() {
                let batch = expert_sequences.select(indices);
                match self.step(&batch) {
                    Ok(cost) => batch_costs.push(cost),
                    Err(err) => {
                        return Err(HawkesError::TrainingAborted {
                            epoch,
                            batch: batch_idx,
                            completed_costs: batch_costs,
                            reason: err.to_string(),
                        });
                    }
                }
            }
            let avg_cost = batch_costs.iter().sum::<f64>() / batch_costs.len() as f64;
            info!(epoch, n_batches = plan.n_batches(), batch_size, avg_cost, "epoch finished");
            summaries.push(EpochSummary {
                epoch,
                n_batches: plan.n_batches(),
                batch_size,
                batch_costs,
                avg_cost,
            });
        }

        let params = self.params()?;
        info!(
            mu = params.mu,
            beta = params.beta,
            sigma_x = params.sigma_x,
            sigma_y = params.sigma_y,
            "training finished"
        );
        Ok(TrainReport { epochs: summaries, params })
    }

    /// Observed-information standard errors of `(μ, β, σx, σy)` at the
    /// current parameters, on the scale of the batch total log-likelihood.
    ///
    /// The Hessian is taken in θ-space on the average cost, rescaled by
    /// `1/√B`, and mapped through the softplus Jacobian (delta method).
    ///
    /// # Errors
    /// - [`HawkesError::ModelNotInitialized`] before any initialization.
    /// - The first model error hit while differentiating.
    pub fn standard_errors(&self, batch: &EventBatch) -> HawkesResult<Array1<f64>> {
        let theta = self.theta.as_ref().ok_or(HawkesError::ModelNotInitialized)?;
        let failure: RefCell<Option<HawkesError>> = RefCell::new(None);
        let cost_grad = |theta: &Theta| -> Grad {
            match self.average_grad(theta, batch) {
                Ok(g) => -g,
                Err(err) => {
                    failure.borrow_mut().get_or_insert(err);
                    Array1::from_elem(N_PARAMS, f64::NAN)
                }
            }
        };
        let se_theta = calc_standard_errors(&cost_grad, theta);
        if let Some(err) = failure.into_inner() {
            return Err(err);
        }
        let scale = (batch.n_sequences() as f64).sqrt();
        Ok(se_theta? * theta_jacobian(theta.view()) / scale)
    }

    fn check_batch(&self, batch: &EventBatch) -> HawkesResult<()> {
        if batch.n_sequences() != self.options.batch_size {
            return Err(HawkesError::BatchSizeMismatch {
                expected: self.options.batch_size,
                found: batch.n_sequences(),
            });
        }
        Ok(())
    }

    /// `∇_θ (Σ_b LL_b / B)` for any batch size.
    fn average_grad(&self, theta: &Theta, batch: &EventBatch) -> HawkesResult<Grad> {
        let params = HawkesParams::from_theta(theta.view())?;
        let grad = batch_log_likelihood_grad(&self.model, batch, self.options.cutoff, &params)?;
        Ok(grad * theta_jacobian(theta.view()) / batch.n_sequences() as f64)
    }
}

impl<M: IntensityModel> LogLikelihood for HawkesMLE<M> {
    type Data = EventBatch;

    /// `ℓ(θ) = Σ_b LL_b / B`.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        let params = HawkesParams::from_theta(theta.view())?;
        let total = batch_log_likelihood(&self.model, data, self.options.cutoff, &params)?;
        Ok(total / data.n_sequences() as f64)
    }

    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        validate_theta(theta.view(), N_PARAMS)?;
        self.check_batch(data)?;
        Ok(())
    }

    /// Analytic `∇_θ ℓ`; models without one report `GradientNotImplemented`
    /// and the optimizer differentiates numerically.
    fn grad(&self, theta: &Theta, data: &Self::Data) -> OptResult<Grad> {
        Ok(self.average_grad(theta, data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hawkes::core::{
        domain::{SpatialDomain, TimeHorizon},
        simulate::{SimOpts, simulate_batch},
    };
    use crate::optimization::loglik_optimizer::{MLEOptions, Tolerances};
    use approx::assert_relative_eq;
    use ndarray::ArrayView2;

    fn model() -> SpatialTemporalHawkes {
        SpatialTemporalHawkes::new(
            TimeHorizon::new(0.0, 10.0).unwrap(),
            SpatialDomain::new((-1.0, 1.0), (-1.0, 1.0)).unwrap(),
            0.5,
        )
        .unwrap()
    }

    fn options(batch_size: usize, lr: f64) -> HawkesOptions {
        let tols = Tolerances::new(Some(1e-8), None, Some(100)).unwrap();
        let mle_opts = MLEOptions::new(tols, lr, false).unwrap();
        HawkesOptions::new(batch_size, 3, None, mle_opts).unwrap().with_seed(5)
    }

    fn data(n: usize) -> EventBatch {
        let truth = HawkesParams::new(0.2, 1.0, 0.1, 0.1).unwrap();
        simulate_batch(&model(), &truth, &SimOpts::new(n, 20, Some(17)).unwrap()).unwrap()
    }

    /// Base-rate-only model without an analytic gradient.
    struct Poissonish;

    impl IntensityModel for Poissonish {
        fn log_density(&self, window: ArrayView2<'_, f64>, params: &HawkesParams) -> HawkesResult<f64> {
            let n = window.nrows();
            let prev = if n > 1 { window[[n - 2, 0]] } else { 0.0 };
            Ok(params.mu.ln() - params.mu * (window[[n - 1, 0]] - prev))
        }
    }

    /// Model that fails on every prefix.
    struct Broken;

    impl IntensityModel for Broken {
        fn log_density(&self, _window: ArrayView2<'_, f64>, _params: &HawkesParams) -> HawkesResult<f64> {
            Err(HawkesError::NonFiniteLogDensity { value: f64::NAN })
        }

        fn log_density_grad(
            &self, _window: ArrayView2<'_, f64>, _params: &HawkesParams,
        ) -> HawkesResult<Array1<f64>> {
            Err(HawkesError::NonFiniteLogDensity { value: f64::NAN })
        }
    }

    #[test]
    // Purpose
    // -------
    // `value` is the batch average and `cost_at` its negation, consistent
    // with `build_log_likelihood`.
    //
    // Given
    // -----
    // - 4 simulated sequences, B = 4, initial parameters.
    //
    // Expect
    // ------
    // - value(θ) = LL / 4 and cost_at = −LL / 4.
    fn value_and_cost_share_the_same_scale() {
        let mut mle = HawkesMLE::new(model(), options(4, 1e-3));
        mle.initialize();
        let batch = data(4);
        let params = mle.params().unwrap();

        let total = mle.build_log_likelihood(&batch, &params).unwrap();
        let value = mle.value(mle.theta().unwrap(), &batch).unwrap();
        let cost = mle.cost(&batch).unwrap();

        assert_relative_eq!(value, total / 4.0, max_relative = 1e-14);
        assert_relative_eq!(cost, -total / 4.0, max_relative = 1e-14);
    }

    #[test]
    // Purpose
    // -------
    // The θ-space gradient agrees with central differences of `value`.
    //
    // Given
    // -----
    // - 3 simulated sequences at θ = to_theta(0.3, 1.4, 0.2, 0.15).
    //
    // Expect
    // ------
    // - Each component within 1e-5 (relative) of the numerical derivative.
    fn theta_gradient_matches_finite_differences() {
        let mle = HawkesMLE::new(model(), options(3, 1e-3));
        let batch = data(3);
        let theta = HawkesParams::new(0.3, 1.4, 0.2, 0.15).unwrap().to_theta();
        let h = 1e-6;

        let grad = mle.grad(&theta, &batch).unwrap();

        for j in 0..N_PARAMS {
            let (mut up, mut dn) = (theta.clone(), theta.clone());
            up[j] += h;
            dn[j] -= h;
            let fd = (mle.value(&up, &batch).unwrap() - mle.value(&dn, &batch).unwrap()) / (2.0 * h);
            assert_relative_eq!(grad[j], fd, epsilon = 1e-6, max_relative = 1e-5);
        }
    }

    #[test]
    // Purpose
    // -------
    // A step moves θ by exactly −η∇c and returns the cost at the new point.
    //
    // Given
    // -----
    // - B = 2, η = 1e-3, initialized parameters.
    //
    // Expect
    // ------
    // - θ₁ = θ₀ + η ∇ℓ(θ₀); returned cost = cost at θ₁.
    fn step_applies_one_update_and_reports_post_update_cost() {
        let mut mle = HawkesMLE::new(model(), options(2, 1e-3));
        mle.initialize();
        let batch = data(2);
        let theta0 = mle.theta().unwrap().clone();
        let expected = &theta0 + &(mle.grad(&theta0, &batch).unwrap() * 1e-3);

        let cost = mle.step(&batch).unwrap();

        let theta1 = mle.theta().unwrap();
        for j in 0..N_PARAMS {
            assert_relative_eq!(theta1[j], expected[j], max_relative = 1e-12);
        }
        assert_relative_eq!(cost, mle.cost(&batch).unwrap(), max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Training guards: too little data, warm start without parameters, and
    // wrong batch sizes.
    //
    // Given
    // -----
    // - B = 5 with 3 sequences; B = 2 warm start on a fresh trainer; a
    //   3-sequence batch for B = 2.
    //
    // Expect
    // ------
    // - `InsufficientData`, `ModelNotInitialized`, `BatchSizeMismatch`.
    fn train_guards_fail_fast() {
        let mut small = HawkesMLE::new(model(), options(5, 1e-3));
        assert_eq!(
            small.train(1, &data(3), false).unwrap_err(),
            HawkesError::InsufficientData { n_data: 3, batch_size: 5 }
        );

        let mut fresh = HawkesMLE::new(model(), options(2, 1e-3));
        assert_eq!(fresh.train(1, &data(4), true).unwrap_err(), HawkesError::ModelNotInitialized);

        fresh.initialize();
        let params = fresh.params().unwrap();
        assert_eq!(
            fresh.build_log_likelihood(&data(3), &params),
            Err(HawkesError::BatchSizeMismatch { expected: 2, found: 3 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Each epoch records one cost per full batch and drops the remainder.
    //
    // Given
    // -----
    // - 7 sequences, B = 3, 2 epochs.
    //
    // Expect
    // ------
    // - 2 epochs × 2 batches; avg_cost is the mean of batch_costs; final
    //   parameters positive and equal to `params()`.
    fn train_reports_costs_per_epoch() {
        let mut mle = HawkesMLE::new(model(), options(3, 1e-3));

        let report = mle.train(2, &data(7), false).unwrap();

        assert_eq!(report.epochs.len(), 2);
        for e in &report.epochs {
            assert_eq!(e.n_batches, 2);
            assert_eq!(e.batch_costs.len(), 2);
            assert_relative_eq!(e.avg_cost, (e.batch_costs[0] + e.batch_costs[1]) / 2.0);
        }
        assert!(report.params.to_array().iter().all(|&p| p > 0.0));
        assert_eq!(report.params, mle.params().unwrap());
    }

    #[test]
    // Purpose
    // -------
    // A failing batch aborts training and reports where it happened.
    //
    // Given
    // -----
    // - A model whose density is NaN for every prefix; B = 2.
    //
    // Expect
    // ------
    // - `TrainingAborted { epoch: 0, batch: 0, completed_costs: [], .. }`
    //   with a non-empty reason.
    fn failing_step_aborts_training_with_position() {
        let mut mle = HawkesMLE::new(Broken, options(2, 1e-3));

        let err = mle.train(1, &data(4), false).unwrap_err();

        match err {
            HawkesError::TrainingAborted { epoch, batch, completed_costs, reason } => {
                assert_eq!((epoch, batch), (0, 0));
                assert!(completed_costs.is_empty());
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Models without an analytic gradient still train through the
    // finite-difference fallback.
    //
    // Given
    // -----
    // - The base-rate-only model on two hand-made sequences, B = 2.
    //
    // Expect
    // ------
    // - One step succeeds and changes μ.
    fn model_without_gradient_uses_finite_differences() {
        let batch = EventBatch::from_sequences(&[
            vec![[0.5, 0.0, 0.0], [1.0, 0.0, 0.0]],
            vec![[2.0, 0.0, 0.0]],
        ])
        .unwrap();
        let mut mle = HawkesMLE::new(Poissonish, options(2, 1e-2));
        mle.initialize();
        let mu0 = mle.params().unwrap().mu;

        mle.step(&batch).unwrap();

        assert!(mle.params().unwrap().mu != mu0);
    }

    #[test]
    // Purpose
    // -------
    // Standard errors come back finite and non-negative, one per parameter.
    //
    // Given
    // -----
    // - 5 simulated sequences at the generating parameters.
    //
    // Expect
    // ------
    // - 4 finite entries ≥ 0, and se(μ) > 0.
    fn standard_errors_are_finite_at_generating_parameters() {
        let mut mle = HawkesMLE::new(model(), options(5, 1e-3));
        mle.set_params(HawkesParams::new(0.2, 1.0, 0.1, 0.1).unwrap());

        let se = mle.standard_errors(&data(5)).unwrap();

        assert_eq!(se.len(), N_PARAMS);
        assert!(se.iter().all(|s| s.is_finite() && *s >= 0.0));
        assert!(se[0] > 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Standard errors need parameters and surface model failures.
    //
    // Given
    // -----
    // - A fresh trainer; an initialized trainer on the broken model.
    //
    // Expect
    // ------
    // - `ModelNotInitialized`, then the model's own error.
    fn standard_errors_report_failures() {
        let fresh = HawkesMLE::new(model(), options(2, 1e-3));
        assert_eq!(fresh.standard_errors(&data(2)), Err(HawkesError::ModelNotInitialized));

        let mut broken = HawkesMLE::new(Broken, options(2, 1e-3));
        broken.initialize();
        assert!(matches!(
            broken.standard_errors(&data(2)),
            Err(HawkesError::NonFiniteLogDensity { .. })
        ));
    }
}
