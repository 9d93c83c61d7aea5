//! Intensity model: log conditional density of the last event of a prefix.
//!
//! Purpose
//! -------
//! Define the seam between the likelihood scan and a concrete point-process
//! model ([`IntensityModel`]) and provide the spatio-temporal Hawkes model
//! with a diffusion kernel ([`SpatialTemporalHawkes`]).
//!
//! Key behaviors
//! -------------
//! - `log_conditional_density(prefix, cutoff, params)` truncates the prefix
//!   to its latest `k` events (when a cutoff is given) and scores its last
//!   event against the remaining history.
//! - A single-event prefix reduces to the base-rate density
//!   `log μ − μ |S| (t − t_min)`.
//! - Numerical failures are reported, never clamped: `λ ≤ 0` or non-finite
//!   gives [`HawkesError::NonPositiveIntensity`], a non-finite `log f` gives
//!   [`HawkesError::NonFiniteLogDensity`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Prefixes contain only valid events, in chronological order (the scan
//!   masks and compacts before calling in).
//! - Models are pure: no interior mutability, no side effects.
//!
//! Conventions
//! -----------
//! - Gradients are with respect to model-space parameters in the order
//!   `(μ, β, σx, σy)`; the θ-space chain rule lives in the trainer.
use crate::hawkes::{
    core::{
        data::{TIME, X, Y},
        domain::{SpatialDomain, TimeHorizon},
        kernel::DiffusionKernel,
        params::{HawkesParams, N_PARAMS},
        validation::validate_cutoff,
    },
    errors::{HawkesError, HawkesResult},
};
use ndarray::{Array1, ArrayView2, s};

/// Conditional-density contract consumed by the likelihood scan.
///
/// Implementors provide [`IntensityModel::log_density`] on an already
/// truncated window; truncation is shared through the provided methods.
pub trait IntensityModel {
    /// Log density of the last row of `window` given the earlier rows.
    fn log_density(&self, window: ArrayView2<'_, f64>, params: &HawkesParams) -> HawkesResult<f64>;

    /// Gradient of [`IntensityModel::log_density`] in `(μ, β, σx, σy)`.
    ///
    /// Models without a closed form keep the default, and the optimizer
    /// falls back to finite differences.
    fn log_density_grad(
        &self, _window: ArrayView2<'_, f64>, _params: &HawkesParams,
    ) -> HawkesResult<Array1<f64>> {
        Err(HawkesError::GradientNotImplemented)
    }

    fn log_conditional_density(
        &self, prefix: ArrayView2<'_, f64>, cutoff: Option<usize>, params: &HawkesParams,
    ) -> HawkesResult<f64> {
        self.log_density(truncate_history(prefix, cutoff)?, params)
    }

    fn log_conditional_density_grad(
        &self, prefix: ArrayView2<'_, f64>, cutoff: Option<usize>, params: &HawkesParams,
    ) -> HawkesResult<Array1<f64>> {
        self.log_density_grad(truncate_history(prefix, cutoff)?, params)
    }
}

/// Keep only the latest `k` rows of a prefix.
///
/// Returns a view into `prefix`, so the window is bit-identical to the
/// trailing rows. `None` or `k ≥ len` returns the whole prefix.
///
/// # Errors
/// - [`HawkesError::EmptyPrefix`] for a prefix without rows.
/// - [`HawkesError::InvalidCutoff`] for `Some(0)`.
pub fn truncate_history(
    prefix: ArrayView2<'_, f64>, cutoff: Option<usize>,
) -> HawkesResult<ArrayView2<'_, f64>> {
    let n = prefix.nrows();
    if n == 0 {
        return Err(HawkesError::EmptyPrefix);
    }
    validate_cutoff(cutoff)?;
    match cutoff {
        Some(k) if k < n => Ok(prefix.slice_move(s![n - k.., ..])),
        _ => Ok(prefix),
    }
}

/// Spatio-temporal Hawkes process with a diffusion kernel on a bounded
/// observation window.
///
/// Conditional intensity at `(t, x, y)`:
/// `λ = μ + Σ_i g(t − t_i, x − x_i, y − y_i)`.
///
/// Compensator between the previous event `t_p` and `t`:
/// `Λ = μ |S| (t − t_p) + Σ_i (C/β)(e^{−β (t_p − t_i)} − e^{−β (t − t_i)})`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialTemporalHawkes {
    horizon: TimeHorizon,
    domain: SpatialDomain,
    kernel: DiffusionKernel,
}

/// Intermediate sums shared by the value and the gradient.
#[derive(Debug, Default)]
struct DensityTerms {
    lambda: f64,
    compensator: f64,
    elapsed: f64,
    excite_dbeta: f64,
    excite_dsx: f64,
    excite_dsy: f64,
    compensator_dbeta: f64,
}

impl SpatialTemporalHawkes {
    /// # Errors
    /// - [`HawkesError::InvalidKernelConstant`] unless `c` is finite and `> 0`.
    pub fn new(horizon: TimeHorizon, domain: SpatialDomain, c: f64) -> HawkesResult<Self> {
        Ok(Self { horizon, domain, kernel: DiffusionKernel::new(c)? })
    }

    pub fn horizon(&self) -> &TimeHorizon {
        &self.horizon
    }

    pub fn domain(&self) -> &SpatialDomain {
        &self.domain
    }

    pub fn kernel(&self) -> &DiffusionKernel {
        &self.kernel
    }

    /// Intensity λ at the last event of `window`, given the earlier rows.
    pub fn intensity(&self, window: ArrayView2<'_, f64>, params: &HawkesParams) -> HawkesResult<f64> {
        Ok(self.terms(window, params)?.lambda)
    }

    fn terms(&self, window: ArrayView2<'_, f64>, params: &HawkesParams) -> HawkesResult<DensityTerms> {
        let n = window.nrows();
        if n == 0 {
            return Err(HawkesError::EmptyPrefix);
        }
        let last = window.row(n - 1);
        let (t, x, y) = (last[TIME], last[X], last[Y]);
        let area = self.domain.area();

        if n == 1 {
            let elapsed = t - self.horizon.min;
            return Ok(DensityTerms {
                lambda: params.mu,
                compensator: params.mu * area * elapsed,
                elapsed,
                ..DensityTerms::default()
            });
        }

        let t_prev = window[[n - 2, TIME]];
        let elapsed = t - t_prev;
        let mut terms = DensityTerms {
            lambda: params.mu,
            compensator: params.mu * area * elapsed,
            elapsed,
            ..DensityTerms::default()
        };
        for event in window.slice(s![..n - 1, ..]).outer_iter() {
            let g = self.kernel.value_and_grad(t - event[TIME], x - event[X], y - event[Y], params);
            terms.lambda += g.value;
            terms.excite_dbeta += g.d_beta;
            terms.excite_dsx += g.d_sigma_x;
            terms.excite_dsy += g.d_sigma_y;

            let (a, b) = (t_prev - event[TIME], t - event[TIME]);
            terms.compensator += self.kernel.integral(a, b, params.beta);
            terms.compensator_dbeta += self.kernel.integral_dbeta(a, b, params.beta);
        }
        Ok(terms)
    }
}

impl DensityTerms {
    fn checked_lambda(&self) -> HawkesResult<f64> {
        if !self.lambda.is_finite() || self.lambda <= 0.0 {
            return Err(HawkesError::NonPositiveIntensity { value: self.lambda });
        }
        Ok(self.lambda)
    }

    fn log_density(&self) -> HawkesResult<f64> {
        let value = self.checked_lambda()?.ln() - self.compensator;
        if !value.is_finite() {
            return Err(HawkesError::NonFiniteLogDensity { value });
        }
        Ok(value)
    }
}

impl IntensityModel for SpatialTemporalHawkes {
    fn log_density(&self, window: ArrayView2<'_, f64>, params: &HawkesParams) -> HawkesResult<f64> {
        self.terms(window, params)?.log_density()
    }

    fn log_density_grad(
        &self, window: ArrayView2<'_, f64>, params: &HawkesParams,
    ) -> HawkesResult<Array1<f64>> {
        let terms = self.terms(window, params)?;
        terms.log_density()?;
        let lambda = terms.lambda;
        let mut grad = Array1::zeros(N_PARAMS);
        grad[0] = 1.0 / lambda - self.domain.area() * terms.elapsed;
        grad[1] = terms.excite_dbeta / lambda - terms.compensator_dbeta;
        grad[2] = terms.excite_dsx / lambda;
        grad[3] = terms.excite_dsy / lambda;
        Ok(grad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};
    use std::f64::consts::PI as PI_F;

    fn model(c: f64) -> SpatialTemporalHawkes {
        SpatialTemporalHawkes::new(
            TimeHorizon::new(0.0, 10.0).unwrap(),
            SpatialDomain::new((-1.0, 1.0), (-1.0, 1.0)).unwrap(),
            c,
        )
        .unwrap()
    }

    fn prefix() -> Array2<f64> {
        array![[0.5, 0.1, -0.2], [0.9, 0.0, 0.1], [1.4, -0.3, 0.2], [2.0, 0.2, 0.0]]
    }

    #[test]
    // Purpose
    // -------
    // A single event is scored by the base rate alone.
    //
    // Given
    // -----
    // - μ = 0.2, |S| = 4, T = [0, 10], event at t = 1.5.
    //
    // Expect
    // ------
    // - log f = ln 0.2 − 0.2 · 4 · 1.5.
    fn single_event_reduces_to_base_rate() {
        let params = HawkesParams::new(0.2, 1.0, 0.1, 0.1).unwrap();

        let value = model(0.5)
            .log_conditional_density(array![[1.5, 0.3, 0.3]].view(), None, &params)
            .unwrap();

        assert_relative_eq!(value, 0.2f64.ln() - 0.2 * 4.0 * 1.5, max_relative = 1e-14);
    }

    #[test]
    // Purpose
    // -------
    // Two-event density matches a hand computation of λ and Λ.
    //
    // Given
    // -----
    // - Events (1, 0, 0) then (2, 0.1, 0); μ = 0.2, β = 1, σ = 0.5, C = 0.5.
    //
    // Expect
    // ------
    // - λ = μ + C/(2π σ² Δt)·exp(−β − 0.01/(2σ²)); Λ = μ|S|·1 + (C/β)(1 − e^{−1}).
    fn two_event_density_matches_closed_form() {
        let params = HawkesParams::new(0.2, 1.0, 0.5, 0.5).unwrap();
        let window = array![[1.0, 0.0, 0.0], [2.0, 0.1, 0.0]];

        let value = model(0.5).log_density(window.view(), &params).unwrap();

        let g = 0.5 / (2.0 * PI_F * 0.25) * (-1.0f64 - 0.01 / 0.5).exp();
        let lambda = 0.2 + g;
        let comp = 0.2 * 4.0 + 0.5 * (1.0 - (-1.0f64).exp());
        assert_relative_eq!(value, lambda.ln() - comp, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // The cutoff window is exactly the trailing `k` rows.
    //
    // Given
    // -----
    // - A 4-row prefix and k = 2, 4, 10; k = 0.
    //
    // Expect
    // ------
    // - k = 2 gives rows 2..4 unchanged; k ≥ 4 gives the whole prefix.
    // - k = 0 is `InvalidCutoff`.
    fn truncate_history_keeps_latest_rows() {
        let p = prefix();

        assert_eq!(truncate_history(p.view(), Some(2)).unwrap(), p.slice(s![2.., ..]));
        assert_eq!(truncate_history(p.view(), Some(4)).unwrap(), p.view());
        assert_eq!(truncate_history(p.view(), Some(10)).unwrap(), p.view());
        assert_eq!(truncate_history(p.view(), Some(0)), Err(HawkesError::InvalidCutoff { value: 0 }));
        assert_eq!(
            truncate_history(Array2::<f64>::zeros((0, 3)).view(), None),
            Err(HawkesError::EmptyPrefix)
        );
    }

    #[test]
    // Purpose
    // -------
    // The analytic gradient agrees with central differences of the density.
    //
    // Given
    // -----
    // - A 4-event prefix, μ = 0.3, β = 1.2, σx = 0.4, σy = 0.25, C = 0.6.
    //
    // Expect
    // ------
    // - Each component within 1e-6 of the finite-difference derivative.
    fn analytic_gradient_matches_finite_differences() {
        let m = model(0.6);
        let p = prefix();
        let base = HawkesParams::new(0.3, 1.2, 0.4, 0.25).unwrap();
        let h = 1e-6;

        let grad = m.log_density_grad(p.view(), &base).unwrap();

        let arr = base.to_array();
        for j in 0..N_PARAMS {
            let (mut up, mut dn) = (arr.clone(), arr.clone());
            up[j] += h;
            dn[j] -= h;
            let f = |a: &Array1<f64>| {
                let q = HawkesParams::new(a[0], a[1], a[2], a[3]).unwrap();
                m.log_density(p.view(), &q).unwrap()
            };
            let fd = (f(&up) - f(&dn)) / (2.0 * h);
            assert_relative_eq!(grad[j], fd, epsilon = 1e-6, max_relative = 1e-6);
        }
    }

    #[test]
    // Purpose
    // -------
    // A simultaneous pair contributes no excitation.
    //
    // Given
    // -----
    // - Two events at the same time and place.
    //
    // Expect
    // ------
    // - λ = μ exactly.
    fn simultaneous_events_do_not_excite() {
        let params = HawkesParams::new(0.2, 1.0, 0.1, 0.1).unwrap();
        let window = array![[1.0, 0.0, 0.0], [1.0, 0.0, 0.0]];

        assert_eq!(model(0.5).intensity(window.view(), &params).unwrap(), 0.2);
    }

    #[test]
    // Purpose
    // -------
    // Overflowing excitation is reported instead of clamped.
    //
    // Given
    // -----
    // - Bandwidths of 1e-160 so the kernel normalizer overflows to +inf.
    //
    // Expect
    // ------
    // - `NonPositiveIntensity { value: inf }`.
    fn overflowing_intensity_is_an_error() {
        let params = HawkesParams::new(0.2, 1.0, 1e-160, 1e-160).unwrap();
        let window = array![[1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];

        let result = model(0.5).log_density(window.view(), &params);

        assert!(matches!(result, Err(HawkesError::NonPositiveIntensity { value }) if value.is_infinite()));
    }
}
