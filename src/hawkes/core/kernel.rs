//! Diffusion kernel of the self-exciting term.
//!
//! For a lag `Δt > 0` and offsets `(Δx, Δy)`:
//!
//! `g = C / (2π σx σy Δt) · exp(−β Δt − (Δx²/σx² + Δy²/σy²) / (2 Δt))`
//!
//! i.e. an exponentially decaying temporal factor times a Gaussian whose
//! variance grows linearly with the lag. Integrated over ℝ², `g` collapses to
//! `C e^{−β Δt}`, which is what the compensator uses.
//!
//! Lags `Δt ≤ 0` contribute exactly zero (value and derivatives).
use crate::hawkes::{
    core::params::HawkesParams,
    errors::{HawkesError, HawkesResult},
};
use std::f64::consts::PI;

/// Diffusion kernel with excitation constant `C`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffusionKernel {
    c: f64,
}

/// Kernel value with its partial derivatives in `(β, σx, σy)`.
///
/// The kernel does not depend on μ, so there is no μ slot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KernelEval {
    pub value: f64,
    pub d_beta: f64,
    pub d_sigma_x: f64,
    pub d_sigma_y: f64,
}

impl DiffusionKernel {
    /// # Errors
    /// - [`HawkesError::InvalidKernelConstant`] unless `c` is finite and `> 0`.
    pub fn new(c: f64) -> HawkesResult<Self> {
        if !c.is_finite() || c <= 0.0 {
            return Err(HawkesError::InvalidKernelConstant { value: c });
        }
        Ok(Self { c })
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    /// Kernel value `g(Δt, Δx, Δy)`.
    pub fn value(&self, dt: f64, dx: f64, dy: f64, params: &HawkesParams) -> f64 {
        self.value_and_grad(dt, dx, dy, params).value
    }

    /// Kernel value and its derivatives:
    ///
    /// - `∂g/∂β  = −Δt · g`
    /// - `∂g/∂σx = g · (−1/σx + Δx² / (σx³ Δt))`
    /// - `∂g/∂σy = g · (−1/σy + Δy² / (σy³ Δt))`
    pub fn value_and_grad(&self, dt: f64, dx: f64, dy: f64, params: &HawkesParams) -> KernelEval {
        if dt <= 0.0 {
            return KernelEval::default();
        }
        let (sx, sy) = (params.sigma_x, params.sigma_y);
        let spatial = (dx * dx / (sx * sx) + dy * dy / (sy * sy)) / (2.0 * dt);
        let value = self.c / (2.0 * PI * sx * sy * dt) * (-params.beta * dt - spatial).exp();
        KernelEval {
            value,
            d_beta: -dt * value,
            d_sigma_x: value * (-1.0 / sx + dx * dx / (sx * sx * sx * dt)),
            d_sigma_y: value * (-1.0 / sy + dy * dy / (sy * sy * sy * dt)),
        }
    }

    /// Space-time integral of one history term between lags `a ≤ b`:
    /// `(C/β) (e^{−β a} − e^{−β b})`.
    pub fn integral(&self, a: f64, b: f64, beta: f64) -> f64 {
        self.c / beta * ((-beta * a).exp() - (-beta * b).exp())
    }

    /// `∂/∂β` of [`DiffusionKernel::integral`]:
    /// `−(C/β²)(e^{−β a} − e^{−β b}) + (C/β)(b e^{−β b} − a e^{−β a})`.
    pub fn integral_dbeta(&self, a: f64, b: f64, beta: f64) -> f64 {
        let (ea, eb) = ((-beta * a).exp(), (-beta * b).exp());
        -self.c / (beta * beta) * (ea - eb) + self.c / beta * (b * eb - a * ea)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params() -> HawkesParams {
        HawkesParams::new(0.2, 1.3, 0.4, 0.7).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Non-positive lags never excite.
    //
    // Given
    // -----
    // - Δt = 0 and Δt = -1 with zero spatial offset.
    //
    // Expect
    // ------
    // - Value and all derivatives are exactly 0.
    fn kernel_is_zero_for_non_positive_lag() {
        let k = DiffusionKernel::new(1.0).unwrap();
        assert_eq!(k.value_and_grad(0.0, 0.0, 0.0, &params()), KernelEval::default());
        assert_eq!(k.value(-1.0, 0.0, 0.0, &params()), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Closed-form derivatives agree with central differences.
    //
    // Given
    // -----
    // - C = 0.8, (Δt, Δx, Δy) = (0.6, 0.3, -0.5), step 1e-6.
    //
    // Expect
    // ------
    // - ∂g/∂β, ∂g/∂σx, ∂g/∂σy within 1e-6 of the numerical derivative.
    fn kernel_derivatives_match_finite_differences() {
        let k = DiffusionKernel::new(0.8).unwrap();
        let p = params();
        let (dt, dx, dy, h) = (0.6, 0.3, -0.5, 1e-6);
        let eval = k.value_and_grad(dt, dx, dy, &p);

        let bump = |f: &dyn Fn(&mut HawkesParams, f64)| {
            let (mut up, mut dn) = (p, p);
            f(&mut up, h);
            f(&mut dn, -h);
            (k.value(dt, dx, dy, &up) - k.value(dt, dx, dy, &dn)) / (2.0 * h)
        };

        assert_relative_eq!(eval.d_beta, bump(&|q, e| q.beta += e), epsilon = 1e-6);
        assert_relative_eq!(eval.d_sigma_x, bump(&|q, e| q.sigma_x += e), epsilon = 1e-6);
        assert_relative_eq!(eval.d_sigma_y, bump(&|q, e| q.sigma_y += e), epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // The time integral and its β-derivative are consistent.
    //
    // Given
    // -----
    // - C = 0.5, a = 0.2, b = 1.7, β = 1.3.
    //
    // Expect
    // ------
    // - integral = (C/β)(e^{-βa} − e^{-βb}) and integral_dbeta matches a
    //   central difference in β.
    fn integral_and_beta_derivative_are_consistent() {
        let k = DiffusionKernel::new(0.5).unwrap();
        let (a, b, beta, h): (f64, f64, f64, f64) = (0.2, 1.7, 1.3, 1e-6);

        let expected = 0.5 / beta * ((-beta * a).exp() - (-beta * b).exp());
        let fd = (k.integral(a, b, beta + h) - k.integral(a, b, beta - h)) / (2.0 * h);

        assert_relative_eq!(k.integral(a, b, beta), expected, max_relative = 1e-14);
        assert_relative_eq!(k.integral_dbeta(a, b, beta), fd, epsilon = 1e-8);
    }

    #[test]
    fn new_rejects_non_positive_constant() {
        assert_eq!(DiffusionKernel::new(0.0), Err(HawkesError::InvalidKernelConstant { value: 0.0 }));
    }
}
