//! core — Hawkes event data, parameters, intensity model, and likelihood scan.
//!
//! Purpose
//! -------
//! Collect the numerical building blocks for fitting a marked spatio-temporal
//! Hawkes process: the observation window, validated event batches, the
//! θ ↔ parameter mapping, the diffusion kernel, the conditional-density
//! model, the prefix scan that turns sequences into log-likelihoods, and a
//! cluster simulator for synthetic data.
//!
//! Key behaviors
//! -------------
//! - [`EventBatch`] owns a `[n, max_len, 3]` array of `(time, x, y)` events
//!   with padding marked by non-positive times.
//! - [`SpatialTemporalHawkes`] implements [`IntensityModel`] with an
//!   analytic gradient in `(μ, β, σx, σy)`.
//! - [`batch_log_likelihood`] and friends fold per-prefix terms over every
//!   valid event of every sequence.
//! - [`simulate_batch`] draws padded batches from the same process.
//!
//! Invariants & assumptions
//! ------------------------
//! - Successfully constructed batches have width 3, finite entries, and
//!   chronologically ordered valid events.
//! - Parameters are strictly positive; θ-space is unconstrained.
//! - Numerical failures (`λ ≤ 0`, non-finite `log f`) surface as errors and
//!   are never clamped.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based; event columns are [`TIME`], [`X`], [`Y`].
//! - No I/O and no logging here; the trainer in `hawkes::models` logs.

pub mod data;
pub mod domain;
pub mod intensity;
pub mod kernel;
pub mod options;
pub mod params;
pub mod scan;
pub mod simulate;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::{DATA_DIM, EventBatch, TIME, X, Y, compact_sequence, event_mask, n_valid};
pub use self::domain::{SpatialDomain, TimeHorizon};
pub use self::intensity::{IntensityModel, SpatialTemporalHawkes, truncate_history};
pub use self::kernel::{DiffusionKernel, KernelEval};
pub use self::options::HawkesOptions;
pub use self::params::{HawkesParams, N_PARAMS, PARAM_NAMES, theta_jacobian};
pub use self::scan::{
    Prefixes, batch_cost, batch_log_likelihood, batch_log_likelihood_grad,
    cumulative_log_likelihood, per_sequence_log_likelihood, sequence_log_likelihood,
    sequence_log_likelihood_grad,
};
pub use self::simulate::{SimOpts, simulate_batch, simulate_sequence};

pub mod prelude {
    pub use super::data::EventBatch;
    pub use super::domain::{SpatialDomain, TimeHorizon};
    pub use super::intensity::{IntensityModel, SpatialTemporalHawkes};
    pub use super::options::HawkesOptions;
    pub use super::params::HawkesParams;
    pub use super::simulate::{SimOpts, simulate_batch};
}
