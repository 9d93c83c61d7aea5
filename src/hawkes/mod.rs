//! hawkes — spatio-temporal Hawkes stack: core numerics, trainer, and errors.
//!
//! Purpose
//! -------
//! Bundle everything needed to estimate a marked spatio-temporal Hawkes
//! process by maximum likelihood: validated event data and parameters
//! (`core`), the mini-batch gradient-descent trainer (`models`), and the
//! shared error surface (`errors`).
//!
//! Key behaviors
//! -------------
//! - `core` scores every valid prefix of every sequence with an
//!   `IntensityModel` and sums the terms into a batch log-likelihood.
//! - `models` owns the parameter state, shuffles sequences into batches each
//!   epoch, and takes one fixed-step descent update per batch through
//!   `optimization::loglik_optimizer`.
//! - `errors` reports data, configuration, numerical, training, and
//!   simulation failures as a single `HawkesError`.
//!
//! Downstream usage
//! ----------------
//! - Build a `SpatialTemporalHawkes` from a `TimeHorizon`, `SpatialDomain`,
//!   and kernel constant; wrap it in `HawkesMLE` with `HawkesOptions`; call
//!   `train` with an `EventBatch`.

pub mod core;
pub mod errors;
pub mod models;

pub mod prelude {
    pub use super::core::prelude::*;
    pub use super::errors::{HawkesError, HawkesResult};
    pub use super::models::prelude::*;
}
