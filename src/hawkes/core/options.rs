//! Hawkes options: estimation-time configuration for the trainer.
//!
//! Purpose
//! -------
//! Bundle the knobs of a training run (batch size, event dimensionality,
//! history cutoff, optimizer settings, starting parameters, shuffle seed) in
//! one validated value, so the trainer never sees ad-hoc arguments.
//!
//! Invariants & assumptions
//! ------------------------
//! - `batch_size > 0`, `data_dim == 3`, `cutoff != Some(0)`; checked by
//!   [`HawkesOptions::new`].
//! - `mle_opts` and `init` are validated by their own constructors.
//!
//! Conventions
//! -----------
//! - `seed = None` draws the shuffle RNG from OS entropy; `Some(s)` makes the
//!   epoch permutations reproducible.
use crate::{
    hawkes::{
        core::{
            data::DATA_DIM,
            params::HawkesParams,
            validation::{validate_batch_size, validate_cutoff, validate_data_dim},
        },
        errors::HawkesResult,
    },
    optimization::loglik_optimizer::MLEOptions,
};

/// Estimation-time configuration for [`HawkesMLE`](crate::hawkes::models::mle::HawkesMLE).
#[derive(Debug, Clone, PartialEq)]
pub struct HawkesOptions {
    /// Number of sequences per optimizer step.
    pub batch_size: usize,
    /// Coordinates per event; only 3 (time, x, y) is supported.
    pub data_dim: usize,
    /// Keep only the latest `k` events of each prefix when scoring it.
    pub cutoff: Option<usize>,
    /// Step size, stopping rules, and verbosity of the descent.
    pub mle_opts: MLEOptions,
    /// Parameters installed on a cold start.
    pub init: HawkesParams,
    /// Seed of the shuffle RNG.
    pub seed: Option<u64>,
}

impl HawkesOptions {
    /// # Errors
    /// - `InvalidBatchSize`, `InvalidDataDim`, or `InvalidCutoff`.
    pub fn new(
        batch_size: usize, data_dim: usize, cutoff: Option<usize>, mle_opts: MLEOptions,
    ) -> HawkesResult<Self> {
        validate_batch_size(batch_size)?;
        validate_data_dim(data_dim)?;
        validate_cutoff(cutoff)?;
        Ok(Self { batch_size, data_dim, cutoff, mle_opts, init: HawkesParams::initial(), seed: None })
    }

    /// Default optimizer settings, full history, `data_dim = 3`.
    ///
    /// # Errors
    /// - `InvalidBatchSize` for zero.
    pub fn with_batch_size(batch_size: usize) -> HawkesResult<Self> {
        Self::new(batch_size, DATA_DIM, None, MLEOptions::default())
    }

    pub fn with_init(mut self, init: HawkesParams) -> Self {
        self.init = init;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
