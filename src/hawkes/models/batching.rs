//! Per-epoch shuffling and contiguous partition of sequence indices.
//!
//! Every epoch draws a fresh uniform permutation of `0..n_data` and cuts it
//! into `floor(n_data / batch_size)` contiguous blocks. The trailing
//! `n_data mod batch_size` indices are dropped for that epoch.
use crate::hawkes::{
    core::validation::validate_batch_size,
    errors::{HawkesError, HawkesResult},
};
use rand::{Rng, seq::SliceRandom};

/// Shuffled sequence order for one epoch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpochPlan {
    order: Vec<usize>,
    batch_size: usize,
}

impl EpochPlan {
    /// Fisher–Yates shuffle of `0..n_data` with `rng`.
    ///
    /// # Errors
    /// - [`HawkesError::InvalidBatchSize`] for a zero batch size.
    /// - [`HawkesError::InsufficientData`] when `n_data < batch_size`, since
    ///   the epoch would contain no batch at all.
    pub fn shuffled<R: Rng + ?Sized>(n_data: usize, batch_size: usize, rng: &mut R) -> HawkesResult<Self> {
        validate_batch_size(batch_size)?;
        if n_data < batch_size {
            return Err(HawkesError::InsufficientData { n_data, batch_size });
        }
        let mut order: Vec<usize> = (0..n_data).collect();
        order.shuffle(rng);
        Ok(Self { order, batch_size })
    }

    pub fn n_batches(&self) -> usize {
        self.order.len() / self.batch_size
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Full permutation, dropped tail included.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Contiguous blocks of exactly `batch_size` indices.
    pub fn batches(&self) -> impl Iterator<Item = &[usize]> {
        self.order.chunks_exact(self.batch_size)
    }

    /// Indices left out of this epoch.
    pub fn dropped(&self) -> &[usize] {
        &self.order[self.n_batches() * self.batch_size..]
    }
}
