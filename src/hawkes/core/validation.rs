//! Shared validators for Hawkes inputs: event arrays, parameters, θ-vectors,
//! and training options.
//!
//! Every function returns the first violation it meets as a [`HawkesError`];
//! none of them clamp or repair values.
use crate::hawkes::{
    core::data::{DATA_DIM, TIME},
    errors::{HawkesError, HawkesResult},
};
use ndarray::{ArrayView1, ArrayView3, Axis};

/// Check shape, finiteness, and chronological order of a padded batch.
///
/// # Errors
/// - [`HawkesError::DimensionMismatch`] if the last axis is not [`DATA_DIM`].
/// - [`HawkesError::EmptyBatch`] if there are no sequences.
/// - [`HawkesError::NonFiniteData`] at the first NaN/±inf.
/// - [`HawkesError::UnsortedEvents`] when a valid event precedes the last
///   valid event before it.
pub fn validate_events(events: ArrayView3<'_, f64>) -> HawkesResult<()> {
    let width = events.len_of(Axis(2));
    if width != DATA_DIM {
        return Err(HawkesError::DimensionMismatch { expected: DATA_DIM, found: width });
    }
    if events.len_of(Axis(0)) == 0 {
        return Err(HawkesError::EmptyBatch);
    }
    for ((sequence, event, dim), &value) in events.indexed_iter() {
        if !value.is_finite() {
            return Err(HawkesError::NonFiniteData { sequence, event, dim, value });
        }
    }
    for (sequence, seq) in events.outer_iter().enumerate() {
        let mut previous: Option<f64> = None;
        for (event, &t) in seq.column(TIME).iter().enumerate() {
            if t <= 0.0 {
                continue;
            }
            if let Some(prev) = previous {
                if t < prev {
                    return Err(HawkesError::UnsortedEvents {
                        sequence,
                        event,
                        previous: prev,
                        value: t,
                    });
                }
            }
            previous = Some(t);
        }
    }
    Ok(())
}

/// A model parameter must be finite and strictly positive.
///
/// # Errors
/// - [`HawkesError::InvalidParam`] naming the parameter.
pub fn validate_positive(name: &'static str, value: f64) -> HawkesResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(HawkesError::InvalidParam { name, value });
    }
    Ok(())
}

/// θ must have the expected length and finite entries.
///
/// # Errors
/// - [`HawkesError::ThetaLengthMismatch`] or [`HawkesError::InvalidThetaInput`].
pub fn validate_theta(theta: ArrayView1<'_, f64>, expected: usize) -> HawkesResult<()> {
    if theta.len() != expected {
        return Err(HawkesError::ThetaLengthMismatch { expected, actual: theta.len() });
    }
    if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(HawkesError::InvalidThetaInput { index, value });
    }
    Ok(())
}

/// `Some(0)` would drop the event being scored.
///
/// # Errors
/// - [`HawkesError::InvalidCutoff`].
pub fn validate_cutoff(cutoff: Option<usize>) -> HawkesResult<()> {
    match cutoff {
        Some(0) => Err(HawkesError::InvalidCutoff { value: 0 }),
        _ => Ok(()),
    }
}

/// # Errors
/// - [`HawkesError::InvalidBatchSize`] for zero.
pub fn validate_batch_size(batch_size: usize) -> HawkesResult<()> {
    if batch_size == 0 {
        return Err(HawkesError::InvalidBatchSize { value: batch_size });
    }
    Ok(())
}

/// Only (time, x, y) events are supported.
///
/// # Errors
/// - [`HawkesError::InvalidDataDim`].
pub fn validate_data_dim(data_dim: usize) -> HawkesResult<()> {
    if data_dim != DATA_DIM {
        return Err(HawkesError::InvalidDataDim { expected: DATA_DIM, found: data_dim });
    }
    Ok(())
}
