//! Python-boundary helpers: event-array extraction and trainer construction.
//!
//! Everything here is compiled only with the `python-bindings` feature.
#[cfg(feature = "python-bindings")]
use numpy::PyReadonlyArray3;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyTypeError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    hawkes::{
        core::{
            data::{DATA_DIM, EventBatch},
            domain::{SpatialDomain, TimeHorizon},
            intensity::SpatialTemporalHawkes,
            options::HawkesOptions,
        },
        errors::HawkesError,
        models::mle::HawkesMLE,
    },
    optimization::loglik_optimizer::MLEOptions,
};

/// Convert a Python object into an [`EventBatch`].
///
/// Accepted inputs, tried in order:
/// - a 3-D `float64` numpy array of shape `(n_sequences, max_len, 3)`;
/// - a 3-D `float32` numpy array (widened to `f64`);
/// - a nested sequence `[[[t, x, y], ...], ...]`, possibly ragged, which is
///   zero-padded to the longest sequence.
#[cfg(feature = "python-bindings")]
pub fn extract_event_batch(raw: &Bound<'_, PyAny>) -> PyResult<EventBatch> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray3<f64>>() {
        return Ok(EventBatch::new(arr.as_array().to_owned())?);
    }
    if let Ok(arr) = raw.extract::<PyReadonlyArray3<f32>>() {
        return Ok(EventBatch::new(arr.as_array().mapv(f64::from))?);
    }

    let nested: Vec<Vec<Vec<f64>>> = raw.extract().map_err(|_| {
        PyTypeError::new_err(
            "expected a 3-D numpy.ndarray of shape (n_sequences, max_len, 3) or a nested sequence of [t, x, y] events",
        )
    })?;
    let sequences = nested
        .into_iter()
        .map(|seq| {
            seq.into_iter()
                .map(|event| {
                    <[f64; DATA_DIM]>::try_from(event.as_slice()).map_err(|_| {
                        HawkesError::DimensionMismatch { expected: DATA_DIM, found: event.len() }
                    })
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(EventBatch::from_sequences(&sequences)?)
}

/// Validate Python-side settings and assemble a trainer.
#[cfg(feature = "python-bindings")]
#[allow(clippy::too_many_arguments)]
pub fn build_hawkes_mle(
    t: (f64, f64), s: ((f64, f64), (f64, f64)), batch_size: usize, c: f64, data_dim: usize,
    keep_latest_k: Option<usize>, lr: f64, seed: Option<u64>,
) -> PyResult<HawkesMLE> {
    let model = SpatialTemporalHawkes::new(TimeHorizon::new(t.0, t.1)?, SpatialDomain::new(s.0, s.1)?, c)?;
    let mle_opts = MLEOptions::new(MLEOptions::default().tols, lr, false).map_err(HawkesError::from)?;
    let mut options = HawkesOptions::new(batch_size, data_dim, keep_latest_k, mle_opts)?;
    if let Some(seed) = seed {
        options = options.with_seed(seed);
    }
    Ok(HawkesMLE::new(model, options))
}
