//! rust_pointprocess — maximum-likelihood estimation of marked
//! spatio-temporal Hawkes processes, with optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the Hawkes trainer to Python via the `_rust_pointprocess`
//! extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`hawkes`, `optimization`, `inference`)
//!   as the public crate surface.
//! - Define the `SpatialTemporalHawkesMLE` `#[pyclass]` and the
//!   `#[pymodule]` initializer when `python-bindings` is enabled.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue, input conversion, and error mapping.
//! - Event arrays are `(n_sequences, max_len, 3)` with rows `(t, x, y)` and
//!   zero padding (`t == 0`) after the last valid event.
//!
//! Conventions
//! -----------
//! - Errors from core Rust code travel as `HawkesError` and become Python
//!   `ValueError`s at the boundary.
//! - Parameters cross the boundary as `(mu, beta, sigma_x, sigma_y)` tuples.

pub mod hawkes;
pub mod inference;
pub mod optimization;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    hawkes::models::mle::HawkesMLE,
    utils::{build_hawkes_mle, extract_event_batch},
};

/// SpatialTemporalHawkesMLE — Python-facing wrapper for [`HawkesMLE`].
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `SpatialTemporalHawkesMLE(T, S, batch_size, C=1.0, data_dim=3,
/// keep_latest_k=None, lr=1e-3, seed=None)`:
/// - `T`: `(t_min, t_max)` observation window.
/// - `S`: `((x_min, x_max), (y_min, y_max))` spatial rectangle.
/// - `batch_size`: sequences per descent step.
/// - `C`: kernel constant.
/// - `keep_latest_k`: optional history cutoff per prefix.
///
/// Notes
/// -----
/// - `train` releases nothing back to Python until every epoch has run; the
///   per-epoch average costs are returned as a list.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_pointprocess", name = "SpatialTemporalHawkesMLE")]
pub struct PySpatialTemporalHawkesMLE {
    inner: HawkesMLE,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PySpatialTemporalHawkesMLE {
    #[new]
    #[pyo3(
        signature = (t, s, batch_size, c = 1.0, data_dim = 3, keep_latest_k = None, lr = 1e-3, seed = None),
        text_signature = "(T, S, batch_size, /, C=1.0, data_dim=3, keep_latest_k=None, lr=1e-3, seed=None)"
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        t: (f64, f64), s: ((f64, f64), (f64, f64)), batch_size: usize, c: f64, data_dim: usize,
        keep_latest_k: Option<usize>, lr: f64, seed: Option<u64>,
    ) -> PyResult<Self> {
        let inner = build_hawkes_mle(t, s, batch_size, c, data_dim, keep_latest_k, lr, seed)?;
        Ok(Self { inner })
    }

    /// Train for `epochs` passes; returns the average cost of every epoch.
    #[pyo3(signature = (epochs, expert_seqs, pretrained = false))]
    pub fn train(
        &mut self, py: Python<'_>, epochs: usize, expert_seqs: &Bound<'_, PyAny>, pretrained: bool,
    ) -> PyResult<Vec<f64>> {
        let data = extract_event_batch(expert_seqs)?;
        let report = py.allow_threads(|| self.inner.train(epochs, &data, pretrained))?;
        Ok(report.avg_costs())
    }

    /// Cost `−Σ LL / B` of one batch at the current parameters.
    pub fn cost(&self, batch: &Bound<'_, PyAny>) -> PyResult<f64> {
        let batch = extract_event_batch(batch)?;
        Ok(self.inner.cost(&batch)?)
    }

    /// Standard errors of `(mu, beta, sigma_x, sigma_y)` on one batch.
    pub fn standard_errors<'py>(
        &self, py: Python<'py>, batch: &Bound<'py, PyAny>,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let batch = extract_event_batch(batch)?;
        Ok(self.inner.standard_errors(&batch)?.into_pyarray_bound(py))
    }

    /// Current `(mu, beta, sigma_x, sigma_y)`.
    #[getter]
    pub fn params(&self) -> PyResult<(f64, f64, f64, f64)> {
        let p = self.inner.params()?;
        Ok((p.mu, p.beta, p.sigma_x, p.sigma_y))
    }

    #[setter]
    pub fn set_params(&mut self, value: (f64, f64, f64, f64)) -> PyResult<()> {
        let p = crate::hawkes::core::params::HawkesParams::new(value.0, value.1, value.2, value.3)?;
        self.inner.set_params(p);
        Ok(())
    }
}

#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_pointprocess(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySpatialTemporalHawkesMLE>()?;
    Ok(())
}
