//! Errors for spatio-temporal Hawkes estimation (data validation, option
//! checks, density evaluation, training, and simulation).
//!
//! This module defines [`HawkesError`] and the [`HawkesResult`] alias used
//! across the Rust core and, behind the `python-bindings` feature, converted
//! into `PyErr` at the PyO3 boundary.
//!
//! ## Conventions
//! - **Indices are 0-based**: `sequence` indexes the batch axis, `event` the
//!   position inside a padded sequence, `dim` the (time, x, y) axis.
//! - Numerical failures are never clamped away; they surface here and abort
//!   the current run.
//! - Optimizer/backend errors are normalized to
//!   [`HawkesError::OptimizationFailed`] with a human-readable status.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

use crate::optimization::errors::OptError;

/// Crate-wide result alias for Hawkes operations.
pub type HawkesResult<T> = Result<T, HawkesError>;

/// Unified error type for Hawkes modeling.
#[derive(Debug, Clone, PartialEq)]
pub enum HawkesError {
    // ---- Input/data validation ----
    /// The batch contains no sequences.
    EmptyBatch,

    /// Array shape does not match the expected layout.
    DimensionMismatch { expected: usize, found: usize },

    /// Configured data dimensionality is not supported.
    InvalidDataDim { expected: usize, found: usize },

    /// A batch handed to the likelihood has the wrong number of sequences.
    BatchSizeMismatch { expected: usize, found: usize },

    /// A coordinate is NaN/±inf.
    NonFiniteData { sequence: usize, event: usize, dim: usize, value: f64 },

    /// Valid events of a sequence are not in chronological order.
    UnsortedEvents { sequence: usize, event: usize, previous: f64, value: f64 },

    // ---- Domain / options ----
    /// Time horizon must be finite with 0 ≤ min < max.
    InvalidTimeHorizon { min: f64, max: f64, reason: &'static str },

    /// Spatial domain bounds must be finite with min < max on both axes.
    InvalidSpatialDomain { axis: usize, min: f64, max: f64 },

    /// Kernel constant must be finite and > 0.
    InvalidKernelConstant { value: f64 },

    /// Cutoff `k` must keep at least one event.
    InvalidCutoff { value: usize },

    /// Batch size must be > 0.
    InvalidBatchSize { value: usize },

    // ---- Parameters ----
    /// A model parameter is non-finite or ≤ 0.
    InvalidParam { name: &'static str, value: f64 },

    /// Theta length mismatch for `HawkesParams`.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// Unconstrained optimization input must have finite values.
    InvalidThetaInput { index: usize, value: f64 },

    // ---- Density evaluation ----
    /// A prefix must contain at least one event.
    EmptyPrefix,

    /// Conditional intensity at an event must be finite and > 0.
    NonPositiveIntensity { value: f64 },

    /// Log conditional density evaluated to NaN/±inf.
    NonFiniteLogDensity { value: f64 },

    /// The intensity model has no analytic gradient.
    GradientNotImplemented,

    // ---- Training ----
    /// Fewer sequences than one full batch.
    InsufficientData { n_data: usize, batch_size: usize },

    /// Warm start requested before parameters were ever initialized.
    ModelNotInitialized,

    /// Optimizer failed; carries the backend status.
    OptimizationFailed { status: String },

    /// A batch step failed mid-run; carries the costs completed so far in
    /// the failing epoch.
    TrainingAborted { epoch: usize, batch: usize, completed_costs: Vec<f64>, reason: String },

    // ---- Simulation ----
    /// Branching ratio `C / β` must be < 1 for a finite cluster process.
    Supercritical { ratio: f64 },

    /// Simulation settings or distributions could not be constructed.
    InvalidSimulation { reason: String },
}

impl std::error::Error for HawkesError {}

impl std::fmt::Display for HawkesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/data validation ----
            HawkesError::EmptyBatch => write!(f, "Event batch must contain at least one sequence"),
            HawkesError::DimensionMismatch { expected, found } => {
                write!(f, "Dimension mismatch: expected {expected}, found {found}")
            }
            HawkesError::InvalidDataDim { expected, found } => {
                write!(f, "Unsupported data dimensionality {found}: events must be {expected}-D (time, x, y)")
            }
            HawkesError::BatchSizeMismatch { expected, found } => {
                write!(f, "Batch size mismatch: expected {expected} sequences, found {found}")
            }
            HawkesError::NonFiniteData { sequence, event, dim, value } => {
                write!(
                    f,
                    "Non-finite coordinate {value} at sequence {sequence}, event {event}, dim {dim}"
                )
            }
            HawkesError::UnsortedEvents { sequence, event, previous, value } => {
                write!(
                    f,
                    "Events of sequence {sequence} are not chronological: event {event} at time {value} follows time {previous}"
                )
            }

            // ---- Domain / options ----
            HawkesError::InvalidTimeHorizon { min, max, reason } => {
                write!(f, "Invalid time horizon [{min}, {max}]: {reason}")
            }
            HawkesError::InvalidSpatialDomain { axis, min, max } => {
                write!(f, "Invalid spatial bounds [{min}, {max}] on axis {axis}: need finite min < max")
            }
            HawkesError::InvalidKernelConstant { value } => {
                write!(f, "Kernel constant C must be finite and > 0, got {value}")
            }
            HawkesError::InvalidCutoff { value } => {
                write!(f, "History cutoff must keep at least one event, got {value}")
            }
            HawkesError::InvalidBatchSize { value } => {
                write!(f, "Batch size must be > 0, got {value}")
            }

            // ---- Parameters ----
            HawkesError::InvalidParam { name, value } => {
                write!(f, "Parameter {name} must be finite and > 0, got {value}")
            }
            HawkesError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, got {actual}")
            }
            HawkesError::InvalidThetaInput { index, value } => {
                write!(f, "Theta input at index {index} must be finite, got {value}")
            }

            // ---- Density evaluation ----
            HawkesError::EmptyPrefix => write!(f, "Conditional density needs at least one event"),
            HawkesError::NonPositiveIntensity { value } => {
                write!(f, "Conditional intensity must be finite and > 0, got {value}")
            }
            HawkesError::NonFiniteLogDensity { value } => {
                write!(f, "Log conditional density is not finite: {value}")
            }
            HawkesError::GradientNotImplemented => {
                write!(f, "Intensity model provides no analytic gradient")
            }

            // ---- Training ----
            HawkesError::InsufficientData { n_data, batch_size } => {
                write!(f, "Need at least one full batch: {n_data} sequences < batch size {batch_size}")
            }
            HawkesError::ModelNotInitialized => {
                write!(f, "Model parameters were never initialized; cannot warm start")
            }
            HawkesError::OptimizationFailed { status } => {
                write!(f, "Optimization failed: {status}")
            }
            HawkesError::TrainingAborted { epoch, batch, completed_costs, reason } => {
                write!(
                    f,
                    "Training aborted at epoch {epoch}, batch {batch} ({} batches completed): {reason}",
                    completed_costs.len()
                )
            }

            // ---- Simulation ----
            HawkesError::Supercritical { ratio } => {
                write!(f, "Branching ratio C/beta = {ratio} must be < 1")
            }
            HawkesError::InvalidSimulation { reason } => {
                write!(f, "Invalid simulation settings: {reason}")
            }
        }
    }
}

impl From<OptError> for HawkesError {
    fn from(err: OptError) -> Self {
        match err {
            OptError::GradientNotImplemented => HawkesError::GradientNotImplemented,
            OptError::ThetaLengthMismatch { expected, actual } => {
                HawkesError::ThetaLengthMismatch { expected, actual }
            }
            OptError::InvalidThetaInput { index, value } => {
                HawkesError::InvalidThetaInput { index, value }
            }
            other => HawkesError::OptimizationFailed { status: other.to_string() },
        }
    }
}

/// Convert a [`HawkesError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<HawkesError> for PyErr {
    fn from(err: HawkesError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
