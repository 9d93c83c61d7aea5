//! Event containers for spatio-temporal Hawkes estimation.
//!
//! Purpose
//! -------
//! Hold a validated, zero-padded batch of event sequences and provide the
//! masking/compaction primitives the likelihood is built on.
//!
//! Key behaviors
//! -------------
//! - [`EventBatch`] wraps a `[n_sequences, max_len, 3]` array of
//!   `(time, x, y)` rows and enforces its invariants at construction.
//! - [`event_mask`] marks valid events (`time > 0`); padding rows carry a
//!   non-positive time.
//! - [`compact_sequence`] gathers the valid rows of one sequence, in order,
//!   into a dense `[L_b, 3]` array.
//!
//! Invariants & assumptions
//! ------------------------
//! - Last axis has length [`DATA_DIM`] = 3; every entry is finite.
//! - Valid events of a sequence are non-decreasing in time. Padding rows may
//!   sit anywhere; they are dropped by the mask, never reordered.
//!
//! Conventions
//! -----------
//! - Column order is [`TIME`], [`X`], [`Y`].
//! - Indexing is 0-based on every axis.
//!
//! Testing notes
//! -------------
//! - Unit tests cover padding via `from_sequences`, masking of interleaved
//!   padding, compaction order, and batch selection.
use crate::hawkes::{
    core::validation::validate_events,
    errors::{HawkesError, HawkesResult},
};
use ndarray::{Array1, Array2, Array3, ArrayView2, ArrayView3, Axis};

/// Number of coordinates per event: (time, x, y).
pub const DATA_DIM: usize = 3;
/// Column holding the event time.
pub const TIME: usize = 0;
/// Column holding the x coordinate.
pub const X: usize = 1;
/// Column holding the y coordinate.
pub const Y: usize = 2;

/// Validated, zero-padded batch of event sequences.
///
/// Fields
/// ------
/// - `events`: `Array3<f64>` of shape `[n_sequences, max_len, 3]`.
#[derive(Debug, Clone, PartialEq)]
pub struct EventBatch {
    events: Array3<f64>,
}

impl EventBatch {
    /// Validate and wrap a padded event array.
    ///
    /// # Errors
    /// - [`HawkesError::DimensionMismatch`] when the last axis is not 3.
    /// - [`HawkesError::EmptyBatch`] when there are no sequences.
    /// - [`HawkesError::NonFiniteData`] for NaN/±inf entries.
    /// - [`HawkesError::UnsortedEvents`] when valid events go back in time.
    pub fn new(events: Array3<f64>) -> HawkesResult<Self> {
        validate_events(events.view())?;
        Ok(Self { events })
    }

    /// Build a batch from ragged sequences, zero-padding to the longest one.
    ///
    /// # Errors
    /// - Same as [`EventBatch::new`].
    pub fn from_sequences(sequences: &[Vec<[f64; DATA_DIM]>]) -> HawkesResult<Self> {
        if sequences.is_empty() {
            return Err(HawkesError::EmptyBatch);
        }
        let max_len = sequences.iter().map(Vec::len).max().unwrap_or(0);
        let mut events = Array3::<f64>::zeros((sequences.len(), max_len, DATA_DIM));
        for (b, seq) in sequences.iter().enumerate() {
            for (i, row) in seq.iter().enumerate() {
                for (d, &value) in row.iter().enumerate() {
                    events[[b, i, d]] = value;
                }
            }
        }
        Self::new(events)
    }

    pub fn n_sequences(&self) -> usize {
        self.events.len_of(Axis(0))
    }

    pub fn max_len(&self) -> usize {
        self.events.len_of(Axis(1))
    }

    pub fn events(&self) -> ArrayView3<'_, f64> {
        self.events.view()
    }

    /// Padded rows of sequence `b`.
    ///
    /// # Panics
    /// If `b >= n_sequences()`.
    pub fn sequence(&self, b: usize) -> ArrayView2<'_, f64> {
        self.events.index_axis(Axis(0), b)
    }

    /// Iterate over the padded sequences in batch order.
    pub fn sequences(&self) -> impl Iterator<Item = ArrayView2<'_, f64>> {
        self.events.outer_iter()
    }

    /// Gather the sequences at `indices` (in that order) into a new batch.
    ///
    /// The invariants of `self` carry over, so no re-validation happens.
    ///
    /// # Panics
    /// If any index is out of bounds.
    pub fn select(&self, indices: &[usize]) -> EventBatch {
        EventBatch { events: self.events.select(Axis(0), indices) }
    }

    /// Number of valid events in every sequence.
    pub fn valid_lengths(&self) -> Vec<usize> {
        self.sequences().map(|seq| n_valid(seq)).collect()
    }

    pub fn into_inner(self) -> Array3<f64> {
        self.events
    }
}

/// Validity mask of one padded sequence: `time > 0`.
pub fn event_mask(sequence: ArrayView2<'_, f64>) -> Array1<bool> {
    sequence.column(TIME).mapv(|t| t > 0.0)
}

/// Number of valid events in one padded sequence.
pub fn n_valid(sequence: ArrayView2<'_, f64>) -> usize {
    sequence.column(TIME).iter().filter(|&&t| t > 0.0).count()
}

/// Valid rows of one padded sequence, original order preserved.
pub fn compact_sequence(sequence: ArrayView2<'_, f64>) -> Array2<f64> {
    let keep: Vec<usize> = sequence
        .column(TIME)
        .iter()
        .enumerate()
        .filter_map(|(i, &t)| (t > 0.0).then_some(i))
        .collect();
    sequence.select(Axis(0), &keep)
}
