//! Prefix scan: per-sequence and per-batch log-likelihoods.
//!
//! Purpose
//! -------
//! Turn a padded batch into the log-likelihood the trainer optimizes. For each
//! sequence the valid events are compacted, every prefix `seq[0..i]` is scored
//! by an [`IntensityModel`], and the terms are folded into a sum.
//!
//! Key behaviors
//! -------------
//! - [`Prefixes`] lazily yields the growing prefixes of one compacted
//!   sequence as views; it is rebuilt for every forward pass.
//! - [`sequence_log_likelihood`] folds the prefix terms; a sequence without
//!   valid events contributes exactly `0.0` and never calls the model.
//! - [`cumulative_log_likelihood`] returns the running partial sums.
//! - Batch functions sum (value or gradient) over sequences; [`batch_cost`]
//!   is `−Σ_b LL_b / B`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The `i`-th term sees exactly the first `i` valid events in original
//!   order; padding never reaches the model.
//! - The first model error aborts the scan and is returned unchanged.
//!
//! Testing notes
//! -------------
//! - A recording model checks masking, empty sequences, and cutoff windows.
use crate::hawkes::{
    core::{
        data::{EventBatch, compact_sequence},
        intensity::IntensityModel,
        params::{HawkesParams, N_PARAMS},
    },
    errors::HawkesResult,
};
use ndarray::{Array1, ArrayView2, s};

/// Lazy iterator over the prefixes `seq[0..1]`, `seq[0..2]`, …, `seq[0..L]`.
#[derive(Debug, Clone)]
pub struct Prefixes<'a> {
    sequence: ArrayView2<'a, f64>,
    next_len: usize,
}

impl<'a> Prefixes<'a> {
    pub fn new(sequence: ArrayView2<'a, f64>) -> Self {
        Self { sequence, next_len: 1 }
    }
}

impl<'a> Iterator for Prefixes<'a> {
    type Item = ArrayView2<'a, f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_len > self.sequence.nrows() {
            return None;
        }
        let end = self.next_len;
        self.next_len += 1;
        let sequence = self.sequence;
        Some(sequence.slice_move(s![..end, ..]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.sequence.nrows() + 1).saturating_sub(self.next_len);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Prefixes<'_> {}

/// Log-likelihood of one padded sequence.
///
/// # Errors
/// - The first error returned by the model.
pub fn sequence_log_likelihood<M: IntensityModel + ?Sized>(
    model: &M, sequence: ArrayView2<'_, f64>, cutoff: Option<usize>, params: &HawkesParams,
) -> HawkesResult<f64> {
    let compact = compact_sequence(sequence);
    Prefixes::new(compact.view())
        .try_fold(0.0, |acc, prefix| Ok(acc + model.log_conditional_density(prefix, cutoff, params)?))
}

/// Gradient of [`sequence_log_likelihood`] in `(μ, β, σx, σy)`.
///
/// # Errors
/// - The first error returned by the model, including
///   `GradientNotImplemented`.
pub fn sequence_log_likelihood_grad<M: IntensityModel + ?Sized>(
    model: &M, sequence: ArrayView2<'_, f64>, cutoff: Option<usize>, params: &HawkesParams,
) -> HawkesResult<Array1<f64>> {
    let compact = compact_sequence(sequence);
    Prefixes::new(compact.view()).try_fold(Array1::zeros(N_PARAMS), |acc, prefix| {
        Ok(acc + model.log_conditional_density_grad(prefix, cutoff, params)?)
    })
}

/// Running partial sums of the prefix terms; element `i` is the
/// log-likelihood of the first `i + 1` valid events.
///
/// # Errors
/// - The first error returned by the model.
pub fn cumulative_log_likelihood<M: IntensityModel + ?Sized>(
    model: &M, sequence: ArrayView2<'_, f64>, cutoff: Option<usize>, params: &HawkesParams,
) -> HawkesResult<Array1<f64>> {
    let compact = compact_sequence(sequence);
    let mut running = 0.0;
    Prefixes::new(compact.view())
        .map(|prefix| -> HawkesResult<f64> {
            running += model.log_conditional_density(prefix, cutoff, params)?;
            Ok(running)
        })
        .collect()
}

/// Log-likelihood of every sequence in the batch, in batch order.
pub fn per_sequence_log_likelihood<M: IntensityModel + ?Sized>(
    model: &M, batch: &EventBatch, cutoff: Option<usize>, params: &HawkesParams,
) -> HawkesResult<Array1<f64>> {
    batch.sequences().map(|seq| sequence_log_likelihood(model, seq, cutoff, params)).collect()
}

/// Total log-likelihood `Σ_b LL_b`.
pub fn batch_log_likelihood<M: IntensityModel + ?Sized>(
    model: &M, batch: &EventBatch, cutoff: Option<usize>, params: &HawkesParams,
) -> HawkesResult<f64> {
    batch
        .sequences()
        .try_fold(0.0, |acc, seq| Ok(acc + sequence_log_likelihood(model, seq, cutoff, params)?))
}

/// Gradient of [`batch_log_likelihood`] in `(μ, β, σx, σy)`.
pub fn batch_log_likelihood_grad<M: IntensityModel + ?Sized>(
    model: &M, batch: &EventBatch, cutoff: Option<usize>, params: &HawkesParams,
) -> HawkesResult<Array1<f64>> {
    batch.sequences().try_fold(Array1::zeros(N_PARAMS), |acc, seq| {
        Ok(acc + sequence_log_likelihood_grad(model, seq, cutoff, params)?)
    })
}

/// Minimization objective `−Σ_b LL_b / B` with `B = batch.n_sequences()`.
pub fn batch_cost<M: IntensityModel + ?Sized>(
    model: &M, batch: &EventBatch, cutoff: Option<usize>, params: &HawkesParams,
) -> HawkesResult<f64> {
    let total = batch_log_likelihood(model, batch, cutoff, params)?;
    Ok(-total / batch.n_sequences() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hawkes::{core::data::TIME, errors::HawkesError};
    use ndarray::{Array2, Array3, array};
    use std::cell::RefCell;

    /// Records every window it is asked to score; returns the last event time.
    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<Array2<f64>>>,
    }

    impl IntensityModel for Recorder {
        fn log_density(&self, window: ArrayView2<'_, f64>, _: &HawkesParams) -> HawkesResult<f64> {
            self.seen.borrow_mut().push(window.to_owned());
            Ok(window[[window.nrows() - 1, TIME]])
        }
    }

    fn padded_batch() -> EventBatch {
        // Sequence 0: valid at rows 0, 2, 3 (row 1 padding). Sequence 1: all padding.
        let mut events = Array3::<f64>::zeros((2, 4, 3));
        events[[0, 0, 0]] = 1.0;
        events[[0, 0, 1]] = 0.1;
        events[[0, 1, 0]] = -1.0;
        events[[0, 1, 1]] = 99.0;
        events[[0, 2, 0]] = 2.0;
        events[[0, 2, 1]] = 0.2;
        events[[0, 3, 0]] = 3.0;
        events[[0, 3, 1]] = 0.3;
        EventBatch::new(events).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Prefixes grow one row at a time and report their exact length.
    //
    // Given
    // -----
    // - A 3-row sequence.
    //
    // Expect
    // ------
    // - Lengths 1, 2, 3; `len()` = 3 up front; an empty sequence yields none.
    fn prefixes_grow_by_one_row() {
        let seq = array![[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [3.0, 0.0, 0.0]];

        let it = Prefixes::new(seq.view());
        assert_eq!(it.len(), 3);
        let lens: Vec<usize> = it.map(|p| p.nrows()).collect();

        assert_eq!(lens, vec![1, 2, 3]);
        assert_eq!(Prefixes::new(Array2::<f64>::zeros((0, 3)).view()).count(), 0);
    }

    #[test]
    // Purpose
    // -------
    // Padding never reaches the model and the term count equals the number
    // of valid events.
    //
    // Given
    // -----
    // - Sequence with valid times [1, 2, 3] around a padding row with x = 99,
    //   plus an all-padding sequence.
    //
    // Expect
    // ------
    // - Exactly 3 calls, with prefixes of the valid rows in order.
    // - No recorded row has time ≤ 0 or x = 99.
    // - Total = 1 + 2 + 3.
    fn scan_masks_padding_and_counts_terms() {
        let model = Recorder::default();
        let params = HawkesParams::initial();

        let total = batch_log_likelihood(&model, &padded_batch(), None, &params).unwrap();

        let seen = model.seen.borrow();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[2].column(TIME).to_vec(), vec![1.0, 2.0, 3.0]);
        assert_eq!(seen[1].column(TIME).to_vec(), vec![1.0, 2.0]);
        for window in seen.iter() {
            for row in window.rows() {
                assert!(row[TIME] > 0.0 && row[1] != 99.0);
            }
        }
        assert_eq!(total, 6.0);
    }

    #[test]
    // Purpose
    // -------
    // An all-padding sequence contributes 0.0 without any model call.
    //
    // Given
    // -----
    // - Sequence 1 of the padded batch.
    //
    // Expect
    // ------
    // - LL = 0.0, zero recorded calls, cumulative sums empty.
    fn empty_sequence_contributes_zero_without_calls() {
        let model = Recorder::default();
        let batch = padded_batch();
        let params = HawkesParams::initial();

        let ll = sequence_log_likelihood(&model, batch.sequence(1), None, &params).unwrap();
        let cum = cumulative_log_likelihood(&model, batch.sequence(1), None, &params).unwrap();

        assert_eq!(ll, 0.0);
        assert!(cum.is_empty());
        assert!(model.seen.borrow().is_empty());
    }

    #[test]
    // Purpose
    // -------
    // With a cutoff the model receives the latest `k` rows of each prefix,
    // identical to truncating the prefix explicitly.
    //
    // Given
    // -----
    // - Valid times [1, 2, 3], cutoff k = 2.
    //
    // Expect
    // ------
    // - Windows [1], [1, 2], [2, 3]; the last equals `prefix.slice(1..)`.
    fn cutoff_windows_are_trailing_rows() {
        let model = Recorder::default();
        let batch = padded_batch();
        let params = HawkesParams::initial();

        sequence_log_likelihood(&model, batch.sequence(0), Some(2), &params).unwrap();

        let seen = model.seen.borrow();
        let times: Vec<Vec<f64>> = seen.iter().map(|w| w.column(TIME).to_vec()).collect();
        assert_eq!(times, vec![vec![1.0], vec![1.0, 2.0], vec![2.0, 3.0]]);
        let full = compact_sequence(batch.sequence(0));
        assert_eq!(seen[2], full.slice(s![1.., ..]));
    }

    #[test]
    // Purpose
    // -------
    // Cumulative sums end at the sequence total, and the cost has the
    // documented sign and scale.
    //
    // Given
    // -----
    // - The padded batch (B = 2) and the recorder (terms 1, 2, 3).
    //
    // Expect
    // ------
    // - Cumulative [1, 3, 6]; per-sequence [6, 0]; cost = −6 / 2.
    fn cumulative_and_cost_conventions() {
        let model = Recorder::default();
        let batch = padded_batch();
        let params = HawkesParams::initial();

        let cum = cumulative_log_likelihood(&model, batch.sequence(0), None, &params).unwrap();
        let per_seq = per_sequence_log_likelihood(&model, &batch, None, &params).unwrap();
        let cost = batch_cost(&model, &batch, None, &params).unwrap();

        assert_eq!(cum, array![1.0, 3.0, 6.0]);
        assert_eq!(per_seq, array![6.0, 0.0]);
        assert_eq!(cost, -3.0);
    }

    #[test]
    // Purpose
    // -------
    // A model without an analytic gradient reports it through the scan.
    //
    // Given
    // -----
    // - The recorder, which keeps the default gradient.
    //
    // Expect
    // ------
    // - `GradientNotImplemented`.
    fn gradient_scan_propagates_missing_gradient() {
        let result =
            batch_log_likelihood_grad(&Recorder::default(), &padded_batch(), None, &HawkesParams::initial());

        assert_eq!(result, Err(HawkesError::GradientNotImplemented));
    }
}
