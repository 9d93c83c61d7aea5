//! Training layer: parameter state, epoch batching, and the MLE driver.
//!
//! - [`batching`] shuffles sequence indices once per epoch and cuts them into
//!   full batches.
//! - [`mle`] implements `LogLikelihood` for any `IntensityModel` and runs the
//!   mini-batch descent loop.
pub mod batching;
pub mod mle;

pub use self::batching::EpochPlan;
pub use self::mle::{EpochSummary, HawkesMLE, TrainReport};

pub mod prelude {
    pub use super::batching::EpochPlan;
    pub use super::mle::{EpochSummary, HawkesMLE, TrainReport};
}
