use argmin::core::{ArgminError, Error};

use crate::hawkes::errors::HawkesError;

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// Implies that FD should be used
    GradientNotImplemented,

    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Gradient elements need to be finite
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- MLEOptions ----
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    /// Cost change tolerance needs to be positive and finite.
    InvalidTolCost {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// At least one tolerance must be provided.
    NoTolerancesProvided,

    /// Step size of the descent update must be positive and finite.
    InvalidLearningRate {
        value: f64,
        reason: &'static str,
    },

    // ---- Cost function ----
    /// Cost function returned a non-finite value.
    NonFiniteCost {
        value: f64,
    },

    /// The model failed while evaluating the log-likelihood.
    ModelEvaluation {
        text: String,
    },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// Theta hat is missing
    MissingThetaHat,

    /// Unconstrained optimization input must have finite values.
    InvalidThetaInput {
        index: usize,
        value: f64,
    },

    /// Theta length does not match the model.
    ThetaLengthMismatch {
        expected: usize,
        actual: usize,
    },

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Finite Diffs ----
    /// Hessian matrix dimensions do not match parameter dimensions.
    HessianDimMismatch {
        expected: usize,
        found: (usize, usize),
    },

    /// Hessian values need to be finite.
    InvalidHessian {
        row: usize,
        col: usize,
        value: f64,
    },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientNotImplemented => {
                write!(f, "Gradient optimization not implemented")
            }
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- MLEOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost function change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "No tolerances provided")
            }
            OptError::InvalidLearningRate { value, reason } => {
                write!(f, "Invalid learning rate {value}: {reason}")
            }

            // ---- Cost function ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }
            OptError::ModelEvaluation { text } => {
                write!(f, "Model evaluation failed: {text}")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Missing estimated parameters (theta hat)")
            }
            OptError::InvalidThetaInput { index, value } => {
                write!(f, "Invalid theta input at index {index}: {value}, must be finite")
            }
            OptError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Finite Diffs ----
            OptError::HessianDimMismatch { expected, found } => {
                write!(
                    f,
                    "Hessian dimension mismatch: expected ({expected}, {expected}), found {found:?}"
                )
            }
            OptError::InvalidHessian { row, col, value } => {
                write!(f, "Invalid Hessian at ({row}, {col}): {value}, must be finite")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

/// Errors raised inside cost/gradient closures travel through argmin as
/// `argmin::core::Error`; our own `OptError` is recovered first, then the
/// argmin-native variants.
impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

impl From<HawkesError> for OptError {
    fn from(err: HawkesError) -> Self {
        match err {
            HawkesError::GradientNotImplemented => OptError::GradientNotImplemented,
            HawkesError::NonFiniteLogDensity { value } => OptError::NonFiniteCost { value },
            HawkesError::ThetaLengthMismatch { expected, actual } => {
                OptError::ThetaLengthMismatch { expected, actual }
            }
            HawkesError::InvalidThetaInput { index, value } => {
                OptError::InvalidThetaInput { index, value }
            }
            other => OptError::ModelEvaluation { text: other.to_string() },
        }
    }
}
