//! inference — post-estimation uncertainty for fitted models.
//!
//! Standard errors come from the observed information of the cost gradient
//! in the unconstrained space `θ`, via finite-difference Hessians and an
//! eigen-truncated pseudoinverse ([`calc_standard_errors`]). Mapping the
//! result back to model parameters (delta method) is the model layer's job.

pub mod hessian;

pub use self::hessian::calc_standard_errors;

pub mod prelude {
    pub use super::hessian::calc_standard_errors;
}
