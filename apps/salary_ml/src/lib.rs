//! Salary regression model behind a fixed feature-order contract.
//!
//! The artifact is loaded once at startup. If it cannot be loaded the
//! [`ModelInvoker`] stays in the unavailable state and every call fails fast
//! with [`InvokeError::Unavailable`].

pub mod artifact;
pub mod invoker;

pub use artifact::{LinearModel, LoadError};
pub use invoker::{prepare_features, InvokeError, ModelInvoker};

/// Feature names in the order the model was trained with.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = ["test_score", "interview_score", "years_experience"];

/// Number of features the model consumes.
pub const FEATURE_COUNT: usize = 3;

/// A fitted regressor mapping one feature vector to one output.
pub trait Regressor: Send + Sync {
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64, ModelError>;
}

/// Failure raised by a [`Regressor`] during inference.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("feature {name} is not finite: {value}")]
    NonFiniteFeature { name: &'static str, value: f64 },
    #[error("model produced a non-finite output: {0}")]
    NonFiniteOutput(f64),
    #[error("{0}")]
    Other(String),
}
