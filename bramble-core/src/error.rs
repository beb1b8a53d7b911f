//! Error types for Bramble property runs.

use thiserror::Error;

/// Main error type for Bramble.
///
/// Trial failures are not errors: they end up in a [`RunDetails`](crate::RunDetails).
/// Only the assertion entry points turn a failed run into [`BrambleError::PropertyFailed`].
#[derive(Error, Debug)]
pub enum BrambleError {
    /// Property failed with a counterexample. Only produced by `assert`.
    #[error("{message}")]
    PropertyFailed {
        message: String,
        seed: u64,
        total_runs: usize,
        counterexample_path: String,
    },

    /// The property cannot be driven the way it was asked to be.
    #[error("Property contract violated: {reason}")]
    ContractViolation { reason: String },

    /// Generator failed to produce a value.
    #[error("Generator failed: {reason}")]
    GeneratorFailed { reason: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl BrambleError {
    /// Build a generation fault from any displayable cause.
    pub fn generator_failed(reason: impl std::fmt::Display) -> Self {
        BrambleError::GeneratorFailed {
            reason: reason.to_string(),
        }
    }

    pub(crate) fn contract(reason: impl Into<String>) -> Self {
        BrambleError::ContractViolation {
            reason: reason.into(),
        }
    }
}

/// Result type for Bramble operations.
pub type Result<T> = std::result::Result<T, BrambleError>;
