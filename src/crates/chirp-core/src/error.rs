//! Error types for the translation pipeline.
//!
//! Every variant here is recoverable: validation and parse failures feed the
//! next translation attempt, and an exhausted translation is reported to the
//! user without ending the session.

use crate::llm::AdapterError;
use thiserror::Error;

/// Rejection of a candidate request by the validator.
///
/// The `Display` text is fed back to the model on retry, so it names the
/// offending parameter and the accepted form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Operation name is not in the registry.
    #[error("unknown operation '{name}'; expected one of: {available}")]
    UnknownOperation { name: String, available: String },

    /// A required parameter is absent or null.
    #[error("operation '{operation}' is missing required parameter '{name}'")]
    MissingParameter {
        operation: &'static str,
        name: &'static str,
    },

    /// A supplied parameter is not declared by the operation.
    #[error("operation '{operation}' does not accept parameter '{name}'")]
    UnknownParameter {
        operation: &'static str,
        name: String,
    },

    /// A value could not be coerced to the declared type.
    #[error("parameter '{name}' must be {expected}, got {got}")]
    TypeMismatch {
        name: &'static str,
        expected: &'static str,
        got: String,
    },

    /// A coerced value violates its range constraint.
    #[error("parameter '{name}' value {value} is out of range (allowed {bound})")]
    OutOfRange {
        name: &'static str,
        value: String,
        bound: String,
    },
}

impl ValidationError {
    /// Stable kind tag for logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::UnknownOperation { .. } => "UnknownOperation",
            ValidationError::MissingParameter { .. } => "MissingParameter",
            ValidationError::UnknownParameter { .. } => "UnknownParameter",
            ValidationError::TypeMismatch { .. } => "TypeMismatch",
            ValidationError::OutOfRange { .. } => "OutOfRange",
        }
    }
}

/// Why a single translation attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    /// The model's text could not be parsed into a candidate request.
    #[error("malformed model output: {0}")]
    MalformedOutput(String),

    /// The model could not be reached or did not answer in time.
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// The candidate was parsed but rejected by the validator.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl AttemptError {
    pub fn kind(&self) -> &'static str {
        match self {
            AttemptError::MalformedOutput(_) => "MalformedOutput",
            AttemptError::Adapter(_) => "AdapterError",
            AttemptError::Invalid(e) => e.kind(),
        }
    }

    /// Whether the model should be told about this failure on the next attempt.
    pub fn is_model_feedback(&self) -> bool {
        !matches!(self, AttemptError::Adapter(_))
    }
}

/// Terminal failure after the attempt bound was exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not understand request after {attempts} attempt(s): {last_error}")]
pub struct TranslationFailure {
    pub attempts: u32,
    pub last_error: AttemptError,
}
