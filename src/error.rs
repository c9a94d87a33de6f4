//! Error types for the projection engine

use thiserror::Error;

/// Errors raised by the engine and its loaders
#[derive(Debug, Error)]
pub enum EngineError {
    /// Principal, rate or term make the payment formula meaningless
    #[error("Invalid loan terms: {reason}")]
    InvalidLoanTerms { reason: String },

    /// A scenario input failed boundary validation
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    /// An operation needs at least one schedule row
    #[error("Empty schedule in {context}")]
    EmptySchedule { context: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub(crate) fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
