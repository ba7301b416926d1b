//! Calculator error types.

use regdesk_shared::AppError;
use thiserror::Error;

/// Errors returned by the calculators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalculatorError {
    /// An input field is outside its accepted range.
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        /// Field name as sent by the client.
        field: &'static str,
        /// Human readable reason.
        reason: String,
    },

    /// Intermediate arithmetic exceeded the decimal range.
    #[error("calculation overflow")]
    Overflow,
}

impl CalculatorError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

impl From<CalculatorError> for AppError {
    fn from(err: CalculatorError) -> Self {
        match err {
            CalculatorError::InvalidInput { .. } => Self::Validation(err.to_string()),
            CalculatorError::Overflow => {
                Self::Validation("inputs are too large to calculate".to_string())
            }
        }
    }
}
