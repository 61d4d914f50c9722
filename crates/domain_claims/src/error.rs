//! Claims domain errors

use thiserror::Error;

/// Errors that can occur in the claims domain
///
/// The calculation itself never fails; these errors come from the boundary
/// where extracted documents become typed records, and from policy
/// configuration.
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Malformed extraction: {0}")]
    MalformedExtraction(#[from] serde_json::Error),

    #[error("Invalid extraction field {field}: {reason}")]
    InvalidExtraction { field: String, reason: String },

    #[error("Invalid reconciliation policy: {0}")]
    InvalidPolicy(String),
}

impl ClaimError {
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ClaimError::InvalidExtraction {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_policy(message: impl Into<String>) -> Self {
        ClaimError::InvalidPolicy(message.into())
    }
}
