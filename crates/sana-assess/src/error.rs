use serde::Serialize;
use thiserror::Error;

/// A structured submission violated the assessment schema.
///
/// Always recoverable: the caller fixes the named field and resubmits.
#[derive(Debug, Clone, Serialize, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError {
            field,
            reason: reason.into(),
        }
    }
}
