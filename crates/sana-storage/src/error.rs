use thiserror::Error;

/// The persistence collaborator rejected an operation.
///
/// Unlike scoring failures, these propagate to the caller: an assessment
/// that was not durably recorded must not be reported as saved.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to persist assessment for {user_id}: {reason}")]
    Save { user_id: String, reason: String },

    #[error("failed to query assessments for {user_id}: {reason}")]
    Query { user_id: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
