use thiserror::Error;
use uuid::Uuid;

use sana_assess::ValidationError;
use sana_session::SessionError;
use sana_storage::StorageError;

/// Caller-visible failures, per the propagation policy: malformed input and
/// unknown ids are client errors, persistence failures are server errors,
/// and scoring-engine instability never appears here at all.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unknown or expired session: {0}")]
    SessionNotFound(Uuid),

    #[error("no assessments recorded for user: {0}")]
    NoAssessments(String),

    #[error(transparent)]
    Persistence(#[from] StorageError),
}

impl From<SessionError> for ServiceError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotFound(id) => ServiceError::SessionNotFound(id),
            SessionError::Storage(e) => ServiceError::Persistence(e),
        }
    }
}
