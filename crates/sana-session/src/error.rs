use thiserror::Error;
use uuid::Uuid;

use sana_storage::StorageError;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The referenced session id is unknown or already expired.
    #[error("unknown or expired session: {0}")]
    NotFound(Uuid),

    /// The persistence collaborator rejected the completed assessment.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
