//! sana-storage
//!
//! The persistence boundary. Assessment events are consumed through the
//! [`AssessmentStore`] save/query trait only; engine internals live with
//! the external collaborator. [`MemoryStore`] is the in-process
//! implementation used for tests and embedded deployments.

pub mod error;

use std::collections::HashMap;
use std::future::Future;

use sana_core::models::StoredAssessment;
use tokio::sync::Mutex;
use tracing::debug;

pub use error::StorageError;

/// Save/query interface over the external assessment store.
///
/// History is ordered oldest first; one entry per assessment event, keyed
/// by user id and timestamp.
pub trait AssessmentStore: Send + Sync {
    /// Durably record one assessment event.
    fn save(
        &self,
        assessment: StoredAssessment,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Every recorded event for a user, oldest first. Empty when the user
    /// has no records.
    fn history(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<StoredAssessment>, StorageError>> + Send;

    /// The most recent event for a user, if any.
    fn latest(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<StoredAssessment>, StorageError>> + Send {
        async move { Ok(self.history(user_id).await?.pop()) }
    }
}

/// In-memory store keyed by user id. Intentionally ephemeral — nothing
/// survives a process restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, Vec<StoredAssessment>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AssessmentStore for MemoryStore {
    async fn save(&self, assessment: StoredAssessment) -> Result<(), StorageError> {
        let mut records = self.records.lock().await;
        let user_records = records.entry(assessment.user_id.clone()).or_default();
        debug!(
            user_id = %assessment.user_id,
            total = user_records.len() + 1,
            "assessment saved"
        );
        user_records.push(assessment);
        // Appends arrive in submission order, but keep the invariant
        // explicit for out-of-order backfills.
        user_records.sort_by_key(|r| r.recorded_at);
        Ok(())
    }

    async fn history(&self, user_id: &str) -> Result<Vec<StoredAssessment>, StorageError> {
        let records = self.records.lock().await;
        Ok(records.get(user_id).cloned().unwrap_or_default())
    }
}
