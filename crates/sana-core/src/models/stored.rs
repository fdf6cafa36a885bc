use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::progress::ProgressPoint;
use super::record::AssessmentRecord;
use super::scoring::ScoringResponse;

/// One persisted assessment event: the validated record, the scoring result
/// it produced, and the derived chart-series point. Keyed by user id and
/// timestamp in the external store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredAssessment {
    pub id: Uuid,
    pub user_id: String,
    pub recorded_at: jiff::Timestamp,
    pub record: AssessmentRecord,
    pub scoring: ScoringResponse,
    pub progress: ProgressPoint,
}

impl StoredAssessment {
    pub fn new(user_id: impl Into<String>, record: AssessmentRecord, scoring: ScoringResponse) -> Self {
        let progress = ProgressPoint::derive(&record);
        StoredAssessment {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            recorded_at: jiff::Timestamp::now(),
            record,
            scoring,
            progress,
        }
    }
}
