use serde::{Deserialize, Serialize};

use super::record::{AssessmentRecord, SelfCareLevel};

/// Exercise and meditation proxy scores derived from the self-care rating,
/// keyed as (exercise, meditation). The constants come from the source
/// system unchanged; their clinical derivation is not documented, so they
/// are kept as an explicit table rather than re-derived.
pub const SELF_CARE_PROXIES: [(SelfCareLevel, (u8, u8)); 4] = [
    (SelfCareLevel::None, (3, 2)),
    (SelfCareLevel::Minimal, (3, 2)),
    (SelfCareLevel::Moderate, (7, 6)),
    (SelfCareLevel::Extensive, (7, 6)),
];

/// Look up the (exercise, meditation) proxy pair for a self-care level.
pub fn self_care_proxies(level: SelfCareLevel) -> (u8, u8) {
    SELF_CARE_PROXIES
        .iter()
        .find(|(l, _)| *l == level)
        .map(|(_, pair)| *pair)
        .unwrap_or((3, 2))
}

/// One derived time-series point per assessment, consumed by the external
/// charting layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressPoint {
    pub mood: u8,
    pub anxiety_score: f64,
    pub sleep_quality: u8,
    pub exercise_score: u8,
    pub meditation_score: u8,
    pub social_score: u8,
}

impl ProgressPoint {
    pub fn derive(record: &AssessmentRecord) -> Self {
        let (exercise_score, meditation_score) = self_care_proxies(record.self_care);
        ProgressPoint {
            mood: record.mood,
            anxiety_score: record.anxiety.score(),
            sleep_quality: record.sleep_quality,
            exercise_score,
            meditation_score,
            social_score: record.social_interactions,
        }
    }
}
