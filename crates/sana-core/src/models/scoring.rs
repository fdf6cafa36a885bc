use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Aggregate emotion/risk summary produced by the scoring engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringSummary {
    #[serde(default)]
    pub emotions_count: HashMap<String, u32>,
    #[serde(default)]
    pub average_confidence: f64,
    #[serde(default)]
    pub average_valence: f64,
    #[serde(default)]
    pub crisis_count: u32,
    #[serde(default)]
    pub risk_factors: Vec<String>,
}

/// The full output of one scoring-engine run.
///
/// Always well-formed: consumers never see a null or partial response. When
/// the engine fails, [`ScoringResponse::fallback`] is substituted instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringResponse {
    pub summary: ScoringSummary,
    #[serde(default)]
    pub disorder_indicators: Vec<String>,
}

impl ScoringResponse {
    /// The documented neutral, low-confidence result substituted whenever
    /// the scoring engine cannot produce a usable one.
    pub fn fallback() -> Self {
        ScoringResponse {
            summary: ScoringSummary {
                emotions_count: HashMap::from([("neutral".to_string(), 1)]),
                average_confidence: 0.5,
                average_valence: 0.5,
                crisis_count: 0,
                risk_factors: Vec::new(),
            },
            disorder_indicators: Vec::new(),
        }
    }
}
