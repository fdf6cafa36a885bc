use serde::{Deserialize, Serialize};

/// Signed change in one metric between two consecutive assessments.
///
/// Percentage change for the numeric scales and the self-care proxies; a
/// signed point delta (on the 0–9 severity map) for anxiety.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricChange {
    pub change: f64,
}

impl MetricChange {
    pub fn new(change: f64) -> Self {
        MetricChange { change }
    }
}

/// Per-metric deltas between a user's two most recent assessments.
/// All zero when fewer than two records exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendDelta {
    pub mood: MetricChange,
    pub sleep_quality: MetricChange,
    pub energy_levels: MetricChange,
    pub concentration: MetricChange,
    pub social_interactions: MetricChange,
    pub optimism: MetricChange,
    pub social_support: MetricChange,
    pub anxiety: MetricChange,
    pub exercise: MetricChange,
    pub meditation: MetricChange,
}
