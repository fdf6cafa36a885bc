//! Longitudinal deltas between a user's two most recent assessments.

use sana_core::models::progress::self_care_proxies;
use sana_core::models::{AssessmentRecord, MetricChange, TrendDelta};

/// Compute per-metric changes from `previous` to `current`.
///
/// Numeric scales and the self-care proxies report percentage change;
/// anxiety reports a signed point delta on its 0–9 severity map. Everything
/// is zero when no previous record exists. Rounded to one decimal place
/// throughout.
pub fn delta(current: &AssessmentRecord, previous: Option<&AssessmentRecord>) -> TrendDelta {
    let Some(previous) = previous else {
        return TrendDelta::default();
    };

    let (cur_exercise, cur_meditation) = self_care_proxies(current.self_care);
    let (prev_exercise, prev_meditation) = self_care_proxies(previous.self_care);

    TrendDelta {
        mood: percent(current.mood, previous.mood),
        sleep_quality: percent(current.sleep_quality, previous.sleep_quality),
        energy_levels: percent(current.energy_levels, previous.energy_levels),
        concentration: percent(current.concentration, previous.concentration),
        social_interactions: percent(current.social_interactions, previous.social_interactions),
        optimism: percent(current.optimism, previous.optimism),
        social_support: percent(current.social_support, previous.social_support),
        anxiety: MetricChange::new(round1(current.anxiety.score() - previous.anxiety.score())),
        exercise: percent(cur_exercise, prev_exercise),
        meditation: percent(cur_meditation, prev_meditation),
    }
}

/// Percentage change, guarding division by zero.
fn percent(current: u8, previous: u8) -> MetricChange {
    if previous == 0 {
        return MetricChange::new(0.0);
    }
    let change = (f64::from(current) - f64::from(previous)) / f64::from(previous) * 100.0;
    MetricChange::new(round1(change))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
