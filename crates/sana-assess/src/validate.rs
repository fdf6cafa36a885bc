//! Strict validation of the single-shot structured submission path.
//!
//! One pass over the raw JSON payload in field-declaration order, producing
//! either a complete [`AssessmentRecord`] or the first [`ValidationError`]
//! encountered. Field order is fixed so error reporting is deterministic.

use sana_core::models::{AssessmentRecord, SelfCareLevel, SelfHarmLevel, Severity};
use serde_json::Value;

use crate::error::ValidationError;

/// Validate a raw submission payload into an [`AssessmentRecord`].
///
/// Numeric scales must be integers in `[1, 10]`; categorical fields must be
/// members of their enumerated set (case-insensitive, normalized to
/// lowercase); free-text fields must be non-empty after trimming.
pub fn validate(payload: &Value) -> Result<AssessmentRecord, ValidationError> {
    Ok(AssessmentRecord {
        mood: require_scale(payload, "mood")?,
        anxiety: require_category(payload, "anxiety", Severity::parse, &severity_names())?,
        sleep_quality: require_scale(payload, "sleep_quality")?,
        energy_levels: require_scale(payload, "energy_levels")?,
        physical_symptoms: require_category(
            payload,
            "physical_symptoms",
            Severity::parse,
            &severity_names(),
        )?,
        concentration: require_scale(payload, "concentration")?,
        self_care: require_category(
            payload,
            "self_care",
            SelfCareLevel::parse,
            &self_care_names(),
        )?,
        social_interactions: require_scale(payload, "social_interactions")?,
        intrusive_thoughts: require_category(
            payload,
            "intrusive_thoughts",
            Severity::parse,
            &severity_names(),
        )?,
        optimism: require_scale(payload, "optimism")?,
        stress_factors: require_text(payload, "stress_factors")?,
        coping_strategies: require_text(payload, "coping_strategies")?,
        social_support: require_scale(payload, "social_support")?,
        self_harm: require_category(payload, "self_harm", SelfHarmLevel::parse, &self_harm_names())?,
        discuss_professional: require_text(payload, "discuss_professional")?,
    })
}

fn severity_names() -> Vec<&'static str> {
    Severity::ALL.iter().map(|v| v.as_str()).collect()
}

fn self_care_names() -> Vec<&'static str> {
    SelfCareLevel::ALL.iter().map(|v| v.as_str()).collect()
}

fn self_harm_names() -> Vec<&'static str> {
    SelfHarmLevel::ALL.iter().map(|v| v.as_str()).collect()
}

fn require_scale(payload: &Value, field: &'static str) -> Result<u8, ValidationError> {
    let value = payload
        .get(field)
        .ok_or_else(|| ValidationError::new(field, "missing required field"))?;

    let n = value.as_i64().ok_or_else(|| {
        ValidationError::new(field, format!("expected an integer in [1, 10], got {value}"))
    })?;

    if !(1..=10).contains(&n) {
        return Err(ValidationError::new(
            field,
            format!("expected an integer in [1, 10], got {n}"),
        ));
    }

    Ok(n as u8)
}

fn require_category<T>(
    payload: &Value,
    field: &'static str,
    parse: fn(&str) -> Option<T>,
    allowed: &[&str],
) -> Result<T, ValidationError> {
    let value = payload
        .get(field)
        .ok_or_else(|| ValidationError::new(field, "missing required field"))?;

    let text = value.as_str().ok_or_else(|| {
        ValidationError::new(
            field,
            format!("expected one of [{}], got {value}", allowed.join(", ")),
        )
    })?;

    parse(text).ok_or_else(|| {
        ValidationError::new(
            field,
            format!("expected one of [{}], got \"{text}\"", allowed.join(", ")),
        )
    })
}

fn require_text(payload: &Value, field: &'static str) -> Result<String, ValidationError> {
    let value = payload
        .get(field)
        .ok_or_else(|| ValidationError::new(field, "missing required field"))?;

    let text = value
        .as_str()
        .ok_or_else(|| ValidationError::new(field, format!("expected a string, got {value}")))?;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_payload() -> Value {
        json!({
            "mood": 8,
            "anxiety": "mild",
            "sleep_quality": 7,
            "energy_levels": 6,
            "physical_symptoms": "none",
            "concentration": 7,
            "self_care": "moderate",
            "social_interactions": 6,
            "intrusive_thoughts": "none",
            "optimism": 8,
            "stress_factors": "work deadlines",
            "coping_strategies": "exercise",
            "social_support": 7,
            "self_harm": "none",
            "discuss_professional": "maybe"
        })
    }

    #[test]
    fn accepts_a_fully_valid_payload() {
        let record = validate(&valid_payload()).expect("payload should validate");
        assert_eq!(record.mood, 8);
        assert_eq!(record.anxiety, Severity::Mild);
        assert_eq!(record.self_care, SelfCareLevel::Moderate);
        assert_eq!(record.stress_factors, "work deadlines");
    }

    #[test]
    fn rejects_out_of_range_scale_naming_the_field() {
        let mut payload = valid_payload();
        payload["mood"] = json!(11);
        let err = validate(&payload).unwrap_err();
        assert_eq!(err.field, "mood");
        assert!(err.reason.contains("11"), "reason should echo the value: {}", err.reason);
    }

    #[test]
    fn rejects_non_integer_scale() {
        let mut payload = valid_payload();
        payload["sleep_quality"] = json!("seven");
        let err = validate(&payload).unwrap_err();
        assert_eq!(err.field, "sleep_quality");
    }

    #[test]
    fn rejects_unknown_category_listing_the_allowed_set() {
        let mut payload = valid_payload();
        payload["anxiety"] = json!("terrible");
        let err = validate(&payload).unwrap_err();
        assert_eq!(err.field, "anxiety");
        assert!(err.reason.contains("none, mild, moderate, severe"));
    }

    #[test]
    fn category_matching_is_case_insensitive() {
        let mut payload = valid_payload();
        payload["self_harm"] = json!("Passive");
        let record = validate(&payload).expect("mixed-case category should validate");
        assert_eq!(record.self_harm, SelfHarmLevel::Passive);
    }

    #[test]
    fn rejects_blank_free_text_and_trims_on_success() {
        let mut payload = valid_payload();
        payload["stress_factors"] = json!("   ");
        let err = validate(&payload).unwrap_err();
        assert_eq!(err.field, "stress_factors");

        payload["stress_factors"] = json!("  deadlines  ");
        let record = validate(&payload).expect("trimmed text should validate");
        assert_eq!(record.stress_factors, "deadlines");
    }

    #[test]
    fn reports_the_first_violation_in_field_order() {
        let mut payload = valid_payload();
        payload["mood"] = json!(0);
        payload["optimism"] = json!(99);
        let err = validate(&payload).unwrap_err();
        assert_eq!(err.field, "mood");
    }

    #[test]
    fn missing_field_is_reported_by_name() {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove("concentration");
        let err = validate(&payload).unwrap_err();
        assert_eq!(err.field, "concentration");
        assert_eq!(err.reason, "missing required field");
    }
}
