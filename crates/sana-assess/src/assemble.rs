//! Assembly of conversational answers into an [`AssessmentRecord`].
//!
//! Answer index `i` maps to contract field `i` (see
//! [`sana_core::contract::FIELD_ORDER`]). Assembly is total: answers with
//! no extractable value fall back to defaults that keep the record
//! invariants intact — the scale midpoint for numerics, the table default
//! for categoricals, and a fixed placeholder for free text.

use sana_core::models::{AssessmentRecord, SelfCareLevel, SelfHarmLevel, Severity};

use crate::normalize::{
    SELF_CARE_KEYWORDS, SELF_HARM_KEYWORDS, SEVERITY_KEYWORDS, extract_level, extract_numeric,
};

/// Scale value used when a conversational answer contains no number.
const SCALE_MIDPOINT: u8 = 5;

/// Free-text value used when a conversational answer is blank.
const EMPTY_TEXT_PLACEHOLDER: &str = "not specified";

/// Build a record from raw conversational answers in contract order.
/// Missing trailing answers are treated as empty.
pub fn assemble_record(answers: &[String]) -> AssessmentRecord {
    let answer = |i: usize| answers.get(i).map(String::as_str).unwrap_or("");

    AssessmentRecord {
        mood: scale(answer(0)),
        anxiety: extract_level(answer(1), &SEVERITY_KEYWORDS, Severity::None),
        sleep_quality: scale(answer(2)),
        energy_levels: scale(answer(3)),
        physical_symptoms: extract_level(answer(4), &SEVERITY_KEYWORDS, Severity::None),
        concentration: scale(answer(5)),
        self_care: extract_level(answer(6), &SELF_CARE_KEYWORDS, SelfCareLevel::None),
        social_interactions: scale(answer(7)),
        intrusive_thoughts: extract_level(answer(8), &SEVERITY_KEYWORDS, Severity::None),
        optimism: scale(answer(9)),
        stress_factors: text(answer(10)),
        coping_strategies: text(answer(11)),
        social_support: scale(answer(12)),
        self_harm: extract_level(answer(13), &SELF_HARM_KEYWORDS, SelfHarmLevel::None),
        discuss_professional: text(answer(14)),
    }
}

fn scale(raw: &str) -> u8 {
    extract_numeric(raw).unwrap_or(SCALE_MIDPOINT)
}

fn text(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        EMPTY_TEXT_PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}
