//! Free-text answer normalization.
//!
//! Total functions from raw transcript text to typed values. Keyword
//! matching runs over ordered (keyword, level) tables, most severe first,
//! so the highest-priority match wins regardless of where it appears in
//! the text.

use sana_core::models::{SelfCareLevel, SelfHarmLevel, Severity};

/// Anxiety / physical-symptom / intrusive-thought keywords, most severe first.
pub const SEVERITY_KEYWORDS: [(&str, Severity); 3] = [
    ("severe", Severity::Severe),
    ("moderate", Severity::Moderate),
    ("mild", Severity::Mild),
];

/// Self-care keywords, most extensive first.
pub const SELF_CARE_KEYWORDS: [(&str, SelfCareLevel); 3] = [
    ("extensive", SelfCareLevel::Extensive),
    ("moderate", SelfCareLevel::Moderate),
    ("minimal", SelfCareLevel::Minimal),
];

/// Self-harm keywords, most severe first.
pub const SELF_HARM_KEYWORDS: [(&str, SelfHarmLevel); 3] = [
    ("severe", SelfHarmLevel::Severe),
    ("active", SelfHarmLevel::Active),
    ("passive", SelfHarmLevel::Passive),
];

/// Extract the first integer substring from free text, clamped to `[1, 10]`.
/// Returns `None` when the text contains no digits.
pub fn extract_numeric(text: &str) -> Option<u8> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if digits.is_empty() {
        return None;
    }

    // A parse failure here can only be overflow, which clamps to 10 anyway.
    let value: u64 = digits.parse().unwrap_or(u64::MAX);
    Some(value.clamp(1, 10) as u8)
}

/// Match free text against an ordered keyword table, first match wins.
/// Case-insensitive substring containment; returns `default` when nothing
/// matches.
pub fn extract_level<T: Copy>(text: &str, keywords: &[(&str, T)], default: T) -> T {
    let lower = text.to_lowercase();
    keywords
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, level)| *level)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_integer() {
        assert_eq!(extract_numeric("I'd say about a 7 today"), Some(7));
        assert_eq!(extract_numeric("maybe 3 or 4"), Some(3));
    }

    #[test]
    fn clamps_to_scale_range() {
        assert_eq!(extract_numeric("0"), Some(1));
        assert_eq!(extract_numeric("15 out of 10"), Some(10));
        assert_eq!(extract_numeric("99999999999999999999999"), Some(10));
    }

    #[test]
    fn no_digits_yields_none() {
        assert_eq!(extract_numeric(""), None);
        assert_eq!(extract_numeric("pretty good I guess"), None);
    }

    #[test]
    fn highest_priority_keyword_wins_regardless_of_position() {
        let level = extract_level("mild but sometimes severe", &SEVERITY_KEYWORDS, Severity::None);
        assert_eq!(level, Severity::Severe);
    }

    #[test]
    fn unmatched_text_yields_default() {
        let level = extract_level("nothing to report", &SEVERITY_KEYWORDS, Severity::None);
        assert_eq!(level, Severity::None);

        let level = extract_level("", &SELF_CARE_KEYWORDS, SelfCareLevel::None);
        assert_eq!(level, SelfCareLevel::None);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let level = extract_level("MODERATE, I think", &SELF_CARE_KEYWORDS, SelfCareLevel::None);
        assert_eq!(level, SelfCareLevel::Moderate);
    }
}
