//! The fixed positional schema shared with the external scoring engine,
//! and the default conversational question list.
//!
//! The scoring engine consumes a JSON array of stringified answers whose
//! positions follow [`FIELD_ORDER`]. The default question list asks for the
//! same fields in the same order, so conversational answer index `i` always
//! maps to field `FIELD_ORDER[i]`.

/// Field names in engine-input position order.
pub const FIELD_ORDER: [&str; 15] = [
    "mood",
    "anxiety",
    "sleep_quality",
    "energy_levels",
    "physical_symptoms",
    "concentration",
    "self_care",
    "social_interactions",
    "intrusive_thoughts",
    "optimism",
    "stress_factors",
    "coping_strategies",
    "social_support",
    "self_harm",
    "discuss_professional",
];

/// The default multi-turn questionnaire, one question per contract field.
pub const DEFAULT_QUESTIONS: [&str; 15] = [
    "On a scale of 1 to 10, how would you rate your mood today?",
    "How would you describe your anxiety lately: none, mild, moderate, or severe?",
    "On a scale of 1 to 10, how well have you been sleeping?",
    "On a scale of 1 to 10, how are your energy levels?",
    "Have you noticed physical symptoms like tension or headaches: none, mild, moderate, or severe?",
    "On a scale of 1 to 10, how well have you been able to concentrate?",
    "How much self-care have you managed recently: none, minimal, moderate, or extensive?",
    "On a scale of 1 to 10, how have your social interactions been?",
    "Have you experienced intrusive thoughts: none, mild, moderate, or severe?",
    "On a scale of 1 to 10, how optimistic do you feel about the future?",
    "What has been causing you stress recently?",
    "What strategies help you cope when things get difficult?",
    "On a scale of 1 to 10, how supported do you feel by the people around you?",
    "Have you had any thoughts of harming yourself: none, passive, active, or severe?",
    "Is there anything you would like to discuss with a professional?",
];

/// The default question list as owned strings, for callers that do not
/// supply their own.
pub fn default_questions() -> Vec<String> {
    DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect()
}
