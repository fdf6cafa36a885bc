use serde::{Deserialize, Serialize};

/// Four-step severity scale shared by the anxiety, physical-symptom, and
/// intrusive-thought ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::None,
        Severity::Mild,
        Severity::Moderate,
        Severity::Severe,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }

    /// Case-insensitive parse against the enumerated set.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|v| v.as_str() == lower)
    }

    /// Point score used when trending the anxiety rating.
    pub fn score(self) -> f64 {
        match self {
            Severity::None => 0.0,
            Severity::Mild => 3.0,
            Severity::Moderate => 6.0,
            Severity::Severe => 9.0,
        }
    }
}

/// How much self-care the respondent reports practicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelfCareLevel {
    None,
    Minimal,
    Moderate,
    Extensive,
}

impl SelfCareLevel {
    pub const ALL: [SelfCareLevel; 4] = [
        SelfCareLevel::None,
        SelfCareLevel::Minimal,
        SelfCareLevel::Moderate,
        SelfCareLevel::Extensive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SelfCareLevel::None => "none",
            SelfCareLevel::Minimal => "minimal",
            SelfCareLevel::Moderate => "moderate",
            SelfCareLevel::Extensive => "extensive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|v| v.as_str() == lower)
    }
}

/// Self-harm ideation level. `Passive` and `Active` distinguish ideation
/// without intent from ideation with intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelfHarmLevel {
    None,
    Passive,
    Active,
    Severe,
}

impl SelfHarmLevel {
    pub const ALL: [SelfHarmLevel; 4] = [
        SelfHarmLevel::None,
        SelfHarmLevel::Passive,
        SelfHarmLevel::Active,
        SelfHarmLevel::Severe,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SelfHarmLevel::None => "none",
            SelfHarmLevel::Passive => "passive",
            SelfHarmLevel::Active => "active",
            SelfHarmLevel::Severe => "severe",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|v| v.as_str() == lower)
    }
}

/// One complete, validated questionnaire submission.
///
/// Fields are declared in engine-input position order (see
/// [`crate::contract::FIELD_ORDER`]); validation reports errors in this
/// order. Invariants: every numeric scale is an integer in `[1, 10]`, every
/// free-text field is non-empty after trimming. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub mood: u8,
    pub anxiety: Severity,
    pub sleep_quality: u8,
    pub energy_levels: u8,
    pub physical_symptoms: Severity,
    pub concentration: u8,
    pub self_care: SelfCareLevel,
    pub social_interactions: u8,
    pub intrusive_thoughts: Severity,
    pub optimism: u8,
    pub stress_factors: String,
    pub coping_strategies: String,
    pub social_support: u8,
    pub self_harm: SelfHarmLevel,
    pub discuss_professional: String,
}

impl AssessmentRecord {
    /// Stringify every answer in engine-input position order. This is the
    /// payload shape the external scoring engine consumes.
    pub fn scoring_answers(&self) -> Vec<String> {
        vec![
            self.mood.to_string(),
            self.anxiety.as_str().to_string(),
            self.sleep_quality.to_string(),
            self.energy_levels.to_string(),
            self.physical_symptoms.as_str().to_string(),
            self.concentration.to_string(),
            self.self_care.as_str().to_string(),
            self.social_interactions.to_string(),
            self.intrusive_thoughts.as_str().to_string(),
            self.optimism.to_string(),
            self.stress_factors.clone(),
            self.coping_strategies.clone(),
            self.social_support.to_string(),
            self.self_harm.as_str().to_string(),
            self.discuss_professional.clone(),
        ]
    }
}
