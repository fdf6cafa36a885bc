pub mod progress;
pub mod record;
pub mod scoring;
pub mod stored;
pub mod trend;

pub use progress::ProgressPoint;
pub use record::{AssessmentRecord, SelfCareLevel, SelfHarmLevel, Severity};
pub use scoring::{ScoringResponse, ScoringSummary};
pub use stored::StoredAssessment;
pub use trend::{MetricChange, TrendDelta};
