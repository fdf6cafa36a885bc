//! sana-session
//!
//! The stateful core: a concurrent registry of live conversational
//! assessments and the state machine that drives them from first question
//! through scoring and persistence.

pub mod conversation;
pub mod error;
pub mod store;

pub use conversation::{
    AnswerOutcome, CompletionSummary, ConversationConfig, ConversationEngine, ScoringMode, Started,
    TimeoutStatus,
};
pub use error::SessionError;
pub use store::{Answer, Session, SessionState, SessionStore};
