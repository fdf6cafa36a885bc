//! sana-service
//!
//! The operations a thin API adapter calls: single-shot structured
//! submission, latest-assessment queries with trends, and the multi-turn
//! conversation endpoints. This crate wires the library crates together;
//! HTTP routing, auth, and rendering belong to the host.

pub mod error;

use std::sync::Arc;
use std::time::Duration;

use sana_assess::{trend, validate};
use sana_core::models::{StoredAssessment, TrendDelta};
use sana_scoring::ScoringGateway;
use sana_session::{
    AnswerOutcome, ConversationConfig, ConversationEngine, SessionStore, Started, TimeoutStatus,
};
use sana_storage::AssessmentStore;
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

pub use error::ServiceError;

/// How often the background reaper sweeps for idle sessions.
const REAP_INTERVAL: Duration = Duration::from_secs(60);

/// A structured submission that was scored and durably recorded.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub assessment: StoredAssessment,
    pub trend: TrendDelta,
}

/// The most recent recorded assessment plus its trend against the prior
/// record (all-zero when it is the only one).
#[derive(Debug, Clone)]
pub struct LatestAssessment {
    pub assessment: StoredAssessment,
    pub trend: TrendDelta,
}

/// The assessment-orchestration service, generic over the persistence
/// collaborator.
pub struct AssessmentService<S: AssessmentStore> {
    store: Arc<S>,
    gateway: Arc<ScoringGateway>,
    conversations: ConversationEngine<S>,
}

impl<S: AssessmentStore> AssessmentService<S> {
    pub fn new(store: Arc<S>, gateway: ScoringGateway, config: ConversationConfig) -> Self {
        let gateway = Arc::new(gateway);
        let conversations = ConversationEngine::new(
            Arc::new(SessionStore::new()),
            Arc::clone(&gateway),
            Arc::clone(&store),
            config,
        );
        AssessmentService {
            store,
            gateway,
            conversations,
        }
    }

    /// Validate, score, and persist a structured submission, returning the
    /// stored assessment and its trend against the user's prior record.
    ///
    /// Scoring-engine instability is invisible here: an unavailable engine
    /// yields the neutral fallback result, not an error.
    pub async fn submit_assessment(
        &self,
        user_id: &str,
        payload: &serde_json::Value,
    ) -> Result<SubmissionOutcome, ServiceError> {
        let record = validate::validate(payload)?;
        let scoring = self.gateway.score(&record.scoring_answers()).await;

        let previous = self.store.latest(user_id).await?;
        let trend = trend::delta(&record, previous.as_ref().map(|s| &s.record));

        let assessment = StoredAssessment::new(user_id, record, scoring);
        self.store.save(assessment.clone()).await?;

        info!(user_id, assessment_id = %assessment.id, "assessment recorded");
        Ok(SubmissionOutcome { assessment, trend })
    }

    /// The user's most recent scoring result and its trend against the
    /// prior record. Not-found when the user has no records at all.
    pub async fn latest_assessment(&self, user_id: &str) -> Result<LatestAssessment, ServiceError> {
        let mut history = self.store.history(user_id).await?;
        let Some(assessment) = history.pop() else {
            return Err(ServiceError::NoAssessments(user_id.to_string()));
        };
        let previous = history.pop();
        let trend = trend::delta(
            &assessment.record,
            previous.as_ref().map(|s| &s.record),
        );
        Ok(LatestAssessment { assessment, trend })
    }

    /// Open a multi-turn conversational assessment. Callers may supply
    /// their own ordered question list; the default questionnaire is used
    /// otherwise.
    pub async fn start_conversation(
        &self,
        user_id: &str,
        questions: Option<Vec<String>>,
    ) -> Started {
        self.conversations.start(user_id, questions).await
    }

    /// Record one conversational answer, returning the next question or
    /// the completion summary.
    pub async fn submit_answer(
        &self,
        session_id: Uuid,
        text: &str,
    ) -> Result<AnswerOutcome, ServiceError> {
        Ok(self.conversations.submit_answer(session_id, text).await?)
    }

    /// Offer a repeat prompt if the session has stalled past the configured
    /// answer timeout.
    pub async fn check_timeout(&self, session_id: Uuid) -> Result<TimeoutStatus, ServiceError> {
        let threshold = self.conversations.config().answer_timeout;
        Ok(self.conversations.check_timeout(session_id, threshold).await?)
    }

    /// Destroy an in-progress conversation and its artifacts immediately.
    pub async fn abandon_conversation(&self, session_id: Uuid) -> Result<(), ServiceError> {
        Ok(self.conversations.abandon(session_id).await?)
    }

    /// Spawn the background task that reaps sessions idle beyond the
    /// configured TTL. The host owns the returned handle.
    pub fn spawn_session_reaper(&self) -> JoinHandle<()> {
        let idle_ttl = self.conversations.config().idle_ttl;
        self.conversations
            .sessions()
            .spawn_reaper(REAP_INTERVAL, idle_ttl)
    }

    pub fn conversations(&self) -> &ConversationEngine<S> {
        &self.conversations
    }
}
