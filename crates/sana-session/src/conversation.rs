//! The multi-turn conversation state machine.
//!
//! Drives question sequencing and answer accumulation for one session at a
//! time, then runs the completion pipeline: assemble the record from the
//! normalized answers, score it through the gateway, persist it, and retain
//! the session for a short grace period so duplicate completion signals are
//! idempotent.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use jiff::{SignedDuration, Timestamp};
use sana_assess::assemble::assemble_record;
use sana_core::contract;
use sana_core::models::{AssessmentRecord, ScoringResponse, StoredAssessment};
use sana_scoring::{ScoringGateway, write_answers_file};
use sana_storage::AssessmentStore;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::SessionError;
use crate::store::{Answer, Session, SessionState, SessionStore};

/// How the completion pipeline hands answers to the scoring engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoringMode {
    /// JSON array over the engine's stdin.
    #[default]
    Stdin,
    /// JSON file whose path is passed as the engine's final argument.
    /// Used for the voice hand-off path; the file becomes a session
    /// artifact and is removed on session cleanup.
    TempFile,
}

#[derive(Debug, Clone)]
pub struct ConversationConfig {
    /// Threshold for offering a repeat prompt on a stalled session.
    pub answer_timeout: Duration,
    /// How long a completed session lingers before deletion, so late
    /// duplicate completion signals still get the summary back.
    pub completion_grace: Duration,
    /// Idle bound beyond which the reaper may destroy a session.
    pub idle_ttl: Duration,
    pub scoring_mode: ScoringMode,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        ConversationConfig {
            answer_timeout: Duration::from_secs(120),
            completion_grace: Duration::from_secs(60),
            idle_ttl: Duration::from_secs(30 * 60),
            scoring_mode: ScoringMode::Stdin,
        }
    }
}

/// Result of starting a conversation.
#[derive(Debug, Clone)]
pub struct Started {
    pub session_id: Uuid,
    pub first_question: String,
}

/// Everything the completion pipeline produced for one finished session.
#[derive(Debug, Clone)]
pub struct CompletionSummary {
    /// Raw answers in submission order.
    pub answers: Vec<String>,
    pub record: AssessmentRecord,
    pub scoring: ScoringResponse,
}

#[derive(Debug, Clone)]
pub enum AnswerOutcome {
    InProgress { next_question: String },
    Completed { summary: CompletionSummary },
}

#[derive(Debug, Clone)]
pub enum TimeoutStatus {
    Active,
    Repeat { question: String },
}

/// The conversation state machine, generic over the persistence
/// collaborator. All session mutation happens under the per-session lock,
/// so answers are strictly ordered and the question index only advances.
pub struct ConversationEngine<S: AssessmentStore> {
    sessions: Arc<SessionStore>,
    gateway: Arc<ScoringGateway>,
    store: Arc<S>,
    config: ConversationConfig,
}

impl<S: AssessmentStore> ConversationEngine<S> {
    pub fn new(
        sessions: Arc<SessionStore>,
        gateway: Arc<ScoringGateway>,
        store: Arc<S>,
        config: ConversationConfig,
    ) -> Self {
        ConversationEngine {
            sessions,
            gateway,
            store,
            config,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    pub fn config(&self) -> &ConversationConfig {
        &self.config
    }

    /// Create a session awaiting its first answer. An omitted or empty
    /// question list falls back to the default questionnaire.
    pub async fn start(&self, user_id: &str, questions: Option<Vec<String>>) -> Started {
        let questions = match questions {
            Some(q) if !q.is_empty() => q,
            _ => contract::default_questions(),
        };
        let session = Session::new(user_id, questions);
        let session_id = session.id;
        let first_question = session.questions[0].clone();
        self.sessions.create(session);

        info!(%session_id, user_id, "conversation started");
        Started {
            session_id,
            first_question,
        }
    }

    /// The question the session is currently waiting on. `None` when the
    /// session is absent or already completed.
    pub async fn current_question(&self, session_id: Uuid) -> Option<String> {
        let handle = self.sessions.get(session_id)?;
        let session = handle.lock().await;
        if session.state == SessionState::Completed {
            return None;
        }
        // After a failed completion the index sits one past the end while
        // the session waits on a retry of the final question.
        let index = session
            .current_index
            .min(session.questions.len().saturating_sub(1));
        session.questions.get(index).cloned()
    }

    /// Append an answer and advance. Past the last question the session
    /// completes: answers are assembled into a record, scored, persisted,
    /// and the session is retained for the grace period then deleted.
    ///
    /// Resubmitting to a completed session is a no-op that returns the
    /// retained summary; it never appends another answer. Submitting after
    /// a persistence failure re-runs the completion pipeline from the
    /// retained answers, also without appending.
    pub async fn submit_answer(
        &self,
        session_id: Uuid,
        raw_text: &str,
    ) -> Result<AnswerOutcome, SessionError> {
        let handle = self
            .sessions
            .get(session_id)
            .ok_or(SessionError::NotFound(session_id))?;
        let mut session = handle.lock().await;

        // Completed sessions always carry their summary (completion and
        // state flip together under this lock), so a duplicate signal is
        // answered from the retained result.
        if let Some(summary) = session.completion.clone() {
            return Ok(AnswerOutcome::Completed { summary });
        }

        if session.current_index < session.questions.len() {
            let question_index = session.current_index;
            session.answers.push(Answer {
                question_index,
                raw_text: raw_text.to_string(),
                recorded_at: Timestamp::now(),
            });
            session.current_index += 1;
            session.touch();

            if session.current_index < session.questions.len() {
                let next_question = session.questions[session.current_index].clone();
                return Ok(AnswerOutcome::InProgress { next_question });
            }
        } else {
            // Every answer is already in but a previous completion attempt
            // failed to persist; this submission retries the pipeline
            // without appending.
            session.touch();
        }

        session.state = SessionState::Completed;
        match self.complete(&mut session).await {
            Ok(summary) => {
                session.completion = Some(summary.clone());
                self.schedule_deletion(session_id);
                info!(%session_id, user_id = %session.user_id, "conversation completed");
                Ok(AnswerOutcome::Completed { summary })
            }
            Err(e) => {
                // Persistence rejected the record. The answer log and index
                // stay intact (answers are append-only and the index never
                // decreases); the session returns to awaiting a retry.
                session.state = SessionState::AwaitingAnswer;
                warn!(%session_id, error = %e, "completion not persisted, session awaiting retry");
                Err(e)
            }
        }
    }

    /// Score and persist a finished session. Runs under the caller's
    /// per-session lock.
    async fn complete(&self, session: &mut Session) -> Result<CompletionSummary, SessionError> {
        let answers: Vec<String> = session
            .answers
            .iter()
            .map(|a| a.raw_text.clone())
            .collect();
        let record = assemble_record(&answers);

        let scoring = match self.config.scoring_mode {
            ScoringMode::Stdin => self.gateway.score(&record.scoring_answers()).await,
            ScoringMode::TempFile => {
                self.score_via_file(session, &record.scoring_answers()).await
            }
        };

        let stored = StoredAssessment::new(&session.user_id, record.clone(), scoring.clone());
        self.store.save(stored).await?;

        Ok(CompletionSummary {
            answers,
            record,
            scoring,
        })
    }

    /// File-based scoring hand-off. The answers file becomes a session
    /// artifact; a write failure degrades to the neutral fallback rather
    /// than failing the conversation.
    async fn score_via_file(&self, session: &mut Session, answers: &[String]) -> ScoringResponse {
        let path: PathBuf = match write_answers_file(answers).await {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "answers file write failed, substituting neutral fallback");
                return ScoringResponse::fallback();
            }
        };
        session.artifacts.push(path.clone());
        self.gateway.score_file(&path).await
    }

    fn schedule_deletion(&self, session_id: Uuid) {
        let sessions = Arc::clone(&self.sessions);
        let grace = self.config.completion_grace;
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            sessions.delete(session_id).await;
        });
    }

    /// Compare the session's idle time against `threshold`. A stalled
    /// session is offered its current question again and its interaction
    /// clock restarts; an active (or completed) session is left untouched.
    pub async fn check_timeout(
        &self,
        session_id: Uuid,
        threshold: Duration,
    ) -> Result<TimeoutStatus, SessionError> {
        let threshold = SignedDuration::try_from(threshold).unwrap_or(SignedDuration::MAX);
        self.sessions
            .mutate(session_id, |session| {
                if session.state == SessionState::Completed {
                    return TimeoutStatus::Active;
                }
                if session.idle_for(Timestamp::now()) < threshold {
                    return TimeoutStatus::Active;
                }
                let index = session
                    .current_index
                    .min(session.questions.len().saturating_sub(1));
                let question = session.questions.get(index).cloned().unwrap_or_default();
                session.touch();
                TimeoutStatus::Repeat { question }
            })
            .await
    }

    /// Explicit abandonment: destroy the session and its artifacts now
    /// instead of waiting for the idle reaper.
    pub async fn abandon(&self, session_id: Uuid) -> Result<(), SessionError> {
        if self.sessions.delete(session_id).await {
            info!(%session_id, "conversation abandoned");
            Ok(())
        } else {
            Err(SessionError::NotFound(session_id))
        }
    }
}
