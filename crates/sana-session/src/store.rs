//! In-memory registry of live conversational sessions.
//!
//! The store is the only shared mutable resource in the pipeline. The
//! registry map is guarded by a short-lived outer lock (never held across
//! an await); each session carries its own async mutex so mutations are
//! serialized per session while distinct sessions proceed in parallel.
//! Intentionally ephemeral: nothing survives a process restart — durable
//! results are handed to the persistence collaborator before deletion.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use jiff::{SignedDuration, Timestamp};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::conversation::CompletionSummary;
use crate::error::SessionError;

/// One recorded answer. Appended in strict submission order, never
/// reordered or removed once appended.
#[derive(Debug, Clone)]
pub struct Answer {
    pub question_index: usize,
    pub raw_text: String,
    pub recorded_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingAnswer,
    Completed,
}

/// Live state of one in-progress conversational assessment. Owned
/// exclusively by the [`SessionStore`]; mutated only through the
/// conversation engine while the per-session lock is held.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub user_id: String,
    pub questions: Vec<String>,
    pub current_index: usize,
    pub answers: Vec<Answer>,
    pub created_at: Timestamp,
    pub last_interaction_at: Timestamp,
    pub state: SessionState,
    /// Retained after completion so late duplicate completion signals can
    /// be answered without re-scoring or re-persisting.
    pub completion: Option<CompletionSummary>,
    /// Temporary files created for the scoring hand-off. Owned by this
    /// session alone; removed when the session is deleted.
    pub artifacts: Vec<PathBuf>,
}

impl Session {
    pub fn new(user_id: impl Into<String>, questions: Vec<String>) -> Self {
        let now = Timestamp::now();
        Session {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            questions,
            current_index: 0,
            answers: Vec::new(),
            created_at: now,
            last_interaction_at: now,
            state: SessionState::AwaitingAnswer,
            completion: None,
            artifacts: Vec::new(),
        }
    }

    pub fn touch(&mut self) {
        self.last_interaction_at = Timestamp::now();
    }

    /// Time since the owner last interacted with this session.
    pub fn idle_for(&self, now: Timestamp) -> SignedDuration {
        now.duration_since(self.last_interaction_at)
    }
}

type SessionHandle = Arc<Mutex<Session>>;

/// Process-wide keyed registry `session id -> session`.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: StdMutex<HashMap<Uuid, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session, returning its handle.
    pub fn create(&self, session: Session) -> SessionHandle {
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));
        self.sessions
            .lock()
            .expect("session registry poisoned")
            .insert(id, Arc::clone(&handle));
        handle
    }

    pub fn get(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions
            .lock()
            .expect("session registry poisoned")
            .get(&id)
            .cloned()
    }

    /// Atomic read-modify-write under the per-session lock.
    pub async fn mutate<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Result<R, SessionError> {
        let handle = self.get(id).ok_or(SessionError::NotFound(id))?;
        let mut session = handle.lock().await;
        Ok(f(&mut session))
    }

    /// Remove a session and release its temporary artifacts. Returns false
    /// when the id was already gone.
    pub async fn delete(&self, id: Uuid) -> bool {
        let removed = self
            .sessions
            .lock()
            .expect("session registry poisoned")
            .remove(&id);

        let Some(handle) = removed else {
            return false;
        };

        let session = handle.lock().await;
        for artifact in &session.artifacts {
            if let Err(e) = tokio::fs::remove_file(artifact).await {
                debug!(path = %artifact.display(), error = %e, "artifact already gone");
            }
        }
        debug!(session_id = %id, "session deleted");
        true
    }

    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .expect("session registry poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delete every session idle beyond `idle_ttl`. Returns how many were
    /// removed.
    pub async fn reap_idle(&self, idle_ttl: Duration) -> usize {
        let ttl = SignedDuration::try_from(idle_ttl).unwrap_or(SignedDuration::MAX);
        let now = Timestamp::now();

        let snapshot: Vec<(Uuid, SessionHandle)> = self
            .sessions
            .lock()
            .expect("session registry poisoned")
            .iter()
            .map(|(id, handle)| (*id, Arc::clone(handle)))
            .collect();

        let mut reaped = 0;
        for (id, handle) in snapshot {
            let idle = handle.lock().await.idle_for(now);
            if idle >= ttl && self.delete(id).await {
                reaped += 1;
            }
        }
        reaped
    }

    /// Spawn the background reaper that bounds memory held by abandoned
    /// sessions.
    pub fn spawn_reaper(
        self: &Arc<Self>,
        every: Duration,
        idle_ttl: Duration,
    ) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.tick().await;
            loop {
                interval.tick().await;
                let reaped = store.reap_idle(idle_ttl).await;
                if reaped > 0 {
                    info!(reaped, "reaped idle sessions");
                }
            }
        })
    }
}
