//! Integration tests for the conversation state machine and session store,
//! using `/bin/sh` stand-ins for the scoring engine and the in-memory
//! assessment store.

use std::sync::Arc;
use std::time::Duration;

use sana_core::models::{SelfCareLevel, Severity};
use sana_scoring::{GatewayConfig, ScoringGateway};
use sana_session::{
    AnswerOutcome, ConversationConfig, ConversationEngine, ScoringMode, SessionError,
    SessionStore, TimeoutStatus,
};
use sana_storage::{AssessmentStore, MemoryStore};
use uuid::Uuid;

const ENGINE_OUTPUT: &str = r#"{"summary":{"emotions_count":{"calm":1},"average_confidence":0.9,"average_valence":0.6,"crisis_count":0,"risk_factors":[]},"disorder_indicators":[]}"#;

fn stdin_gateway() -> ScoringGateway {
    ScoringGateway::new(GatewayConfig {
        program: "/bin/sh".to_string(),
        args: vec![
            "-c".to_string(),
            format!("cat > /dev/null; echo '{ENGINE_OUTPUT}'"),
        ],
        timeout: Duration::from_secs(5),
    })
}

fn engine(config: ConversationConfig) -> (ConversationEngine<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let engine = ConversationEngine::new(
        Arc::new(SessionStore::new()),
        Arc::new(stdin_gateway()),
        Arc::clone(&store),
        config,
    );
    (engine, store)
}

fn three_questions() -> Vec<String> {
    vec![
        "How is your mood, 1 to 10?".to_string(),
        "How is your anxiety: none, mild, moderate, or severe?".to_string(),
        "How much self-care: none, minimal, moderate, or extensive?".to_string(),
    ]
}

#[tokio::test]
async fn answers_accumulate_in_strict_order_and_complete_on_the_last() {
    let (engine, store) = engine(ConversationConfig::default());
    let started = engine.start("ana", Some(three_questions())).await;

    let outcome = engine.submit_answer(started.session_id, "about a 7").await.unwrap();
    assert!(matches!(outcome, AnswerOutcome::InProgress { .. }));

    let outcome = engine.submit_answer(started.session_id, "mild I think").await.unwrap();
    assert!(matches!(outcome, AnswerOutcome::InProgress { .. }));

    let outcome = engine
        .submit_answer(started.session_id, "moderate self-care")
        .await
        .unwrap();
    let AnswerOutcome::Completed { summary } = outcome else {
        panic!("third answer should complete the session");
    };

    assert_eq!(
        summary.answers,
        vec!["about a 7", "mild I think", "moderate self-care"]
    );
    assert_eq!(summary.record.mood, 7);
    assert_eq!(summary.record.anxiety, Severity::Mild);
    // Answer index 2 lands in the contract's sleep_quality slot; the text
    // carries no number, so the scale midpoint applies, and the unasked
    // self-care field takes its default.
    assert_eq!(summary.record.sleep_quality, 5);
    assert_eq!(summary.record.self_care, SelfCareLevel::None);
    assert_eq!(summary.scoring.summary.emotions_count.get("calm"), Some(&1));

    // The completed assessment reached the persistence collaborator.
    let history = store.history("ana").await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].record.mood, 7);
}

#[tokio::test]
async fn duplicate_completion_is_idempotent() {
    let (engine, store) = engine(ConversationConfig::default());
    let started = engine.start("ana", Some(three_questions())).await;

    for answer in ["7", "mild", "moderate"] {
        engine.submit_answer(started.session_id, answer).await.unwrap();
    }

    // A fourth submission returns the retained summary, appends nothing,
    // and persists nothing new.
    let outcome = engine.submit_answer(started.session_id, "extra").await.unwrap();
    let AnswerOutcome::Completed { summary } = outcome else {
        panic!("duplicate completion should return the summary");
    };
    assert_eq!(summary.answers.len(), 3);
    assert_eq!(store.history("ana").await.unwrap().len(), 1);
}

#[tokio::test]
async fn current_question_tracks_the_index_and_clears_on_completion() {
    let (engine, _) = engine(ConversationConfig::default());
    let started = engine.start("ana", Some(three_questions())).await;

    assert_eq!(
        engine.current_question(started.session_id).await.as_deref(),
        Some("How is your mood, 1 to 10?")
    );

    engine.submit_answer(started.session_id, "7").await.unwrap();
    assert_eq!(
        engine.current_question(started.session_id).await.as_deref(),
        Some("How is your anxiety: none, mild, moderate, or severe?")
    );

    engine.submit_answer(started.session_id, "mild").await.unwrap();
    engine.submit_answer(started.session_id, "moderate").await.unwrap();
    assert_eq!(engine.current_question(started.session_id).await, None);
}

#[tokio::test]
async fn unknown_session_is_a_not_found_error() {
    let (engine, _) = engine(ConversationConfig::default());
    let result = engine.submit_answer(Uuid::new_v4(), "hello").await;
    assert!(matches!(result, Err(SessionError::NotFound(_))));
}

#[tokio::test]
async fn stalled_sessions_get_a_repeat_prompt_without_advancing() {
    let (engine, _) = engine(ConversationConfig::default());
    let started = engine.start("ana", Some(three_questions())).await;

    // Fresh session: still active.
    let status = engine
        .check_timeout(started.session_id, Duration::from_secs(60))
        .await
        .unwrap();
    assert!(matches!(status, TimeoutStatus::Active));

    tokio::time::sleep(Duration::from_millis(50)).await;
    let status = engine
        .check_timeout(started.session_id, Duration::from_millis(10))
        .await
        .unwrap();
    let TimeoutStatus::Repeat { question } = status else {
        panic!("stalled session should be offered a repeat prompt");
    };
    assert_eq!(question, "How is your mood, 1 to 10?");

    // The repeat did not advance the session; the same answer still lands
    // on question 0.
    let outcome = engine.submit_answer(started.session_id, "7").await.unwrap();
    let AnswerOutcome::InProgress { next_question } = outcome else {
        panic!("session should still be in progress");
    };
    assert_eq!(next_question, "How is your anxiety: none, mild, moderate, or severe?");
}

#[tokio::test]
async fn completed_sessions_are_deleted_after_the_grace_period() {
    let config = ConversationConfig {
        completion_grace: Duration::from_millis(50),
        ..ConversationConfig::default()
    };
    let (engine, _) = engine(config);
    let started = engine.start("ana", Some(three_questions())).await;

    for answer in ["7", "mild", "moderate"] {
        engine.submit_answer(started.session_id, answer).await.unwrap();
    }
    assert_eq!(engine.sessions().len(), 1);

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(engine.sessions().len(), 0);
    assert!(matches!(
        engine.submit_answer(started.session_id, "late").await,
        Err(SessionError::NotFound(_))
    ));
}

#[tokio::test]
async fn file_mode_creates_an_artifact_that_abandon_removes() {
    let store = Arc::new(MemoryStore::new());
    // The stand-in engine reads the answers file passed as its argument.
    let gateway = ScoringGateway::new(GatewayConfig {
        program: "/bin/sh".to_string(),
        args: vec![
            "-c".to_string(),
            format!("grep -q '^\\[' \"$0\" && echo '{ENGINE_OUTPUT}'"),
        ],
        timeout: Duration::from_secs(5),
    });
    let engine = ConversationEngine::new(
        Arc::new(SessionStore::new()),
        Arc::new(gateway),
        store,
        ConversationConfig {
            scoring_mode: ScoringMode::TempFile,
            completion_grace: Duration::from_secs(60),
            ..ConversationConfig::default()
        },
    );

    let started = engine.start("ana", Some(three_questions())).await;
    for answer in ["7", "mild", "moderate"] {
        engine.submit_answer(started.session_id, answer).await.unwrap();
    }

    let handle = engine.sessions().get(started.session_id).expect("session retained");
    let artifact = handle.lock().await.artifacts[0].clone();
    assert!(artifact.exists(), "answers file should exist during the grace period");
    drop(handle);

    engine.abandon(started.session_id).await.unwrap();
    assert!(!artifact.exists(), "abandon should remove session artifacts");
}

#[tokio::test]
async fn idle_sessions_are_reaped_and_fresh_ones_kept() {
    let (engine, _) = engine(ConversationConfig::default());
    let stale = engine.start("ana", Some(three_questions())).await;

    tokio::time::sleep(Duration::from_millis(80)).await;
    let fresh = engine.start("ben", Some(three_questions())).await;

    let reaped = engine.sessions().reap_idle(Duration::from_millis(50)).await;
    assert_eq!(reaped, 1);
    assert!(engine.sessions().get(stale.session_id).is_none());
    assert!(engine.sessions().get(fresh.session_id).is_some());
}

/// A store whose first write fails, for exercising completion retry.
#[derive(Debug, Default)]
struct FlakyStore {
    fail_first: std::sync::atomic::AtomicBool,
    inner: MemoryStore,
}

impl AssessmentStore for FlakyStore {
    async fn save(
        &self,
        assessment: sana_core::models::StoredAssessment,
    ) -> Result<(), sana_storage::StorageError> {
        if self.fail_first.swap(false, std::sync::atomic::Ordering::SeqCst) {
            return Err(sana_storage::StorageError::Save {
                user_id: assessment.user_id,
                reason: "store offline".to_string(),
            });
        }
        self.inner.save(assessment).await
    }

    async fn history(
        &self,
        user_id: &str,
    ) -> Result<Vec<sana_core::models::StoredAssessment>, sana_storage::StorageError> {
        self.inner.history(user_id).await
    }
}

#[tokio::test]
async fn failed_persistence_keeps_the_answer_log_and_retries_without_appending() {
    let store = Arc::new(FlakyStore {
        fail_first: std::sync::atomic::AtomicBool::new(true),
        inner: MemoryStore::new(),
    });
    let engine = ConversationEngine::new(
        Arc::new(SessionStore::new()),
        Arc::new(stdin_gateway()),
        Arc::clone(&store),
        ConversationConfig::default(),
    );

    let question = "How is your mood, 1 to 10?".to_string();
    let started = engine.start("ana", Some(vec![question.clone()])).await;

    let err = engine.submit_answer(started.session_id, "7").await.unwrap_err();
    assert!(matches!(err, SessionError::Storage(_)));

    // The appended answer and index survive the failure; the session is
    // waiting on a retry of the same question.
    {
        let handle = engine.sessions().get(started.session_id).expect("session retained");
        let session = handle.lock().await;
        assert_eq!(session.answers.len(), 1);
        assert_eq!(session.answers[0].raw_text, "7");
    }
    assert_eq!(
        engine.current_question(started.session_id).await.as_deref(),
        Some(question.as_str())
    );

    // The retry completes from the retained answers without appending.
    let outcome = engine
        .submit_answer(started.session_id, "retry nudge")
        .await
        .unwrap();
    let AnswerOutcome::Completed { summary } = outcome else {
        panic!("retry should complete the session");
    };
    assert_eq!(summary.answers, vec!["7"]);
    assert_eq!(store.inner.history("ana").await.unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_submissions_to_one_session_never_interleave() {
    let (engine, _) = engine(ConversationConfig::default());
    let questions: Vec<String> = (0..10).map(|i| format!("question {i}")).collect();
    let started = engine.start("ana", Some(questions)).await;

    let engine = Arc::new(engine);
    let mut tasks = Vec::new();
    for i in 0..10 {
        let engine = Arc::clone(&engine);
        let id = started.session_id;
        tasks.push(tokio::spawn(async move {
            engine.submit_answer(id, &format!("answer {i}")).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let handle = engine.sessions().get(started.session_id).expect("grace period");
    let session = handle.lock().await;
    assert_eq!(session.answers.len(), 10);
    // Indices advanced one at a time with no duplicates or gaps.
    for (expected, answer) in session.answers.iter().enumerate() {
        assert_eq!(answer.question_index, expected);
    }
}
