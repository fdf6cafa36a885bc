use std::time::Duration;

use thiserror::Error;

/// Failure modes of the external scoring engine.
///
/// Internal only: the gateway logs each variant and substitutes the neutral
/// fallback response, so callers never observe these.
#[derive(Debug, Error)]
pub enum ScoringEngineFailure {
    #[error("failed to spawn scoring engine: {0}")]
    Spawn(String),

    #[error("failed to encode scoring request: {0}")]
    Request(String),

    #[error("scoring engine i/o error: {0}")]
    Io(String),

    #[error("scoring engine exited with status {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("scoring engine output was not valid JSON: {0}")]
    Parse(String),

    #[error("scoring engine exceeded the {0:?} deadline and was killed")]
    Timeout(Duration),
}
