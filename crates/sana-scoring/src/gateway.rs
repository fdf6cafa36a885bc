//! Subprocess gateway to the external scoring engine.
//!
//! Protocol: launch the engine once per call, write the JSON-encoded answer
//! array to its stdin and close the stream (or pass a JSON file path as the
//! final argument for the file-based variant), accumulate stdout and stderr
//! concurrently, and wait for exit. Exit code 0 with parseable output is
//! success; everything else falls back to the neutral response.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use sana_core::models::ScoringResponse;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ScoringEngineFailure;

/// How the external scoring engine is launched.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Program to execute (e.g. `python3`).
    pub program: String,
    /// Fixed arguments, e.g. the engine script path. Per-call arguments
    /// (the answers file path in file mode) are appended after these.
    pub args: Vec<String>,
    /// Deadline after which the engine is killed and the fallback returned.
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            program: "python3".to_string(),
            args: vec!["scoring_engine.py".to_string()],
            timeout: Duration::from_secs(30),
        }
    }
}

/// Stateless gateway to the external scoring engine.
///
/// `score` and `score_file` never fail observably: spawn failures, non-zero
/// exits, timeouts, and unparseable output are each logged distinctly and
/// converted to [`ScoringResponse::fallback`]. No automatic retry — each
/// call is a single attempt.
#[derive(Debug, Clone)]
pub struct ScoringGateway {
    config: GatewayConfig,
}

impl ScoringGateway {
    pub fn new(config: GatewayConfig) -> Self {
        ScoringGateway { config }
    }

    /// Score an answer sequence by piping the JSON array to the engine's
    /// stdin.
    pub async fn score(&self, answers: &[String]) -> ScoringResponse {
        self.absorb(self.run(Some(answers), None).await)
    }

    /// File-based variant: the answers are already in a JSON file whose
    /// path is passed as the engine's final argument. The caller owns the
    /// file and its cleanup.
    pub async fn score_file(&self, answers_path: &Path) -> ScoringResponse {
        self.absorb(self.run(None, Some(answers_path)).await)
    }

    fn absorb(&self, result: Result<ScoringResponse, ScoringEngineFailure>) -> ScoringResponse {
        match result {
            Ok(response) => response,
            Err(failure) => {
                warn!(%failure, "scoring engine unavailable, substituting neutral fallback");
                ScoringResponse::fallback()
            }
        }
    }

    async fn run(
        &self,
        answers: Option<&[String]>,
        answers_path: Option<&Path>,
    ) -> Result<ScoringResponse, ScoringEngineFailure> {
        let mut command = Command::new(&self.config.program);
        command
            .args(&self.config.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match answers_path {
            Some(path) => {
                command.arg(path).stdin(Stdio::null());
            }
            None => {
                command.stdin(Stdio::piped());
            }
        }

        let mut child = command
            .spawn()
            .map_err(|e| ScoringEngineFailure::Spawn(e.to_string()))?;

        // Write stdin from a separate task so input and output pipes drain
        // concurrently; a large payload and a chatty engine would otherwise
        // deadlock on pipe backpressure. Dropping the handle closes the
        // stream, signalling end of input.
        let writer = match answers {
            Some(answers) => {
                let mut stdin = child
                    .stdin
                    .take()
                    .ok_or_else(|| ScoringEngineFailure::Spawn("stdin not captured".to_string()))?;
                let payload = serde_json::to_vec(answers)
                    .map_err(|e| ScoringEngineFailure::Request(e.to_string()))?;
                Some(tokio::spawn(async move {
                    let _ = stdin.write_all(&payload).await;
                }))
            }
            None => None,
        };

        let output = match tokio::time::timeout(self.config.timeout, child.wait_with_output()).await
        {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(ScoringEngineFailure::Io(e.to_string())),
            // Dropping the timed-out future drops the child, and
            // kill_on_drop reaps the hung engine.
            Err(_) => return Err(ScoringEngineFailure::Timeout(self.config.timeout)),
        };

        if let Some(writer) = writer {
            let _ = writer.await;
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ScoringEngineFailure::NonZeroExit {
                code: output.status.code(),
                stderr,
            });
        }

        let response = parse_engine_output(&output.stdout)?;
        info!(
            emotions = response.summary.emotions_count.len(),
            crisis_count = response.summary.crisis_count,
            "scoring engine run complete"
        );
        Ok(response)
    }
}

/// Parse engine stdout. The engine must emit exactly one JSON object, but
/// trailing diagnostic lines are tolerated by retrying the parse on the
/// last non-empty line.
fn parse_engine_output(stdout: &[u8]) -> Result<ScoringResponse, ScoringEngineFailure> {
    if let Ok(response) = serde_json::from_slice::<ScoringResponse>(stdout) {
        return Ok(response);
    }

    let text = String::from_utf8_lossy(stdout);
    let last_line = text
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| ScoringEngineFailure::Parse("engine produced no output".to_string()))?;

    serde_json::from_str(last_line).map_err(|e| ScoringEngineFailure::Parse(e.to_string()))
}

/// Write an answer array to a uuid-named JSON file under the OS temp
/// directory, for the file-based engine invocation. The caller (the session
/// that requested scoring) owns the file and removes it during cleanup.
pub async fn write_answers_file(answers: &[String]) -> Result<PathBuf, ScoringEngineFailure> {
    let path = std::env::temp_dir().join(format!("sana-answers-{}.json", Uuid::new_v4()));
    let payload =
        serde_json::to_vec(answers).map_err(|e| ScoringEngineFailure::Request(e.to_string()))?;
    tokio::fs::write(&path, payload)
        .await
        .map_err(|e| ScoringEngineFailure::Io(e.to_string()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_buffer_json_parses() {
        let out = br#"{"summary":{"emotions_count":{"calm":2},"average_confidence":0.9,"average_valence":0.7,"crisis_count":0,"risk_factors":[]},"disorder_indicators":[]}"#;
        let response = parse_engine_output(out).expect("should parse");
        assert_eq!(response.summary.emotions_count.get("calm"), Some(&2));
    }

    #[test]
    fn trailing_diagnostics_fall_back_to_last_line() {
        let out = b"loading model\nwarmup done\n{\"summary\":{\"emotions_count\":{\"sad\":1},\"average_confidence\":0.8,\"average_valence\":0.3,\"crisis_count\":1,\"risk_factors\":[\"isolation\"]},\"disorder_indicators\":[\"depression\"]}\n";
        let response = parse_engine_output(out).expect("last line should parse");
        assert_eq!(response.summary.crisis_count, 1);
        assert_eq!(response.disorder_indicators, vec!["depression"]);
    }

    #[test]
    fn garbage_output_is_a_parse_failure() {
        assert!(matches!(
            parse_engine_output(b"not json at all"),
            Err(ScoringEngineFailure::Parse(_))
        ));
        assert!(matches!(
            parse_engine_output(b"  \n \n"),
            Err(ScoringEngineFailure::Parse(_))
        ));
    }
}
