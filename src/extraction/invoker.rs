// * Model Invoker
// * Runs the local model as a child process: prompt on stdin, answer on stdout.

use crate::config::constants::{DEFAULT_MODEL, DEFAULT_MODEL_PROGRAM, MODEL_TIMEOUT_SECS};
use crate::extraction::errors::ModelError;
use crate::ops::telemetry;
use futures::future::BoxFuture;
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

// * Shown when the runtime binary is missing or its server is down
pub const UNAVAILABLE_HINT: &str =
    "Ollama not found. Please install Ollama and ensure 'ollama serve' is running.";

// * stderr fragments meaning the runtime server itself cannot be reached
const UNREACHABLE_MARKERS: &[&str] = &["could not connect", "connection refused", "is ollama running"];

/// Generates text from a prompt
///
/// Implementations must fail with [`ModelError::Timeout`] once their time budget is spent.
pub trait ModelInvoker: Send + Sync {
    /// Identifier of the model being called
    fn model(&self) -> &str;

    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, ModelError>>;
}

/// Invokes a model through a local command such as `ollama run <model>`
#[derive(Debug, Clone)]
pub struct CommandInvoker {
    program: String,
    args: Vec<String>,
    model: String,
    timeout: Duration,
}

impl CommandInvoker {
    /// `ollama run <model>` with the default timeout
    pub fn ollama(model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            program: DEFAULT_MODEL_PROGRAM.to_string(),
            args: vec!["run".to_string(), model.clone()],
            model,
            timeout: Duration::from_secs(MODEL_TIMEOUT_SECS),
        }
    }

    /// Arbitrary program; the prompt is still written to stdin
    pub fn new(program: impl Into<String>, args: Vec<String>, model: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args,
            model: model.into(),
            timeout: Duration::from_secs(MODEL_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn run(&self, prompt: &str) -> Result<String, ModelError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ModelError::ModelUnavailable(UNAVAILABLE_HINT.to_string()),
                _ => ModelError::InvocationError(format!("failed to start {}: {}", self.program, e)),
            })?;

        // * Feed stdin concurrently so a chatty child cannot stall on a full stdout pipe
        let writer = child.stdin.take().map(|mut stdin| {
            let payload = prompt.as_bytes().to_vec();
            tokio::spawn(async move {
                // * A child that exits before reading its prompt closes the pipe early
                if let Err(e) = stdin.write_all(&payload).await {
                    tracing::debug!(error = %e, "Prompt write to model stdin failed");
                }
                if let Err(e) = stdin.shutdown().await {
                    tracing::debug!(error = %e, "Closing model stdin failed");
                }
            })
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ModelError::InvocationError(e.to_string()))?;

        if let Some(writer) = writer {
            if let Err(e) = writer.await {
                tracing::debug!(error = %e, "Prompt writer task did not finish");
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let lowered = stderr.to_lowercase();
            if UNREACHABLE_MARKERS.iter().any(|m| lowered.contains(m)) {
                return Err(ModelError::ModelUnavailable(format!("{} ({})", UNAVAILABLE_HINT, stderr)));
            }
            return Err(ModelError::InvocationError(stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Default for CommandInvoker {
    fn default() -> Self {
        Self::ollama(DEFAULT_MODEL)
    }
}

impl ModelInvoker for CommandInvoker {
    fn model(&self) -> &str {
        &self.model
    }

    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, ModelError>> {
        Box::pin(async move {
            let started = Instant::now();
            // * Dropping the timed-out future drops the child, which kills it
            let result = match tokio::time::timeout(self.timeout, self.run(prompt)).await {
                Ok(result) => result,
                Err(_) => Err(ModelError::Timeout(self.timeout)),
            };

            telemetry::record_model_invocation(started.elapsed().as_secs_f64());
            tracing::debug!(
                model = %self.model,
                elapsed_ms = started.elapsed().as_millis() as u64,
                ok = result.is_ok(),
                "Model invocation finished"
            );

            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_defaults() {
        let invoker = CommandInvoker::ollama("mistral");
        assert_eq!(invoker.model(), "mistral");
        assert_eq!(invoker.timeout(), Duration::from_secs(MODEL_TIMEOUT_SECS));
    }

    #[tokio::test]
    async fn test_missing_program_is_unavailable() {
        let invoker = CommandInvoker::new("market-mapper-no-such-binary", vec![], "m");

        let result = invoker.generate("hello").await;

        match result {
            Err(ModelError::ModelUnavailable(hint)) => assert!(hint.contains("ollama serve")),
            other => panic!("expected ModelUnavailable, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdout_is_returned_trimmed() {
        let invoker = CommandInvoker::new("cat", vec![], "echo");

        let result = invoker.generate("  [\"ok\"]  \n").await.unwrap();

        assert_eq!(result, "[\"ok\"]");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_invocation_error() {
        let invoker = CommandInvoker::new(
            "sh",
            vec!["-c".into(), "echo model exploded >&2; exit 3".into()],
            "broken",
        );

        match invoker.generate("prompt").await {
            Err(ModelError::InvocationError(msg)) => assert!(msg.contains("model exploded")),
            other => panic!("expected InvocationError, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_child_ignoring_stdin_still_succeeds() {
        let prompt = "x".repeat(1 << 20);
        let invoker = CommandInvoker::new("sh", vec!["-c".into(), "echo '[]'".into()], "deaf");

        let result = invoker.generate(&prompt).await;

        assert_eq!(result, Ok("[]".to_string()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreachable_server_is_unavailable() {
        let invoker = CommandInvoker::new(
            "sh",
            vec!["-c".into(), "echo 'Error: could not connect to ollama app' >&2; exit 1".into()],
            "down",
        );

        let err = invoker.generate("prompt").await.unwrap_err();
        assert!(err.is_fatal());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_model_times_out() {
        let invoker = CommandInvoker::new("sh", vec!["-c".into(), "sleep 5".into()], "slow")
            .with_timeout(Duration::from_millis(200));

        let started = Instant::now();
        let result = invoker.generate("prompt").await;

        assert_eq!(result, Err(ModelError::Timeout(Duration::from_millis(200))));
        assert!(started.elapsed() < Duration::from_secs(4));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Model request timed out after 200ms"
        );
    }
}
