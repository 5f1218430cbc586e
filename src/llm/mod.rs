//! LLM-focused components: the completion abstraction, the Ollama-backed
//! implementation, and the launcher-side Ollama bootstrap.

pub mod ollama;
pub mod starter;

pub use ollama::OllamaCompletion;
pub use starter::{OllamaStarter, OllamaStarterError};

use std::time::Duration;

use async_trait::async_trait;

use crate::capture::core::errors::{CaptureError, CaptureResult};

/// Text-completion collaborator.
///
/// The capture pipeline treats this as best-effort enrichment: every call
/// site recovers locally from errors, timeouts, and malformed replies.
#[async_trait]
pub trait Completion: Send + Sync {
    /// Complete a prompt and return the raw response text.
    ///
    /// # Errors
    /// Returns an error if the completion backend fails.
    async fn complete(&self, prompt: &str) -> CaptureResult<String>;
}

/// Run a completion with a bounded timeout.
///
/// # Errors
/// Returns `CompletionTimeout` if the deadline elapses, or the backend
/// error otherwise.
pub async fn complete_bounded(
    llm: &dyn Completion,
    timeout: Duration,
    prompt: &str,
) -> CaptureResult<String> {
    match tokio::time::timeout(timeout, llm.complete(prompt)).await {
        Ok(result) => result,
        Err(_) => Err(CaptureError::CompletionTimeout(timeout.as_secs())),
    }
}

/// Strip markdown code fences a model may wrap around a JSON reply.
#[must_use]
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence line.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
