//! Ollama-backed completion collaborator.

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use rig::client::CompletionClient;
use rig::completion::CompletionModel;
use rig::message::AssistantContent;
use rig::providers::ollama;

use crate::capture::core::config::LlmConfig;
use crate::capture::core::errors::{CaptureError, CaptureResult};
use crate::llm::Completion;

/// Completion collaborator backed by a local or remote Ollama server.
pub struct OllamaCompletion {
    model: ollama::CompletionModel,
}

impl OllamaCompletion {
    /// Create a new client using the completion model config.
    ///
    /// # Errors
    /// Returns an error if the Ollama client cannot be built.
    pub fn new(llm: &LlmConfig) -> CaptureResult<Self> {
        let builder = ollama::Client::<ReqwestClient>::builder().api_key(rig::client::Nothing);
        let builder = if let Some(base_url) = &llm.base_url {
            builder.base_url(base_url)
        } else {
            builder
        };
        let client = builder.build().map_err(CaptureError::from)?;
        let model = client.completion_model(llm.model.clone());
        Ok(Self { model })
    }
}

#[async_trait]
impl Completion for OllamaCompletion {
    async fn complete(&self, prompt: &str) -> CaptureResult<String> {
        let request = self
            .model
            .completion_request(prompt.to_string())
            .temperature(0.0)
            .build();

        let response = self.model.completion(request).await?;
        Ok(extract_text(&response.choice))
    }
}

fn extract_text(choice: &rig::OneOrMany<AssistantContent>) -> String {
    let mut out = String::new();
    for content in choice.iter() {
        if let AssistantContent::Text(text) = content {
            out.push_str(&text.text);
        }
    }
    out
}
