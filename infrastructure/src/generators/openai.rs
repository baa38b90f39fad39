//! OpenAI-compatible completions generator
//!
//! Talks to any server exposing `POST {base_url}/completions` (llama.cpp,
//! vLLM, text-generation-inference, the hosted OpenAI API).

use async_trait::async_trait;
use colloquy_application::{GenerationError, TextGenerator};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Transport-level timeout; the driver applies its own per-call limit too
const HTTP_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: Option<String>,
}

/// Text generator backed by an OpenAI-compatible completions endpoint
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleGenerator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    max_tokens: u32,
    api_key: Option<String>,
}

impl OpenAiCompatibleGenerator {
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| GenerationError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/completions", base_url.trim_end_matches('/')),
            model: model.into(),
            max_tokens,
            api_key: None,
        })
    }

    /// Send `Authorization: Bearer <key>` with every request
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Pull the completion out of a response body.
///
/// Some servers echo the prompt in front of the completion; the echo is
/// dropped so only new text remains.
fn parse_completion(body: &str, prompt: &str) -> Result<String, GenerationError> {
    let response: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::InvalidResponse(format!("malformed body: {}", e)))?;

    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.text)
        .ok_or_else(|| GenerationError::InvalidResponse("no choices[0].text".to_string()))?;

    let text = text.strip_prefix(prompt).unwrap_or(&text);
    Ok(text.trim().to_string())
}

#[async_trait]
impl TextGenerator for OpenAiCompatibleGenerator {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: self.max_tokens,
        };

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                GenerationError::Timeout(HTTP_TIMEOUT)
            } else {
                GenerationError::Connection(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Connection(e.to_string()))?;

        if !status.is_success() {
            return Err(GenerationError::RequestFailed(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        debug!(model = %self.model, bytes = body.len(), "Completion received");
        parse_completion(&body, prompt)
    }
}
