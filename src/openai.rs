use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::Config;

// Structures matching the /v1/completions endpoint. Sampling parameters are
// fixed: deterministic output, capped length.
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
    // Other fields like usage, timings, etc. are ignored
}

#[derive(Debug, Deserialize)]
struct Choice {
    text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("completion endpoint returned {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error("completion response contained no choices")]
    EmptyChoices,
}

/// HTTP client for the hosted completions endpoint. Cheap to clone; the
/// underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: Client,
    config: Config,
}

impl CompletionClient {
    pub fn new(config: Config) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Sends exactly one completion request for the given prompt and returns
    /// the first choice's text, trimmed of outer whitespace.
    pub async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = CompletionRequest {
            model: &self.config.model,
            prompt,
            temperature: 0.0,
            max_tokens: 500,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        };

        debug!(model = %self.config.model, prompt_len = prompt.len(), "sending completion request");

        let response = self
            .http
            .post(&self.config.completions_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            error!(%status, %body, "completion request failed");
            return Err(CompletionError::Api { status, body });
        }

        let parsed = response.json::<CompletionResponse>().await?;
        first_choice_text(parsed)
    }
}

/// Extracts the first choice's text. The upstream body is not trusted to
/// contain any choices, so an empty array is a defined error instead of a
/// panic.
fn first_choice_text(response: CompletionResponse) -> Result<String, CompletionError> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.text.trim().to_string())
        .ok_or(CompletionError::EmptyChoices)
}
