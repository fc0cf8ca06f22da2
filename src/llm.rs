//! Model runtime adapter for a locally hosted Ollama server.
//!
//! The orchestration layer only depends on the [`CompletionBackend`] trait:
//! given one prompt, produce one text completion. [`OllamaCompletion`] is
//! the concrete backend, a reqwest client for Ollama's `/api/generate`
//! endpoint addressed by a model-name string.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ExecutionError;

/// Default Ollama API base URL.
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Maximum number of response-body bytes echoed into a parse error message.
const ERROR_BODY_LIMIT: usize = 500;

/// Truncate `text` to at most `max` bytes without splitting a character.
fn truncate_on_char_boundary(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// A backend that can turn one prompt into one text completion.
///
/// Everything behind this seam (sampling, context handling, however many
/// internal round-trips the runtime performs) is the runtime's business.
#[async_trait]
pub trait CompletionBackend: Send + Sync + std::fmt::Debug {
    /// The model identifier this backend is bound to.
    fn model(&self) -> &str;

    /// Run a single completion for `prompt` and return the raw text.
    async fn complete(&self, prompt: &str) -> Result<String, ExecutionError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Completion backend over Ollama's `/api/generate` endpoint.
///
/// No request timeout is configured: a hung model call hangs the caller.
#[derive(Debug, Clone)]
pub struct OllamaCompletion {
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OllamaCompletion {
    /// Build a handle for `model`, reading the base URL from `OLLAMA_URL`.
    ///
    /// Fails fast when the identifier is empty or whitespace. Whether the
    /// model actually exists is only known once the runtime is called.
    pub fn new(model: impl Into<String>) -> Result<Self, ExecutionError> {
        Self::with_client(model, Self::base_url_from_env(), reqwest::Client::new())
    }

    /// Build a handle against an explicit base URL.
    pub fn with_base_url(
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ExecutionError> {
        Self::with_client(model, base_url, reqwest::Client::new())
    }

    /// Build a handle that reuses an existing client.
    ///
    /// The façade constructs one handle per request; passing a shared
    /// client keeps reqwest's connection pool alive across requests.
    pub fn with_client(
        model: impl Into<String>,
        base_url: impl Into<String>,
        client: reqwest::Client,
    ) -> Result<Self, ExecutionError> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(ExecutionError::InvalidModel(model));
        }
        Ok(Self {
            model,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Base URL from `OLLAMA_URL`, falling back to [`DEFAULT_OLLAMA_URL`].
    pub fn base_url_from_env() -> String {
        std::env::var("OLLAMA_URL").unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string())
    }

    /// Base URL the backend will call, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CompletionBackend for OllamaCompletion {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, ExecutionError> {
        let endpoint = format!("{}/api/generate", self.base_url);
        log::debug!(
            "Ollama generate (model={}, {} prompt chars)",
            self.model,
            prompt.len()
        );

        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ExecutionError::RuntimeUnreachable(e)
                } else {
                    ExecutionError::Runtime(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ExecutionError::Runtime(e.to_string()))?;

        if !status.is_success() {
            return Err(ExecutionError::Runtime(format!(
                "Ollama API error ({}): {}",
                status, text
            )));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text).map_err(|e| {
            ExecutionError::Runtime(format!(
                "failed to parse Ollama response: {} - body: {}",
                e,
                truncate_on_char_boundary(&text, ERROR_BODY_LIMIT)
            ))
        })?;

        Ok(parsed.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_model_is_rejected() {
        let err = OllamaCompletion::with_base_url("   ", DEFAULT_OLLAMA_URL).unwrap_err();
        assert!(matches!(err, ExecutionError::InvalidModel(_)));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let llm = OllamaCompletion::with_base_url("llama2", "http://localhost:11434/").unwrap();
        assert_eq!(llm.base_url(), "http://localhost:11434");
        assert_eq!(llm.model(), "llama2");
    }

    #[test]
    fn generate_request_shape() {
        let body = GenerateRequest {
            model: "llama2",
            prompt: "hi",
            stream: false,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"model": "llama2", "prompt": "hi", "stream": false})
        );
    }

    #[test]
    fn truncation_backs_off_to_a_char_boundary() {
        // Byte 500 lands inside the three-byte '€' (bytes 499..502).
        let body = format!("{}€", "a".repeat(499));
        assert_eq!(body.len(), 502);

        let truncated = truncate_on_char_boundary(&body, ERROR_BODY_LIMIT);
        assert_eq!(truncated, "a".repeat(499));
    }

    #[test]
    fn truncation_keeps_short_bodies_whole() {
        assert_eq!(truncate_on_char_boundary("héllo", 500), "héllo");
        assert_eq!(truncate_on_char_boundary("héllo", 2), "h");
    }

    #[test]
    fn shared_client_handle_is_validated() {
        let client = reqwest::Client::new();
        let err =
            OllamaCompletion::with_client("", DEFAULT_OLLAMA_URL, client.clone()).unwrap_err();
        assert!(matches!(err, ExecutionError::InvalidModel(_)));

        let llm = OllamaCompletion::with_client("llama2", "http://localhost:11434/", client)
            .unwrap();
        assert_eq!(llm.base_url(), "http://localhost:11434");
    }

    #[test]
    fn generate_response_ignores_extra_fields() {
        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"response": "hello", "done": true, "model": "llama2"}"#)
                .unwrap();
        assert_eq!(parsed.response, "hello");
    }
}
