//! Client for the Ollama completion API.
//!
//! Non-streaming requests only. Errors are classified into three distinct
//! kinds the dispatch layer keeps apart: unreachable (connect/DNS failure),
//! reachable but errored (non-2xx status), and too slow (request timeout).
//! A failed call is reported once; there is no retry loop.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use wrench_types::{BackendError, ChatMessage};

/// Timeout for the lightweight availability probe.
const AVAILABILITY_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for a local Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

/// A completed (non-streaming) generation.
#[derive(Debug, Clone)]
pub struct Generation {
    /// The generated text. May be empty; callers decide how to flag that.
    pub response: String,
    /// The model that produced the response.
    pub model: String,
    /// Whether the backend reported the generation as complete.
    pub done: bool,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    options: SamplingOptions,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: SamplingOptions,
}

#[derive(Serialize)]
struct SamplingOptions {
    temperature: f64,
    top_p: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
}

impl SamplingOptions {
    fn generate() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            top_k: Some(40),
        }
    }

    fn chat() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            top_k: None,
        }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    model: String,
    #[serde(default)]
    done: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Deserialize)]
struct TagEntry {
    #[serde(default)]
    name: String,
}

impl OllamaClient {
    /// Create a new client. `base_url` should not have a trailing slash.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            timeout: Duration::from_secs(30),
        })
    }

    /// Set the per-request timeout for generation calls.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The configured model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check whether the backend is reachable and the configured model is
    /// present in its tag list. Any failure reads as "not available".
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        let response = match self
            .http
            .get(&url)
            .timeout(AVAILABILITY_TIMEOUT)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("availability probe failed: {e}");
                return false;
            }
        };
        if !response.status().is_success() {
            return false;
        }
        match response.json::<TagsResponse>().await {
            Ok(tags) => tags.models.iter().any(|m| m.name.contains(&self.model)),
            Err(_) => false,
        }
    }

    /// Run a single non-streaming completion.
    pub async fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<Generation, BackendError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            system,
            options: SamplingOptions::generate(),
        };

        tracing::debug!("POST {url} (model {})", self.model);
        let response = self
            .http
            .post(&url)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        Ok(Generation {
            response: parsed.response,
            model: if parsed.model.is_empty() {
                self.model.clone()
            } else {
                parsed.model
            },
            done: parsed.done,
        })
    }

    /// Run a non-streaming chat turn over the given history. The system
    /// prompt, when present, is prepended as a system-role message.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        system: Option<&str>,
    ) -> Result<ChatMessage, BackendError> {
        let url = format!("{}/api/chat", self.base_url);

        let mut all_messages = Vec::with_capacity(messages.len() + 1);
        if let Some(system) = system {
            all_messages.push(ChatMessage::system(system));
        }
        all_messages.extend(messages.iter().cloned());

        let body = ChatRequest {
            model: &self.model,
            messages: all_messages,
            stream: false,
            options: SamplingOptions::chat(),
        };

        tracing::debug!("POST {url} ({} messages)", messages.len());
        let response = self
            .http
            .post(&url)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        Ok(parsed.message)
    }

    /// Map a reqwest transport failure to a typed backend error.
    fn classify_transport_error(&self, e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            BackendError::Unavailable {
                url: self.base_url.clone(),
                reason: e.to_string(),
            }
        }
    }
}
