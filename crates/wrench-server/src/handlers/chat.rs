//! The `chat` action — conversation passthrough to the backend.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use wrench_backend::OllamaClient;
use wrench_types::{ChatMessage, Handler, HandlerReply, WrenchError};

use super::parse_params;
use crate::SYSTEM_PROMPT;

/// Handler for the `chat` action. Conversation history passes through
/// unchanged; the handler only appends the current message.
pub struct ChatHandler {
    backend: Arc<OllamaClient>,
}

#[derive(Deserialize)]
struct ChatInput {
    #[serde(default)]
    message: String,
    #[serde(default)]
    history: Vec<ChatMessage>,
}

impl ChatHandler {
    pub fn new(backend: Arc<OllamaClient>) -> Self {
        Self { backend }
    }
}

impl Handler for ChatHandler {
    fn name(&self) -> &str {
        "chat"
    }

    fn description(&self) -> &str {
        "Chat with the assistant"
    }

    fn requires_backend(&self) -> bool {
        true
    }

    fn invoke(
        &self,
        params: Value,
    ) -> Pin<Box<dyn Future<Output = Result<HandlerReply, WrenchError>> + Send + '_>> {
        Box::pin(async move {
            let input: ChatInput = parse_params(params)?;
            if input.message.is_empty() {
                return Err(WrenchError::Validation("Message is required".into()));
            }

            let mut messages = input.history;
            messages.push(ChatMessage::user(input.message));

            let reply = self.backend.chat(&messages, Some(SYSTEM_PROMPT)).await?;
            Ok(HandlerReply::with_data(
                serde_json::json!({
                    "response": reply.content,
                    "role": "assistant",
                }),
                "Chat response generated",
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let backend = Arc::new(OllamaClient::new("http://127.0.0.1:1", "llama3.2").unwrap());
        let err = ChatHandler::new(backend)
            .invoke(serde_json::json!({"history": []}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Message is required");
    }

    #[tokio::test]
    async fn malformed_history_is_a_validation_error() {
        let backend = Arc::new(OllamaClient::new("http://127.0.0.1:1", "llama3.2").unwrap());
        let err = ChatHandler::new(backend)
            .invoke(serde_json::json!({"message": "hi", "history": [{"role": "narrator"}]}))
            .await
            .unwrap_err();
        assert!(matches!(err, WrenchError::Validation(_)));
    }
}
