//! Handler trait and related types.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::error::WrenchError;

/// What a successful handler hands back to the coordinator.
///
/// Converted into the wire envelope only at the dispatch boundary, so
/// handlers never construct the success/error flag combination themselves.
#[derive(Debug, Clone)]
pub struct HandlerReply {
    /// Action-specific payload, if any.
    pub data: Option<Value>,
    /// Human-readable status text.
    pub message: String,
}

impl HandlerReply {
    /// A reply carrying a payload.
    pub fn with_data(data: Value, message: impl Into<String>) -> Self {
        Self {
            data: Some(data),
            message: message.into(),
        }
    }

    /// A reply with status text only.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            data: None,
            message: message.into(),
        }
    }
}

/// Trait implemented by every registered action.
///
/// Handlers are the only way requests touch the filesystem or the inference
/// backend. Each handler validates its parameters before performing side
/// effects; the coordinator owns fault translation.
pub trait Handler: Send + Sync {
    /// The action name this handler is registered under.
    fn name(&self) -> &str;

    /// One-line description shown in action listings.
    fn description(&self) -> &str;

    /// Whether this action needs the inference backend. Backed actions are
    /// preceded by an availability probe so a dead backend produces one
    /// clear error instead of a connection failure mid-handler.
    fn requires_backend(&self) -> bool {
        false
    }

    /// Run the action with the given JSON parameters.
    fn invoke(
        &self,
        params: Value,
    ) -> Pin<Box<dyn Future<Output = Result<HandlerReply, WrenchError>> + Send + '_>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoHandler;

    impl Handler for EchoHandler {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo parameters back"
        }

        fn invoke(
            &self,
            params: Value,
        ) -> Pin<Box<dyn Future<Output = Result<HandlerReply, WrenchError>> + Send + '_>> {
            Box::pin(async move { Ok(HandlerReply::with_data(params, "echoed")) })
        }
    }

    #[test]
    fn handlers_do_not_require_backend_by_default() {
        assert!(!EchoHandler.requires_backend());
    }

    #[tokio::test]
    async fn invoke_returns_reply() {
        let reply = EchoHandler
            .invoke(serde_json::json!({"k": "v"}))
            .await
            .unwrap();
        assert_eq!(reply.message, "echoed");
        assert_eq!(
            reply.data.unwrap().get("k").and_then(Value::as_str),
            Some("v")
        );
    }

    #[test]
    fn handler_is_object_safe() {
        fn assert_dyn(_: &dyn Handler) {}
        assert_dyn(&EchoHandler);
    }
}
