//! The coordinator: registry construction and request dispatch.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;

use futures_util::FutureExt;
use serde_json::Value;
use wrench_backend::OllamaClient;
use wrench_tools::Workspace;
use wrench_types::{Handler, Request, Response};

use crate::handlers;

/// Dispatches envelope requests to registered action handlers.
///
/// The registry is built once at construction and never mutated afterwards;
/// dispatch only reads it. Handlers own their atomicity; the coordinator
/// owns translating every outcome into the response envelope.
pub struct Coordinator {
    registry: HashMap<String, Arc<dyn Handler>>,
    backend: Arc<OllamaClient>,
    workspace: Arc<Workspace>,
}

impl Coordinator {
    /// Create a coordinator with all built-in actions registered.
    pub fn new(backend: Arc<OllamaClient>, workspace: Arc<Workspace>) -> Self {
        let mut coordinator = Self {
            registry: HashMap::new(),
            backend: Arc::clone(&backend),
            workspace: Arc::clone(&workspace),
        };
        for handler in handlers::builtins(backend, workspace) {
            coordinator.register(handler);
        }
        coordinator
    }

    fn register(&mut self, handler: Arc<dyn Handler>) {
        self.registry.insert(handler.name().to_string(), handler);
    }

    /// Sorted (name, description) pairs for every registered action.
    pub fn actions(&self) -> Vec<(String, String)> {
        let mut actions: Vec<(String, String)> = self
            .registry
            .values()
            .map(|h| (h.name().to_string(), h.description().to_string()))
            .collect();
        actions.sort();
        actions
    }

    /// The workspace root all file actions are confined to.
    pub fn workspace_root(&self) -> &Path {
        self.workspace.root()
    }

    /// Probe the inference backend.
    pub async fn backend_available(&self) -> bool {
        self.backend.is_available().await
    }

    /// Process one request to completion and return the normalized response.
    pub async fn dispatch(&self, request: Request) -> Response {
        let Some(handler) = self.registry.get(&request.action) else {
            let available: Vec<String> =
                self.actions().into_iter().map(|(name, _)| name).collect();
            return Response::error(format!(
                "Unknown action: {}. Available actions: {}",
                request.action,
                available.join(", ")
            ));
        };

        // A dead backend produces one clear error up front instead of a
        // connection failure halfway through a handler.
        if handler.requires_backend() && !self.backend.is_available().await {
            return Response::error(
                "Ollama is not available. Please ensure it's running with 'ollama serve'.",
            );
        }

        let params = Value::Object(request.parameters);
        tracing::debug!(action = %request.action, "dispatching");

        // The dispatch boundary is the single point converting internal
        // faults into the external contract: a panicking handler becomes a
        // failure response, not a crashed process.
        match AssertUnwindSafe(handler.invoke(params)).catch_unwind().await {
            Ok(Ok(reply)) => Response::ok(reply.data, reply.message),
            Ok(Err(e)) => {
                tracing::debug!(action = %request.action, error = %e, "handler failed");
                Response::error(e.to_string())
            }
            Err(panic) => {
                let description = panic_message(panic.as_ref());
                tracing::error!(action = %request.action, "handler panicked: {description}");
                Response::error(format!("Internal error: {description}"))
            }
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected handler fault".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::Pin;
    use wrench_types::{HandlerReply, WrenchError};

    fn test_coordinator() -> (tempfile::TempDir, Coordinator) {
        let dir = tempfile::tempdir().unwrap();
        // Point the backend at a closed port; non-AI actions never touch it.
        let backend = Arc::new(OllamaClient::new("http://127.0.0.1:1", "llama3.2").unwrap());
        let workspace = Arc::new(Workspace::new(dir.path().join("ws")).unwrap());
        (dir, Coordinator::new(backend, workspace))
    }

    #[test]
    fn all_builtin_actions_are_registered() {
        let (_dir, coordinator) = test_coordinator();
        let names: Vec<String> = coordinator
            .actions()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        for expected in [
            "analyze_code",
            "chat",
            "create_project",
            "generate_code",
            "list_directory",
            "list_projects",
            "read_file",
            "run_command",
            "suggest_improvements",
            "write_file",
        ] {
            assert!(names.contains(&expected.to_string()), "missing {expected}");
        }
        assert_eq!(names.len(), 10);
    }

    #[tokio::test]
    async fn unknown_action_names_the_action_and_alternatives() {
        let (_dir, coordinator) = test_coordinator();
        let response = coordinator.dispatch(Request::new("frobnicate")).await;
        assert!(!response.success);
        let error = response.error.unwrap();
        assert!(error.contains("frobnicate"));
        assert!(error.contains("list_projects"));
    }

    #[tokio::test]
    async fn validation_failure_and_unknown_action_are_distinct() {
        let (_dir, coordinator) = test_coordinator();
        let unknown = coordinator.dispatch(Request::new("nope")).await;
        let invalid = coordinator.dispatch(Request::new("read_file")).await;
        assert!(unknown.error.unwrap().starts_with("Unknown action"));
        assert_eq!(invalid.error.as_deref(), Some("File path is required"));
    }

    struct PanickingHandler;

    impl Handler for PanickingHandler {
        fn name(&self) -> &str {
            "explode"
        }

        fn description(&self) -> &str {
            "Always panics"
        }

        fn invoke(
            &self,
            _params: Value,
        ) -> Pin<Box<dyn Future<Output = Result<HandlerReply, WrenchError>> + Send + '_>> {
            Box::pin(async move { panic!("wires crossed") })
        }
    }

    #[tokio::test]
    async fn handler_panic_becomes_a_failure_response() {
        let (_dir, mut coordinator) = test_coordinator();
        coordinator.register(Arc::new(PanickingHandler));

        let response = coordinator.dispatch(Request::new("explode")).await;
        assert!(!response.success);
        let error = response.error.unwrap();
        assert!(error.contains("Internal error"));
        assert!(error.contains("wires crossed"));
    }
}
