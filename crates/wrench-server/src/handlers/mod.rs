//! Built-in action handlers, one per registered action.

mod chat;
mod command;
mod file;
mod generate;
mod project;

use std::sync::Arc;

use wrench_backend::OllamaClient;
use wrench_tools::Workspace;
use wrench_types::{Handler, WrenchError};

pub use chat::ChatHandler;
pub use command::RunCommandHandler;
pub use file::{ListDirectoryHandler, ReadFileHandler, WriteFileHandler};
pub use generate::{AnalyzeCodeHandler, GenerateCodeHandler};
pub use project::{CreateProjectHandler, ListProjectsHandler, SuggestImprovementsHandler};

/// All built-in handlers, ready to register.
pub(crate) fn builtins(
    backend: Arc<OllamaClient>,
    workspace: Arc<Workspace>,
) -> Vec<Arc<dyn Handler>> {
    vec![
        Arc::new(CreateProjectHandler::new(Arc::clone(&workspace))),
        Arc::new(ListProjectsHandler::new(Arc::clone(&workspace))),
        Arc::new(ReadFileHandler::new(Arc::clone(&workspace))),
        Arc::new(WriteFileHandler::new(Arc::clone(&workspace))),
        Arc::new(ListDirectoryHandler::new(Arc::clone(&workspace))),
        Arc::new(RunCommandHandler::new(Arc::clone(&workspace))),
        Arc::new(GenerateCodeHandler::new(Arc::clone(&backend))),
        Arc::new(ChatHandler::new(Arc::clone(&backend))),
        Arc::new(AnalyzeCodeHandler::new(
            Arc::clone(&backend),
            Arc::clone(&workspace),
        )),
        Arc::new(SuggestImprovementsHandler::new(backend, workspace)),
    ]
}

/// Deserialize handler parameters, reporting mismatches as validation
/// failures rather than internal faults.
pub(crate) fn parse_params<T: serde::de::DeserializeOwned>(
    params: serde_json::Value,
) -> Result<T, WrenchError> {
    serde_json::from_value(params).map_err(|e| WrenchError::Validation(format!("Invalid parameters: {e}")))
}
