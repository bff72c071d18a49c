//! Project actions — creation, listing, and improvement suggestions.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use wrench_backend::OllamaClient;
use wrench_tools::{ProjectKind, Workspace};
use wrench_types::{Handler, HandlerReply, WrenchError};

use super::parse_params;
use crate::SYSTEM_PROMPT;

/// Files read to give the model context about a project.
const KEY_FILES: [&str; 3] = ["README.md", "requirements.txt", "src/main.py"];

/// Handler for the `create_project` action.
pub struct CreateProjectHandler {
    workspace: Arc<Workspace>,
}

#[derive(Deserialize)]
struct CreateProjectInput {
    #[serde(default)]
    name: String,
    #[serde(default = "default_type")]
    r#type: String,
}

fn default_type() -> String {
    "python".into()
}

impl CreateProjectHandler {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self { workspace }
    }
}

impl Handler for CreateProjectHandler {
    fn name(&self) -> &str {
        "create_project"
    }

    fn description(&self) -> &str {
        "Create a new project with the given type"
    }

    fn invoke(
        &self,
        params: Value,
    ) -> Pin<Box<dyn Future<Output = Result<HandlerReply, WrenchError>> + Send + '_>> {
        Box::pin(async move {
            let input: CreateProjectInput = parse_params(params)?;
            if input.name.is_empty() {
                return Err(WrenchError::Validation("Project name is required".into()));
            }

            let kind = ProjectKind::from_name(&input.r#type);
            let created = self.workspace.create_project(&input.name, kind).await?;
            let message = format!("Created {} project '{}'", input.r#type, input.name);
            Ok(HandlerReply::with_data(
                serde_json::to_value(created)
                    .map_err(|e| WrenchError::Internal(e.to_string()))?,
                message,
            ))
        })
    }
}

/// Handler for the `list_projects` action.
pub struct ListProjectsHandler {
    workspace: Arc<Workspace>,
}

impl ListProjectsHandler {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self { workspace }
    }
}

impl Handler for ListProjectsHandler {
    fn name(&self) -> &str {
        "list_projects"
    }

    fn description(&self) -> &str {
        "List all projects in the workspace"
    }

    fn invoke(
        &self,
        _params: Value,
    ) -> Pin<Box<dyn Future<Output = Result<HandlerReply, WrenchError>> + Send + '_>> {
        Box::pin(async move {
            let projects = self.workspace.list_projects().await?;
            let count = projects.len();
            Ok(HandlerReply::with_data(
                serde_json::to_value(projects)
                    .map_err(|e| WrenchError::Internal(e.to_string()))?,
                format!("Found {count} projects"),
            ))
        })
    }
}

/// Handler for the `suggest_improvements` action.
pub struct SuggestImprovementsHandler {
    backend: Arc<OllamaClient>,
    workspace: Arc<Workspace>,
}

#[derive(Deserialize)]
struct SuggestInput {
    #[serde(default)]
    project: String,
}

impl SuggestImprovementsHandler {
    pub fn new(backend: Arc<OllamaClient>, workspace: Arc<Workspace>) -> Self {
        Self { backend, workspace }
    }
}

impl Handler for SuggestImprovementsHandler {
    fn name(&self) -> &str {
        "suggest_improvements"
    }

    fn description(&self) -> &str {
        "Suggest improvements for a project"
    }

    fn requires_backend(&self) -> bool {
        true
    }

    fn invoke(
        &self,
        params: Value,
    ) -> Pin<Box<dyn Future<Output = Result<HandlerReply, WrenchError>> + Send + '_>> {
        Box::pin(async move {
            let input: SuggestInput = parse_params(params)?;
            if input.project.is_empty() {
                return Err(WrenchError::Validation("Project name is required".into()));
            }

            let projects = self.workspace.list_projects().await?;
            let Some(project) = projects.iter().find(|p| p.name == input.project) else {
                return Err(WrenchError::Validation(format!(
                    "Project '{}' not found",
                    input.project
                )));
            };

            // Read whichever key files exist to give the model something
            // concrete to work from.
            let mut files = serde_json::Map::new();
            for rel in KEY_FILES {
                let path = format!("{}/{rel}", input.project);
                if let Ok(file) = self.workspace.read_file(&path).await {
                    files.insert(rel.to_string(), Value::String(file.content));
                }
            }
            let analyzed: Vec<String> = files.keys().cloned().collect();

            let prompt = format!(
                "Analyze this project and suggest improvements:\n\n\
                 Project: {}\nType: {}\n\n\
                 Project files:\n{}\n\n\
                 Please suggest:\n\
                 1. Project structure improvements\n\
                 2. Code organization enhancements\n\
                 3. Missing files or dependencies\n\
                 4. Development workflow improvements\n\
                 5. Testing and documentation suggestions\n\n\
                 Suggestions:",
                project.name,
                project.kind,
                serde_json::to_string_pretty(&Value::Object(files))
                    .map_err(|e| WrenchError::Internal(e.to_string()))?,
            );

            let generation = self.backend.generate(&prompt, Some(SYSTEM_PROMPT)).await?;
            Ok(HandlerReply::with_data(
                serde_json::json!({
                    "suggestions": generation.response,
                    "project": input.project,
                    "analyzed_files": analyzed,
                }),
                "Project analysis completed",
            ))
        })
    }
}
