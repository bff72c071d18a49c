//! File actions — read, write, and list within the workspace.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use wrench_tools::Workspace;
use wrench_types::{Handler, HandlerReply, WrenchError};

use super::parse_params;

/// Handler for the `read_file` action.
pub struct ReadFileHandler {
    workspace: Arc<Workspace>,
}

#[derive(Deserialize)]
struct ReadFileInput {
    #[serde(default)]
    path: String,
}

impl ReadFileHandler {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self { workspace }
    }
}

impl Handler for ReadFileHandler {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read file contents from the workspace"
    }

    fn invoke(
        &self,
        params: Value,
    ) -> Pin<Box<dyn Future<Output = Result<HandlerReply, WrenchError>> + Send + '_>> {
        Box::pin(async move {
            let input: ReadFileInput = parse_params(params)?;
            if input.path.is_empty() {
                return Err(WrenchError::Validation("File path is required".into()));
            }

            let file = self.workspace.read_file(&input.path).await?;
            let size = file.size;
            Ok(HandlerReply::with_data(
                serde_json::to_value(file).map_err(|e| WrenchError::Internal(e.to_string()))?,
                format!("Read {size} bytes"),
            ))
        })
    }
}

/// Handler for the `write_file` action.
pub struct WriteFileHandler {
    workspace: Arc<Workspace>,
}

#[derive(Deserialize)]
struct WriteFileInput {
    #[serde(default)]
    path: String,
    #[serde(default)]
    content: String,
}

impl WriteFileHandler {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self { workspace }
    }
}

impl Handler for WriteFileHandler {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file in the workspace"
    }

    fn invoke(
        &self,
        params: Value,
    ) -> Pin<Box<dyn Future<Output = Result<HandlerReply, WrenchError>> + Send + '_>> {
        Box::pin(async move {
            let input: WriteFileInput = parse_params(params)?;
            if input.path.is_empty() {
                return Err(WrenchError::Validation("File path is required".into()));
            }

            let written = self
                .workspace
                .write_file(&input.path, &input.content)
                .await?;
            let message = format!("File written: {}", written.path);
            Ok(HandlerReply::with_data(
                serde_json::to_value(written)
                    .map_err(|e| WrenchError::Internal(e.to_string()))?,
                message,
            ))
        })
    }
}

/// Handler for the `list_directory` action.
pub struct ListDirectoryHandler {
    workspace: Arc<Workspace>,
}

#[derive(Deserialize)]
struct ListDirectoryInput {
    #[serde(default = "default_path")]
    path: String,
}

fn default_path() -> String {
    ".".into()
}

impl ListDirectoryHandler {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self { workspace }
    }
}

impl Handler for ListDirectoryHandler {
    fn name(&self) -> &str {
        "list_directory"
    }

    fn description(&self) -> &str {
        "List entries of a workspace directory"
    }

    fn invoke(
        &self,
        params: Value,
    ) -> Pin<Box<dyn Future<Output = Result<HandlerReply, WrenchError>> + Send + '_>> {
        Box::pin(async move {
            let input: ListDirectoryInput = parse_params(params)?;
            let entries = self.workspace.list_dir(&input.path).await?;
            let count = entries.len();
            Ok(HandlerReply::with_data(
                serde_json::json!({
                    "path": input.path,
                    "entries": entries,
                }),
                format!("Found {count} entries"),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_workspace() -> (tempfile::TempDir, Arc<Workspace>) {
        let dir = tempfile::tempdir().unwrap();
        let ws = Arc::new(Workspace::new(dir.path().join("ws")).unwrap());
        (dir, ws)
    }

    #[tokio::test]
    async fn read_requires_a_path() {
        let (_dir, ws) = test_workspace();
        let err = ReadFileHandler::new(ws)
            .invoke(serde_json::json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "File path is required");
    }

    #[tokio::test]
    async fn write_then_read_through_handlers() {
        let (_dir, ws) = test_workspace();
        WriteFileHandler::new(Arc::clone(&ws))
            .invoke(serde_json::json!({"path": "a.txt", "content": "hi"}))
            .await
            .unwrap();

        let reply = ReadFileHandler::new(ws)
            .invoke(serde_json::json!({"path": "a.txt"}))
            .await
            .unwrap();
        let data = reply.data.unwrap();
        assert_eq!(data.get("content").and_then(Value::as_str), Some("hi"));
        assert_eq!(data.get("size").and_then(Value::as_u64), Some(2));
    }

    #[tokio::test]
    async fn traversal_surfaces_as_permission_denied() {
        let (_dir, ws) = test_workspace();
        let err = ReadFileHandler::new(ws)
            .invoke(serde_json::json!({"path": "../../etc/passwd"}))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Permission denied"));
    }

    #[tokio::test]
    async fn list_defaults_to_workspace_root() {
        let (_dir, ws) = test_workspace();
        ws.write_file("one.txt", "").await.unwrap();
        let reply = ListDirectoryHandler::new(ws)
            .invoke(serde_json::json!({}))
            .await
            .unwrap();
        let data = reply.data.unwrap();
        let entries = data.get("entries").unwrap().as_array().unwrap();
        assert_eq!(entries.len(), 1);
    }
}
