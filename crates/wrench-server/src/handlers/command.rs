//! The `run_command` action — confined command execution.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use wrench_tools::Workspace;
use wrench_types::{Handler, HandlerReply, WrenchError};

use super::parse_params;

/// Handler for the `run_command` action.
///
/// A command that runs to completion is a successful dispatch whatever its
/// exit code; the code rides in the payload and a non-zero exit is noted in
/// the message. Spawn failures and timeouts are real errors.
pub struct RunCommandHandler {
    workspace: Arc<Workspace>,
}

#[derive(Deserialize)]
struct RunCommandInput {
    #[serde(default)]
    command: String,
    cwd: Option<String>,
}

impl RunCommandHandler {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self { workspace }
    }
}

impl Handler for RunCommandHandler {
    fn name(&self) -> &str {
        "run_command"
    }

    fn description(&self) -> &str {
        "Run a command inside the workspace"
    }

    fn invoke(
        &self,
        params: Value,
    ) -> Pin<Box<dyn Future<Output = Result<HandlerReply, WrenchError>> + Send + '_>> {
        Box::pin(async move {
            let input: RunCommandInput = parse_params(params)?;
            if input.command.is_empty() {
                return Err(WrenchError::Validation("Command is required".into()));
            }

            let output = self
                .workspace
                .run_command(&input.command, input.cwd.as_deref())
                .await?;

            let message = if output.exit_code == 0 {
                "Command completed successfully".to_string()
            } else {
                format!("Command exited with code {}", output.exit_code)
            };
            Ok(HandlerReply::with_data(
                serde_json::to_value(output)
                    .map_err(|e| WrenchError::Internal(e.to_string()))?,
                message,
            ))
        })
    }
}
