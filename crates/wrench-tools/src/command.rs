//! Command execution confined to the workspace.

use serde::Serialize;
use tokio::process::Command;
use wrench_types::ToolError;

use crate::workspace::Workspace;

/// Maximum captured output length before truncation.
const MAX_OUTPUT_BYTES: usize = 30_000;

/// Command timeout in milliseconds.
const COMMAND_TIMEOUT_MS: u64 = 30_000;

/// Captured output of a completed command.
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutput {
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl Workspace {
    /// Run a command with its working directory inside the workspace.
    ///
    /// The command is whitespace-split into argv; no shell is involved, so
    /// pipes and substitutions are not interpreted. Output is truncated at
    /// 30K bytes and the command is killed after 30 seconds.
    pub async fn run_command(
        &self,
        command: &str,
        cwd: Option<&str>,
    ) -> Result<CommandOutput, ToolError> {
        let mut parts = command.split_whitespace();
        let Some(program) = parts.next() else {
            return Err(ToolError::Io {
                context: "empty command".into(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "no program"),
            });
        };
        let args: Vec<&str> = parts.collect();

        let work_dir = match cwd {
            Some(rel) => self.resolve(rel)?,
            None => self.root().to_path_buf(),
        };

        let result = tokio::time::timeout(
            std::time::Duration::from_millis(COMMAND_TIMEOUT_MS),
            Command::new(program)
                .args(&args)
                .current_dir(&work_dir)
                .output(),
        )
        .await;

        let output = match result {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(ToolError::Io {
                    context: format!("Failed to spawn '{program}'"),
                    source: e,
                });
            }
            Err(_) => {
                return Err(ToolError::Timeout {
                    timeout_ms: COMMAND_TIMEOUT_MS,
                });
            }
        };

        Ok(CommandOutput {
            command: command.to_string(),
            stdout: truncate(String::from_utf8_lossy(&output.stdout).into_owned()),
            stderr: truncate(String::from_utf8_lossy(&output.stderr).into_owned()),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}

fn truncate(mut text: String) -> String {
    if text.len() > MAX_OUTPUT_BYTES {
        let mut cut = MAX_OUTPUT_BYTES;
        while cut > 0 && !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str("\n\n(output truncated)");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_workspace() -> (tempfile::TempDir, Workspace) {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path().join("ws")).unwrap();
        (dir, ws)
    }

    #[tokio::test]
    async fn run_echo_captures_stdout() {
        let (_dir, ws) = test_workspace();
        let output = ws.run_command("echo hello", None).await.unwrap();
        assert_eq!(output.stdout.trim(), "hello");
        assert_eq!(output.exit_code, 0);
    }

    #[tokio::test]
    async fn run_reports_nonzero_exit() {
        let (_dir, ws) = test_workspace();
        let output = ws.run_command("false", None).await.unwrap();
        assert_ne!(output.exit_code, 0);
    }

    #[tokio::test]
    async fn run_in_subdirectory() {
        let (_dir, ws) = test_workspace();
        ws.write_file("sub/file.txt", "x").await.unwrap();
        let output = ws.run_command("ls", Some("sub")).await.unwrap();
        assert!(output.stdout.contains("file.txt"));
    }

    #[tokio::test]
    async fn run_rejects_cwd_outside_workspace() {
        let (_dir, ws) = test_workspace();
        let err = ws.run_command("ls", Some("../..")).await.unwrap_err();
        assert!(matches!(err, ToolError::PermissionDenied { .. }));
    }

    #[tokio::test]
    async fn run_missing_program_is_io_error() {
        let (_dir, ws) = test_workspace();
        let err = ws
            .run_command("definitely-not-a-real-binary-xyz", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Io { .. }));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let text = "é".repeat(MAX_OUTPUT_BYTES); // 2 bytes per char
        let out = truncate(text);
        assert!(out.ends_with("(output truncated)"));
    }
}
