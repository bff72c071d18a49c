//! Project creation and listing on top of the workspace root.

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::process::Command;
use wrench_types::ToolError;

use crate::templates;
use crate::workspace::{Workspace, io_error};

/// Supported project scaffolding kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    Python,
    Web,
    Ml,
    Basic,
}

impl ProjectKind {
    /// Map a user-supplied type name, falling back to `Basic` for anything
    /// unrecognized.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or(ProjectKind::Basic)
    }
}

impl FromStr for ProjectKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "python" => Ok(ProjectKind::Python),
            "web" => Ok(ProjectKind::Web),
            "ml" => Ok(ProjectKind::Ml),
            "basic" => Ok(ProjectKind::Basic),
            _ => Err(()),
        }
    }
}

/// Result of creating a project.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedProject {
    pub name: String,
    pub path: String,
    pub files: Vec<String>,
}

/// Summary of one project directory in the workspace.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectInfo {
    pub name: String,
    pub path: String,
    /// Detected from marker files; "unknown" when nothing matches.
    pub kind: String,
    pub has_src: bool,
    pub has_readme: bool,
    pub modified: DateTime<Utc>,
}

impl Workspace {
    /// Materialize a new project from the template for `kind`.
    ///
    /// Refuses to touch an existing project directory; the existence check
    /// happens before any file is written.
    pub async fn create_project(
        &self,
        name: &str,
        kind: ProjectKind,
    ) -> Result<CreatedProject, ToolError> {
        let project_dir = self.resolve(name)?;
        if project_dir.exists() {
            return Err(ToolError::AlreadyExists { name: name.into() });
        }

        let mut created = Vec::new();
        for (rel_path, content) in templates::files_for(kind, name) {
            let full = project_dir.join(&rel_path);
            if let Some(parent) = full.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| io_error(&rel_path, e))?;
            }
            tokio::fs::write(&full, content)
                .await
                .map_err(|e| io_error(&rel_path, e))?;
            created.push(rel_path);
        }

        init_git(&project_dir).await;

        Ok(CreatedProject {
            name: name.to_string(),
            path: project_dir.display().to_string(),
            files: created,
        })
    }

    /// List project directories in the workspace, most recently modified
    /// first (name breaks ties, so the ordering is deterministic).
    pub async fn list_projects(&self) -> Result<Vec<ProjectInfo>, ToolError> {
        let mut reader = tokio::fs::read_dir(self.root())
            .await
            .map_err(|e| io_error(".", e))?;

        let mut projects = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(|e| io_error(".", e))? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let is_dir = entry
                .file_type()
                .await
                .map(|t| t.is_dir())
                .unwrap_or(false);
            if !is_dir {
                continue;
            }

            let path = entry.path();
            let modified = entry
                .metadata()
                .await
                .ok()
                .and_then(|m| m.modified().ok())
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(Utc::now);

            projects.push(ProjectInfo {
                kind: detect_kind(&path),
                has_src: path.join("src").exists(),
                has_readme: path.join("README.md").exists(),
                path: path.display().to_string(),
                name,
                modified,
            });
        }

        projects.sort_by(|a, b| b.modified.cmp(&a.modified).then(a.name.cmp(&b.name)));
        Ok(projects)
    }
}

/// Detect a project's kind from its marker files.
fn detect_kind(path: &Path) -> String {
    if path.join("package.json").exists() {
        "javascript".into()
    } else if path.join("requirements.txt").exists() {
        "python".into()
    } else {
        "unknown".into()
    }
}

/// Initialize a git repository with an initial commit. Git is optional:
/// failures are logged and ignored.
async fn init_git(project_dir: &Path) {
    for args in [
        vec!["init"],
        vec!["add", "."],
        vec!["commit", "-m", "Initial commit"],
    ] {
        let result = Command::new("git")
            .args(&args)
            .current_dir(project_dir)
            .output()
            .await;
        match result {
            Ok(output) if output.status.success() => {}
            Ok(output) => {
                tracing::debug!(
                    "git {:?} exited with {}: {}",
                    args,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                return;
            }
            Err(e) => {
                tracing::debug!("git {:?} failed to spawn: {e}", args);
                return;
            }
        }
    }
}
