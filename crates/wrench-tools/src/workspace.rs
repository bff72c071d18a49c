//! The workspace root and path-confined file operations.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use wrench_types::ToolError;

/// All file operations are interpreted relative to this root; nothing the
/// caller supplies can name a path outside it.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
}

/// Result of reading a file.
#[derive(Debug, Clone, Serialize)]
pub struct FileContent {
    pub path: String,
    pub content: String,
    pub size: usize,
}

/// Result of writing a file.
#[derive(Debug, Clone, Serialize)]
pub struct WrittenFile {
    pub path: String,
    pub size: usize,
}

/// A single directory entry.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub is_dir: bool,
}

impl Workspace {
    /// Open (creating if necessary) the workspace rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ToolError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| ToolError::Io {
            context: format!("Failed to create workspace at {}", root.display()),
            source: e,
        })?;
        // Canonicalize so confinement checks are against the real location.
        let root = root.canonicalize().map_err(|e| ToolError::Io {
            context: format!("Failed to resolve workspace at {}", root.display()),
            source: e,
        })?;
        tracing::debug!("workspace root: {}", root.display());
        Ok(Self { root })
    }

    /// The canonical workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a caller-supplied path against the root, rejecting anything
    /// that would land outside it. The check is lexical: `..` components are
    /// folded as they are seen, and folding past the root is refused before
    /// any I/O happens. Absolute paths are refused outright.
    pub(crate) fn resolve(&self, path: &str) -> Result<PathBuf, ToolError> {
        let requested = Path::new(path);
        if requested.is_absolute() {
            return Err(ToolError::PermissionDenied { path: path.into() });
        }

        let mut resolved = self.root.clone();
        let mut depth: usize = 0;
        for component in requested.components() {
            match component {
                Component::Normal(part) => {
                    resolved.push(part);
                    depth += 1;
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    if depth == 0 {
                        return Err(ToolError::PermissionDenied { path: path.into() });
                    }
                    resolved.pop();
                    depth -= 1;
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(ToolError::PermissionDenied { path: path.into() });
                }
            }
        }
        Ok(resolved)
    }

    /// Read a file and return its content.
    pub async fn read_file(&self, path: &str) -> Result<FileContent, ToolError> {
        let full = self.resolve(path)?;
        let content = tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| io_error(path, e))?;
        Ok(FileContent {
            path: path.to_string(),
            size: content.len(),
            content,
        })
    }

    /// Write content to a file, creating parent directories as needed.
    pub async fn write_file(&self, path: &str, content: &str) -> Result<WrittenFile, ToolError> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(path, e))?;
        }
        tokio::fs::write(&full, content)
            .await
            .map_err(|e| io_error(path, e))?;
        Ok(WrittenFile {
            path: path.to_string(),
            size: content.len(),
        })
    }

    /// List a directory, name-sorted. Listing is deterministic: two calls
    /// with no intervening writes return identical sequences.
    pub async fn list_dir(&self, path: &str) -> Result<Vec<DirEntryInfo>, ToolError> {
        let full = self.resolve(path)?;
        let mut reader = tokio::fs::read_dir(&full)
            .await
            .map_err(|e| io_error(path, e))?;

        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(|e| io_error(path, e))? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry
                .file_type()
                .await
                .map(|t| t.is_dir())
                .unwrap_or(false);
            entries.push(DirEntryInfo { name, is_dir });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// Map an io::Error on a workspace path to a typed tool error.
pub(crate) fn io_error(path: &str, e: std::io::Error) -> ToolError {
    match e.kind() {
        ErrorKind::NotFound => ToolError::NotFound { path: path.into() },
        ErrorKind::PermissionDenied => ToolError::PermissionDenied { path: path.into() },
        _ => ToolError::Io {
            context: path.to_string(),
            source: e,
        },
    }
}
