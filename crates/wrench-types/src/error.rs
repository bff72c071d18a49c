//! Error hierarchy for Wrench.
//!
//! The display strings here are the user-visible error surface: the
//! coordinator converts any of these into the `error` field of a failure
//! response, so each kind must read distinctly.

use thiserror::Error;

/// Top-level error type for all Wrench operations.
#[derive(Debug, Error)]
pub enum WrenchError {
    /// A required parameter is absent or malformed. Detected before any
    /// side effects.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An unexpected fault inside a handler, caught at the dispatch
    /// boundary.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors from workspace file operations and command execution.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Project '{name}' already exists")]
    AlreadyExists { name: String },

    #[error("Command timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("{context}: {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },
}

/// Errors from the inference backend.
///
/// "Unreachable", "reachable but errored", and "too slow" are deliberately
/// separate variants so the client can tell a dead server from a broken
/// request from a stalled one.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend unavailable at {url}: {reason}")]
    Unavailable { url: String, reason: String },

    #[error("Backend error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("Backend request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),
}

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file parse error at {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_displays_bare_message() {
        let err = WrenchError::Validation("Code prompt is required".into());
        assert_eq!(err.to_string(), "Code prompt is required");
    }

    #[test]
    fn tool_errors_pass_through_transparently() {
        let err = WrenchError::from(ToolError::NotFound {
            path: "missing.txt".into(),
        });
        assert_eq!(err.to_string(), "File not found: missing.txt");
    }

    #[test]
    fn backend_kinds_read_distinctly() {
        let unavailable = BackendError::Unavailable {
            url: "http://localhost:11434".into(),
            reason: "connection refused".into(),
        };
        let timeout = BackendError::Timeout { timeout_secs: 30 };
        let status = BackendError::Status {
            status: 500,
            message: "internal".into(),
        };
        assert!(unavailable.to_string().contains("unavailable"));
        assert!(timeout.to_string().contains("timed out"));
        assert!(status.to_string().contains("status 500"));
    }
}
