//! TOML + environment configuration for Wrench.
//!
//! Reads configuration from multiple sources with precedence:
//! CLI flags > env vars > config file > defaults
//!
//! None of these settings affect the dispatch contract itself; they only
//! select the backend endpoint, the model, and the workspace root.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use wrench_types::ConfigError;

/// The default Ollama base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// The default model to use.
pub const DEFAULT_MODEL: &str = "llama3.2";

/// The default workspace root, relative to the current directory.
pub const DEFAULT_WORKSPACE: &str = "workspace";

/// The default backend request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved configuration for a Wrench invocation.
#[derive(Debug, Clone)]
pub struct WrenchConfig {
    pub base_url: String,
    pub model: String,
    pub workspace: PathBuf,
    pub timeout_secs: u64,
    pub config_dir: PathBuf,
}

/// Settings that can be read from a TOML config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub backend: BackendSettings,
    pub workspace: Option<PathBuf>,
}

/// Backend section of the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendSettings {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// CLI overrides that take highest precedence.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub workspace: Option<PathBuf>,
}

impl WrenchConfig {
    /// Load configuration from all sources, applying precedence rules.
    ///
    /// Precedence (highest to lowest):
    /// 1. CLI flags
    /// 2. Environment variables (OLLAMA_HOST, WRENCH_MODEL, WRENCH_WORKSPACE)
    /// 3. Config file (~/.wrench/config.toml)
    /// 4. Defaults
    pub fn load(overrides: CliOverrides) -> Result<Self, ConfigError> {
        let config_dir = config_dir();
        let settings = load_settings_file(&config_dir.join("config.toml"));

        let base_url = overrides
            .base_url
            .or_else(|| std::env::var("OLLAMA_HOST").ok())
            .or(settings.backend.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let model = overrides
            .model
            .or_else(|| std::env::var("WRENCH_MODEL").ok())
            .or(settings.backend.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let workspace = overrides
            .workspace
            .or_else(|| std::env::var("WRENCH_WORKSPACE").ok().map(PathBuf::from))
            .or(settings.workspace)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKSPACE));

        let timeout_secs = settings.backend.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "backend.timeout_secs".into(),
                message: "timeout must be greater than zero".into(),
            });
        }

        Ok(WrenchConfig {
            base_url,
            model,
            workspace,
            timeout_secs,
            config_dir,
        })
    }
}

/// Get the Wrench config directory path (~/.wrench/).
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("WRENCH_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".wrench")
}

/// Load and parse a TOML settings file, returning defaults on any error.
fn load_settings_file(path: &std::path::Path) -> SettingsFile {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Failed to parse {}: {}", path.display(), e);
            SettingsFile::default()
        }),
        Err(_) => SettingsFile::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let settings = SettingsFile::default();
        assert!(settings.backend.base_url.is_none());
        assert!(settings.backend.model.is_none());
        assert!(settings.workspace.is_none());
    }

    #[test]
    fn settings_toml_parse() {
        let toml_str = r#"
workspace = "/srv/projects"

[backend]
base_url = "http://127.0.0.1:11435"
model = "codellama"
timeout_secs = 60
"#;
        let settings: SettingsFile = toml::from_str(toml_str).unwrap();
        assert_eq!(
            settings.backend.base_url.as_deref(),
            Some("http://127.0.0.1:11435")
        );
        assert_eq!(settings.backend.model.as_deref(), Some("codellama"));
        assert_eq!(settings.backend.timeout_secs, Some(60));
        assert_eq!(settings.workspace, Some(PathBuf::from("/srv/projects")));
    }

    #[test]
    fn settings_missing_backend_defaults_to_empty() {
        let settings: SettingsFile = toml::from_str(r#"workspace = "w""#).unwrap();
        assert!(settings.backend.base_url.is_none());
    }

    #[test]
    fn malformed_settings_file_degrades_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is not toml [[[").unwrap();
        let settings = load_settings_file(&path);
        assert!(settings.backend.model.is_none());
    }

    #[test]
    fn cli_overrides_win() {
        let dir = tempfile::tempdir().unwrap();
        // Point the config dir somewhere empty so only overrides and
        // defaults are in play.
        unsafe { std::env::set_var("WRENCH_CONFIG_DIR", dir.path()) };
        let config = WrenchConfig::load(CliOverrides {
            base_url: Some("http://example:1".into()),
            model: Some("tinyllama".into()),
            workspace: Some(PathBuf::from("/tmp/ws")),
        })
        .unwrap();
        assert_eq!(config.base_url, "http://example:1");
        assert_eq!(config.model, "tinyllama");
        assert_eq!(config.workspace, PathBuf::from("/tmp/ws"));
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        unsafe { std::env::remove_var("WRENCH_CONFIG_DIR") };
    }
}
