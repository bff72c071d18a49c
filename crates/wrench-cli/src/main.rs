//! Wrench CLI — a local development assistant.
//!
//! Each subcommand builds one envelope request, dispatches it through the
//! in-process coordinator, and renders the response. Failure responses
//! print the error and exit non-zero.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use wrench_backend::OllamaClient;
use wrench_config::{CliOverrides, WrenchConfig};
use wrench_server::Coordinator;
use wrench_tools::Workspace;
use wrench_types::{ChatMessage, Request, Response};

/// Chat history is trimmed to this many messages (10 exchanges).
const MAX_HISTORY: usize = 20;

#[derive(Parser)]
#[command(name = "wrench", version, about = "A local development assistant")]
struct Cli {
    /// Model to use
    #[arg(long, global = true)]
    model: Option<String>,

    /// Ollama base URL (overrides OLLAMA_HOST)
    #[arg(long, global = true)]
    host: Option<String>,

    /// Workspace root directory
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    /// Enable verbose/debug logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new project
    Create {
        /// Project name
        name: String,
        /// Project type
        #[arg(long, value_parser = ["python", "web", "ml", "basic"], default_value = "python")]
        r#type: String,
    },
    /// List all projects
    List,
    /// Generate code from a prompt
    Generate {
        /// Code generation prompt
        prompt: String,
        /// Programming language
        #[arg(long, default_value = "python")]
        language: String,
        /// Save generated code to a workspace-relative path
        #[arg(long)]
        save: Option<String>,
    },
    /// Chat with the assistant
    Chat,
    /// Analyze a code file
    Analyze {
        /// Workspace-relative file path
        path: String,
    },
    /// Suggest improvements for a project
    Suggest {
        /// Project name
        project: String,
    },
    /// Show backend and workspace status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config = WrenchConfig::load(CliOverrides {
        base_url: cli.host,
        model: cli.model,
        workspace: cli.workspace,
    })
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    tracing::debug!(
        "backend {} (model {}), workspace {}",
        config.base_url,
        config.model,
        config.workspace.display()
    );

    let backend = Arc::new(
        OllamaClient::new(&config.base_url, &config.model)
            .map_err(|e| anyhow::anyhow!("{e}"))?
            .with_timeout(Duration::from_secs(config.timeout_secs)),
    );
    let workspace = Arc::new(
        Workspace::new(&config.workspace)
            .map_err(|e| anyhow::anyhow!("{e}"))
            .context("Failed to open workspace")?,
    );
    let coordinator = Coordinator::new(backend, workspace);

    match cli.command {
        Command::Create { name, r#type } => create(&coordinator, &name, &r#type).await,
        Command::List => list(&coordinator).await,
        Command::Generate {
            prompt,
            language,
            save,
        } => generate(&coordinator, &prompt, &language, save.as_deref()).await,
        Command::Chat => chat(&coordinator).await,
        Command::Analyze { path } => analyze(&coordinator, &path).await,
        Command::Suggest { project } => suggest(&coordinator, &project).await,
        Command::Status => status(&coordinator, &config).await,
    }
}

/// Unwrap a response, turning a failure into the process exit path.
fn into_data(response: Response) -> Result<(Option<Value>, String)> {
    if response.success {
        Ok((response.data, response.message))
    } else {
        bail!(
            "{}",
            response
                .error
                .unwrap_or_else(|| "unknown failure".to_string())
        );
    }
}

async fn create(coordinator: &Coordinator, name: &str, kind: &str) -> Result<()> {
    let response = coordinator
        .dispatch(Request::with_params(
            "create_project",
            json!({"name": name, "type": kind}),
        ))
        .await;
    let (data, message) = into_data(response)?;

    println!("{message}");
    if let Some(data) = data {
        if let Some(path) = data.get("path").and_then(Value::as_str) {
            println!("Path: {path}");
        }
        let count = data
            .get("files")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        println!("Created {count} files");
    }
    Ok(())
}

async fn list(coordinator: &Coordinator) -> Result<()> {
    let response = coordinator.dispatch(Request::new("list_projects")).await;
    let (data, _) = into_data(response)?;

    let projects = data
        .as_ref()
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if projects.is_empty() {
        println!("No projects found");
        return Ok(());
    }

    println!("Found {} projects:", projects.len());
    for project in &projects {
        let name = project["name"].as_str().unwrap_or("?");
        let kind = project["kind"].as_str().unwrap_or("unknown");
        let path = project["path"].as_str().unwrap_or("");
        let modified = project["modified"]
            .as_str()
            .and_then(|s| s.parse::<chrono::DateTime<chrono::Utc>>().ok())
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("  {name} ({kind})  {modified}");
        println!("    {path}");
    }
    Ok(())
}

async fn generate(
    coordinator: &Coordinator,
    prompt: &str,
    language: &str,
    save: Option<&str>,
) -> Result<()> {
    let response = coordinator
        .dispatch(Request::with_params(
            "generate_code",
            json!({"prompt": prompt, "language": language}),
        ))
        .await;
    let (data, message) = into_data(response)?;

    let code = data
        .as_ref()
        .and_then(|d| d.get("code"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    eprintln!("{message}");
    println!("{code}");

    if let Some(path) = save {
        let response = coordinator
            .dispatch(Request::with_params(
                "write_file",
                json!({"path": path, "content": code}),
            ))
            .await;
        into_data(response)?;
        eprintln!("Code saved to: {path}");
    }
    Ok(())
}

async fn chat(coordinator: &Coordinator) -> Result<()> {
    eprintln!("Chat with the development assistant.");
    eprintln!("Type 'exit', 'quit', or press Ctrl+D to leave.\n");

    let stdin = io::stdin();
    let mut history: Vec<ChatMessage> = Vec::new();

    loop {
        eprint!("You: ");
        io::stderr().flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            eprintln!();
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input.to_lowercase().as_str(), "exit" | "quit" | "bye") {
            break;
        }

        let response = coordinator
            .dispatch(Request::with_params(
                "chat",
                json!({"message": input, "history": &history}),
            ))
            .await;

        if !response.success {
            // Report once and keep the loop alive; a failed turn should not
            // end the conversation.
            eprintln!(
                "Error: {}",
                response.error.unwrap_or_else(|| "unknown failure".into())
            );
            continue;
        }

        let reply = response
            .data
            .as_ref()
            .and_then(|d| d.get("response"))
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        println!("Assistant: {reply}\n");

        history.push(ChatMessage::user(input));
        history.push(ChatMessage::assistant(reply));
        if history.len() > MAX_HISTORY {
            history.drain(..history.len() - MAX_HISTORY);
        }
    }

    eprintln!("Goodbye!");
    Ok(())
}

async fn analyze(coordinator: &Coordinator, path: &str) -> Result<()> {
    let response = coordinator
        .dispatch(Request::with_params(
            "analyze_code",
            json!({"file_path": path}),
        ))
        .await;
    let (data, _) = into_data(response)?;

    println!("Analysis for: {path}");
    if let Some(analysis) = data
        .as_ref()
        .and_then(|d| d.get("analysis"))
        .and_then(Value::as_str)
    {
        println!("{analysis}");
    }
    Ok(())
}

async fn suggest(coordinator: &Coordinator, project: &str) -> Result<()> {
    let response = coordinator
        .dispatch(Request::with_params(
            "suggest_improvements",
            json!({"project": project}),
        ))
        .await;
    let (data, _) = into_data(response)?;

    println!("Suggestions for project: {project}");
    if let Some(suggestions) = data
        .as_ref()
        .and_then(|d| d.get("suggestions"))
        .and_then(Value::as_str)
    {
        println!("{suggestions}");
    }
    Ok(())
}

async fn status(coordinator: &Coordinator, config: &WrenchConfig) -> Result<()> {
    println!("wrench v{}", env!("CARGO_PKG_VERSION"));
    println!("Backend: {} (model: {})", config.base_url, config.model);

    let available = coordinator.backend_available().await;
    println!(
        "Backend available: {}",
        if available { "yes" } else { "no" }
    );
    println!("Workspace: {}", coordinator.workspace_root().display());

    let response = coordinator.dispatch(Request::new("list_projects")).await;
    if let (Some(data), _) = into_data(response)? {
        let count = data.as_array().map_or(0, Vec::len);
        println!("Projects: {count}");
    }

    if !available {
        eprintln!("\nTo enable AI features, ensure Ollama is running:");
        eprintln!("  ollama serve");
        eprintln!("  ollama pull {}", config.model);
    }
    Ok(())
}
