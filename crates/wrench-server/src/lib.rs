//! Request dispatch and action handlers for Wrench.
//!
//! The [`Coordinator`] owns an immutable registry mapping action names to
//! handlers and normalizes every outcome — success, validation failure,
//! tool or backend error, even a handler panic — into the response
//! envelope. Nothing escapes dispatch to crash the process.

mod coordinator;
mod handlers;

pub use coordinator::Coordinator;

/// System prompt passed to every backend call.
pub(crate) const SYSTEM_PROMPT: &str = "\
You are a local development assistant. You help developers by:

1. Creating project structures and files
2. Generating code based on requirements
3. Managing development workflows
4. Providing coding assistance and explanations

Always provide practical, working code with proper error handling.
When creating projects, suggest appropriate structures and best practices.
Be concise but thorough in your responses.";
