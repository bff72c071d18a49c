//! Shared types and error hierarchy for Wrench.

pub mod chat;
pub mod envelope;
pub mod error;
pub mod handler;

pub use chat::{ChatMessage, ChatRole};
pub use envelope::{Request, Response};
pub use error::{BackendError, ConfigError, ToolError, WrenchError};
pub use handler::{Handler, HandlerReply};
