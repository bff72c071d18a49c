//! Ollama HTTP adapter for Wrench.

mod client;

pub use client::{Generation, OllamaClient};
