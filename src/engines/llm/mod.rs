//! Text generator abstraction layer.
//!
//! This module provides a trait-based abstraction for the text generator,
//! allowing the pipeline to work with different LLM backends.

mod ollama;
mod provider;

pub use ollama::OllamaGenerator;
pub use provider::{CompletionOptions, LlmError, TextGenerator};

#[cfg(feature = "mock")]
pub use provider::MockTextGenerator;
