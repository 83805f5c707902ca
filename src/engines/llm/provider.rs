//! Text generator trait definition.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Options for a completion request.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative).
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: Some(1024),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Errors that can occur when interacting with a text generator.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timeout")]
    Timeout,
}

/// Trait for text generators.
///
/// Implementations of this trait can connect to different LLM backends
/// while providing a unified single-instruction completion interface.
/// Each call is an independent, stateless round trip; no conversation
/// context is carried between calls.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Get the model being used.
    fn model(&self) -> &str;

    /// Complete a single free-standing instruction.
    ///
    /// Returns the raw completion text, stripped of surrounding
    /// whitespace. No further validation is performed; a degenerate
    /// (e.g. empty) completion is returned as-is.
    async fn complete(
        &self,
        instruction: &str,
        options: &CompletionOptions,
    ) -> Result<String, LlmError>;

    /// Check if the generator is healthy and reachable.
    async fn health_check(&self) -> Result<(), LlmError>;
}
