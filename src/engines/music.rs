//! HTTP client for the ACE-Step music synthesis service.

use super::SynthesisError;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Parameters for one audio synthesis job.
///
/// Field names follow the synthesis service's wire format.
#[derive(Debug, Clone, Serialize)]
pub struct AudioRequest {
    pub prompt: String,
    pub lyrics: String,
    pub audio_duration: f32,
    pub infer_step: u32,
    pub guidance_scale: f32,
}

/// Trait for music synthesizers.
///
/// A synthesis call is synchronous from the caller's perspective: it
/// either completes and yields an audio file at `output_path`, or fails.
/// No partial-result or cancellation path exists.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait MusicSynthesizer: Send + Sync {
    /// Run one synthesis job and write the resulting audio file to `output_path`.
    async fn synthesize(
        &self,
        request: &AudioRequest,
        output_path: &Path,
    ) -> Result<(), SynthesisError>;

    /// Check if the synthesizer is healthy and reachable.
    async fn health_check(&self) -> Result<(), SynthesisError>;
}

/// Client for an ACE-Step synthesis service.
///
/// Posts a synthesis job to the service's `/synthesize` endpoint and
/// writes the returned WAV bytes to the requested output path.
#[derive(Clone)]
pub struct AceStepClient {
    client: Client,
    base_url: String,
}

impl AceStepClient {
    /// Create a new AceStepClient.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the synthesis service (e.g., "http://localhost:8190")
    /// * `timeout_secs` - Request timeout in seconds; synthesis of a full
    ///   track takes minutes, so this should be generous.
    pub fn new(base_url: String, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl MusicSynthesizer for AceStepClient {
    async fn synthesize(
        &self,
        request: &AudioRequest,
        output_path: &Path,
    ) -> Result<(), SynthesisError> {
        let url = format!("{}/synthesize", self.base_url);

        debug!(
            duration = request.audio_duration,
            steps = request.infer_step,
            "Sending audio synthesis job"
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SynthesisError::Timeout
                } else {
                    SynthesisError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::Connection(e.to_string()))?;

        tokio::fs::write(output_path, &bytes)
            .await
            .map_err(|source| SynthesisError::Write {
                path: output_path.to_path_buf(),
                source,
            })?;

        debug!(path = %output_path.display(), bytes = bytes.len(), "Audio file written");
        Ok(())
    }

    async fn health_check(&self) -> Result<(), SynthesisError> {
        let url = format!("{}/health", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SynthesisError::Timeout
                } else {
                    SynthesisError::Connection(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(SynthesisError::Api {
                status: response.status().as_u16(),
                message: "Health check failed".to_string(),
            });
        }

        Ok(())
    }
}
