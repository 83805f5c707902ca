//! HTTP client for the text-to-image service used for cover art.

use super::SynthesisError;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Parameters for one image synthesis job.
#[derive(Debug, Clone, Serialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
}

/// Trait for image synthesizers.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait ImageSynthesizer: Send + Sync {
    /// Run one synthesis job and write the resulting image file to `output_path`.
    async fn synthesize(
        &self,
        request: &ImageRequest,
        output_path: &Path,
    ) -> Result<(), SynthesisError>;

    /// Check if the synthesizer is healthy and reachable.
    async fn health_check(&self) -> Result<(), SynthesisError>;
}

/// Client for an SD-Turbo style text-to-image service.
///
/// The service runs a minimal fast-sampling configuration (single
/// inference step, no guidance) and returns PNG bytes.
#[derive(Clone)]
pub struct SdTurboClient {
    client: Client,
    base_url: String,
}

impl SdTurboClient {
    /// Create a new SdTurboClient.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the image service (e.g., "http://localhost:8191")
    /// * `timeout_secs` - Request timeout in seconds
    pub fn new(base_url: String, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl ImageSynthesizer for SdTurboClient {
    async fn synthesize(
        &self,
        request: &ImageRequest,
        output_path: &Path,
    ) -> Result<(), SynthesisError> {
        let url = format!("{}/generate", self.base_url);

        debug!(steps = request.num_inference_steps, "Sending image synthesis job");

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

        debug!(path = %output_path.display(), bytes = bytes.len(), "Image file written");
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
