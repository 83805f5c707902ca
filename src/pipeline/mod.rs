//! The request handling pipeline.
//!
//! Drives the fixed linear sequence for one generation request:
//! derive creative, synthesize media, publish audio, publish image,
//! assemble result. Any failure at any stage aborts the entire request;
//! there is no partial result and no compensating rollback of earlier
//! uploads. The caller re-runs the whole sequence from scratch.

use crate::creative;
use crate::engines::{EngineBundle, LlmError, SynthesisError};
use crate::publisher::{ArtifactStore, PublishError, ENV_BUCKET_NAME};
use crate::synthesis;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// One inbound generation request. Immutable once created.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationRequest {
    pub description: String,
    #[serde(default)]
    pub instrumental: bool,
}

/// The assembled response payload. Field names are the wire contract.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    pub s3_audio: String,
    pub s3_image: String,
    pub lyrics: String,
    pub categories: Vec<String>,
    pub prompt: String,
}

/// Everything a request needs, constructed once per worker and passed
/// explicitly into each operation. Read-only after construction.
#[derive(Clone)]
pub struct GenerationContext {
    pub engines: EngineBundle,
    pub store: Arc<dyn ArtifactStore>,
    pub output_dir: PathBuf,
}

/// Errors from any stage of the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Missing required environment variable {0}")]
    MissingEnv(&'static str),

    #[error("Prompt derivation failed: {0}")]
    Derivation(#[from] LlmError),

    #[error("Media synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("Artifact upload failed: {0}")]
    Publish(#[from] PublishError),
}

/// Run the full pipeline for one request.
pub async fn generate(
    ctx: &GenerationContext,
    request: &GenerationRequest,
) -> Result<GenerationResult, PipelineError> {
    // The bucket is resolved before any stage runs; a misconfigured
    // worker aborts the request without touching the engines.
    let bucket =
        std::env::var(ENV_BUCKET_NAME).map_err(|_| PipelineError::MissingEnv(ENV_BUCKET_NAME))?;

    info!(
        description = %request.description,
        instrumental = request.instrumental,
        "Generating music"
    );

    let creative = creative::derive(
        ctx.engines.text.as_ref(),
        &request.description,
        request.instrumental,
    )
    .await?;

    let (audio, image) = synthesis::synthesize(
        &ctx.engines,
        &ctx.output_dir,
        &creative.prompt,
        &creative.lyrics,
    )
    .await?;

    let audio_key = ctx.store.publish(&audio, &bucket).await?;
    let image_key = ctx.store.publish(&image, &bucket).await?;

    info!(
        audio_key = %audio_key.key,
        image_key = %image_key.key,
        "Generation complete"
    );

    Ok(GenerationResult {
        s3_audio: audio_key.key,
        s3_image: image_key.key,
        lyrics: creative.lyrics,
        categories: creative.genre_tags,
        prompt: creative.prompt,
    })
}
