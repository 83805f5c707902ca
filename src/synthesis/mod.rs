//! Media synthesis.
//!
//! Drives the music and image engines to produce one audio file and one
//! cover image per request. Numeric parameters are fixed constants of
//! the pipeline, not derived from the request.

use crate::engines::{AudioRequest, EngineBundle, ImageRequest, SynthesisError};
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

/// Target audio duration in seconds.
pub const AUDIO_DURATION_SECS: f32 = 120.0;
/// Diffusion steps for audio synthesis.
pub const AUDIO_INFER_STEPS: u32 = 126;
/// Guidance scale for audio synthesis.
pub const AUDIO_GUIDANCE_SCALE: f32 = 8.6;

/// Stylistic suffix appended to the derived prompt for cover art.
pub const COVER_ART_SUFFIX: &str = ", album cover art, high detail, vibrant colors, digital art";
/// Single-step fast-sampling configuration for the image engine.
pub const IMAGE_INFER_STEPS: u32 = 1;
/// Guidance scale for image synthesis.
pub const IMAGE_GUIDANCE_SCALE: f32 = 0.0;

/// Kind of media produced by a synthesis call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Audio,
    Image,
}

/// A locally produced media file, consumed exactly once by the
/// publisher. The local copy is disposable after upload.
#[derive(Debug, Clone)]
pub struct MediaArtifact {
    pub local_path: PathBuf,
    pub kind: ArtifactKind,
}

/// Synthesize the audio track and the cover image for a derived prompt.
///
/// The two calls run strictly in sequence (audio first) and are blocking
/// from the request's perspective; either both complete and yield files,
/// or the whole request fails.
pub async fn synthesize(
    engines: &EngineBundle,
    output_dir: &Path,
    prompt: &str,
    lyrics: &str,
) -> Result<(MediaArtifact, MediaArtifact), SynthesisError> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|source| SynthesisError::Write {
            path: output_dir.to_path_buf(),
            source,
        })?;

    let audio_path = output_dir.join(format!("{}_output.wav", Uuid::new_v4()));
    let audio_request = AudioRequest {
        prompt: prompt.to_string(),
        lyrics: lyrics.to_string(),
        audio_duration: AUDIO_DURATION_SECS,
        infer_step: AUDIO_INFER_STEPS,
        guidance_scale: AUDIO_GUIDANCE_SCALE,
    };
    engines.music.synthesize(&audio_request, &audio_path).await?;
    info!(path = %audio_path.display(), "Music generated");

    let image_path = output_dir.join(format!("{}_cover.png", Uuid::new_v4()));
    let image_request = ImageRequest {
        prompt: format!("{prompt}{COVER_ART_SUFFIX}"),
        num_inference_steps: IMAGE_INFER_STEPS,
        guidance_scale: IMAGE_GUIDANCE_SCALE,
    };
    engines.image.synthesize(&image_request, &image_path).await?;
    info!(path = %image_path.display(), "Cover art generated");

    Ok((
        MediaArtifact {
            local_path: audio_path,
            kind: ArtifactKind::Audio,
        },
        MediaArtifact {
            local_path: image_path,
            kind: ArtifactKind::Image,
        },
    ))
}
