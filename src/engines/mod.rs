//! Inference engine handles.
//!
//! The three engines (text generator, music synthesizer, image
//! synthesizer) are externally-supplied services reached over HTTP. They
//! are bundled into an [`EngineBundle`] once at worker start-up and
//! shared read-only across all requests handled by that worker.

pub mod image;
pub mod llm;
pub mod music;

pub use image::{ImageRequest, ImageSynthesizer, SdTurboClient};
pub use llm::{CompletionOptions, LlmError, OllamaGenerator, TextGenerator};
pub use music::{AceStepClient, AudioRequest, MusicSynthesizer};

use crate::config::EnginesSettings;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors shared by the music and image synthesis clients.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Engine error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Failed to write media file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Ready-to-use handles to the three inference engines.
///
/// Holds read-only state only; a single bundle is safely shared across
/// concurrent requests on the same warm worker.
#[derive(Clone)]
pub struct EngineBundle {
    pub text: Arc<dyn TextGenerator>,
    pub music: Arc<dyn MusicSynthesizer>,
    pub image: Arc<dyn ImageSynthesizer>,
}

impl EngineBundle {
    /// Build the bundle from resolved engine settings.
    pub fn from_settings(settings: &EnginesSettings) -> Result<Self> {
        let text = OllamaGenerator::new(settings.llm.base_url.clone(), settings.llm.model.clone());

        let music = AceStepClient::new(settings.music.base_url.clone(), settings.music.timeout_secs)
            .context("Failed to create music synthesis client")?;

        let image = SdTurboClient::new(settings.image.base_url.clone(), settings.image.timeout_secs)
            .context("Failed to create image synthesis client")?;

        Ok(Self {
            text: Arc::new(text),
            music: Arc::new(music),
            image: Arc::new(image),
        })
    }

    /// Probe all three engines.
    ///
    /// Called once at worker start-up; any unreachable engine is fatal to
    /// the worker (no partial-readiness state is modeled).
    pub async fn health_check_all(&self) -> Result<()> {
        self.text
            .health_check()
            .await
            .context("Text generator health check failed")?;
        info!(model = self.text.model(), "Text generator ready");

        self.music
            .health_check()
            .await
            .context("Music synthesizer health check failed")?;
        info!("Music synthesizer ready");

        self.image
            .health_check()
            .await
            .context("Image synthesizer health check failed")?;
        info!("Image synthesizer ready");

        Ok(())
    }
}
