//! Shared test doubles for the integration tests.
#![allow(dead_code)] // Not every test binary uses every helper

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};

use tunesmith_server::engines::{
    AudioRequest, CompletionOptions, ImageRequest, ImageSynthesizer, LlmError, MusicSynthesizer,
    SynthesisError, TextGenerator,
};
use tunesmith_server::publisher::{storage_key_for, ArtifactStore, PublishError, StorageKey};
use tunesmith_server::server::{ServerConfig, ServerState};
use tunesmith_server::synthesis::MediaArtifact;
use tunesmith_server::EngineBundle;

/// Generator answering each instruction kind with a fixed completion.
pub struct CannedGenerator;

#[async_trait]
impl TextGenerator for CannedGenerator {
    fn model(&self) -> &str {
        "canned"
    }

    async fn complete(
        &self,
        instruction: &str,
        _options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        if instruction.contains("Musical Genre") {
            Ok("pop, synthwave, electronic".to_string())
        } else if instruction.contains("lyrics") {
            Ok("[verse]\nneon lights are calling\n[chorus]\nwe run all night".to_string())
        } else {
            Ok("upbeat synth pop, bright pads, driving bass, 120 bpm".to_string())
        }
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        Ok(())
    }
}

/// Music engine that writes a tiny placeholder file.
pub struct FileWritingMusic;

#[async_trait]
impl MusicSynthesizer for FileWritingMusic {
    async fn synthesize(
        &self,
        _request: &AudioRequest,
        output_path: &Path,
    ) -> Result<(), SynthesisError> {
        tokio::fs::write(output_path, b"RIFFwav")
            .await
            .map_err(|source| SynthesisError::Write {
                path: output_path.to_path_buf(),
                source,
            })
    }

    async fn health_check(&self) -> Result<(), SynthesisError> {
        Ok(())
    }
}

/// Image engine that writes a tiny placeholder file.
pub struct FileWritingImage;

#[async_trait]
impl ImageSynthesizer for FileWritingImage {
    async fn synthesize(
        &self,
        _request: &ImageRequest,
        output_path: &Path,
    ) -> Result<(), SynthesisError> {
        tokio::fs::write(output_path, b"\x89PNG")
            .await
            .map_err(|source| SynthesisError::Write {
                path: output_path.to_path_buf(),
                source,
            })
    }

    async fn health_check(&self) -> Result<(), SynthesisError> {
        Ok(())
    }
}

/// Store recording successful uploads; optionally fails once the
/// recorded count reaches `fail_after`.
pub struct InMemoryArtifactStore {
    published: Mutex<Vec<StorageKey>>,
    fail_after: Option<usize>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            fail_after: None,
        }
    }

    pub fn failing_after(count: usize) -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            fail_after: Some(count),
        }
    }

    pub fn published(&self) -> Vec<StorageKey> {
        self.published.lock().unwrap().clone()
    }
}

impl Default for InMemoryArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn publish(
        &self,
        artifact: &MediaArtifact,
        bucket: &str,
    ) -> Result<StorageKey, PublishError> {
        let mut published = self.published.lock().unwrap();
        if let Some(limit) = self.fail_after {
            if published.len() >= limit {
                return Err(PublishError::Storage("quota exceeded".to_string()));
            }
        }
        let key = StorageKey {
            key: storage_key_for(&artifact.local_path),
            bucket: bucket.to_string(),
        };
        published.push(key.clone());
        Ok(key)
    }
}

/// Bundle the canned engines.
pub fn stub_engines() -> EngineBundle {
    EngineBundle {
        text: Arc::new(CannedGenerator),
        music: Arc::new(FileWritingMusic),
        image: Arc::new(FileWritingImage),
    }
}

/// Server state wired to the canned engines and the given store.
pub fn test_state(store: Arc<dyn ArtifactStore>, output_dir: &Path) -> ServerState {
    ServerState::new(
        ServerConfig::default(),
        stub_engines(),
        store,
        output_dir.to_path_buf(),
    )
}
