use axum::extract::FromRef;

use crate::engines::EngineBundle;
use crate::pipeline::GenerationContext;
use crate::publisher::ArtifactStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

/// Shared state for all HTTP handlers.
///
/// Everything in here is read-only after construction; the state is
/// cloned freely into concurrently handled requests.
#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub engines: EngineBundle,
    pub store: Arc<dyn ArtifactStore>,
    pub output_dir: PathBuf,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        engines: EngineBundle,
        store: Arc<dyn ArtifactStore>,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            engines,
            store,
            output_dir,
        }
    }

    /// The per-request view of the worker's shared resources.
    pub fn generation_context(&self) -> GenerationContext {
        GenerationContext {
            engines: self.engines.clone(),
            store: self.store.clone(),
            output_dir: self.output_dir.clone(),
        }
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
