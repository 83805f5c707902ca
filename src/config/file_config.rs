//! TOML file configuration.
//!
//! Every field is optional; values present in the file override the
//! corresponding CLI arguments during resolution.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub port: Option<u16>,
    pub logging_level: Option<String>,
    pub output_dir: Option<String>,
    pub engines: Option<EnginesFileConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnginesFileConfig {
    pub llm: Option<LlmFileConfig>,
    pub music: Option<EngineFileConfig>,
    pub image: Option<EngineFileConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmFileConfig {
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineFileConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Load and parse a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", path))
    }
}
