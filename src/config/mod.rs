mod file_config;

pub use file_config::{EngineFileConfig, EnginesFileConfig, FileConfig, LlmFileConfig};

use crate::server::RequestsLoggingLevel;
use clap::ValueEnum;
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub output_dir: Option<PathBuf>,
    pub llm_url: Option<String>,
    pub llm_model: Option<String>,
    pub music_url: Option<String>,
    pub image_url: Option<String>,
}

/// Settings for the text generator endpoint.
///
/// The per-call timeout and sampling parameters are fixed by the
/// derivation stage, so only the endpoint and model are configurable.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "qwen2:7b-instruct".to_string(),
        }
    }
}

/// Settings for one synthesis engine endpoint.
#[derive(Debug, Clone)]
pub struct SynthesisEngineSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl SynthesisEngineSettings {
    /// Default music engine endpoint. Full-track synthesis takes
    /// minutes, so the timeout is generous.
    pub fn music_default() -> Self {
        Self {
            base_url: "http://localhost:8190".to_string(),
            timeout_secs: 600,
        }
    }

    /// Default image engine endpoint (single-step sampling is fast).
    pub fn image_default() -> Self {
        Self {
            base_url: "http://localhost:8191".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Settings for the three inference engines.
#[derive(Debug, Clone)]
pub struct EnginesSettings {
    pub llm: LlmSettings,
    pub music: SynthesisEngineSettings,
    pub image: SynthesisEngineSettings,
}

impl Default for EnginesSettings {
    fn default() -> Self {
        Self {
            llm: LlmSettings::default(),
            music: SynthesisEngineSettings::music_default(),
            image: SynthesisEngineSettings::image_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub output_dir: PathBuf,
    pub engines: EnginesSettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Self {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let output_dir = file
            .output_dir
            .map(PathBuf::from)
            .or_else(|| cli.output_dir.clone())
            .unwrap_or_else(|| std::env::temp_dir().join("tunesmith-output"));

        // Engine settings - merge file config with CLI overrides, then defaults
        let engines_file = file.engines.unwrap_or_default();

        let llm_file = engines_file.llm.unwrap_or_default();
        let llm_defaults = LlmSettings::default();
        let llm = LlmSettings {
            base_url: llm_file
                .base_url
                .or_else(|| cli.llm_url.clone())
                .unwrap_or(llm_defaults.base_url),
            model: llm_file
                .model
                .or_else(|| cli.llm_model.clone())
                .unwrap_or(llm_defaults.model),
        };

        let music_file = engines_file.music.unwrap_or_default();
        let music_defaults = SynthesisEngineSettings::music_default();
        let music = SynthesisEngineSettings {
            base_url: music_file
                .base_url
                .or_else(|| cli.music_url.clone())
                .unwrap_or(music_defaults.base_url),
            timeout_secs: music_file
                .timeout_secs
                .unwrap_or(music_defaults.timeout_secs),
        };

        let image_file = engines_file.image.unwrap_or_default();
        let image_defaults = SynthesisEngineSettings::image_default();
        let image = SynthesisEngineSettings {
            base_url: image_file
                .base_url
                .or_else(|| cli.image_url.clone())
                .unwrap_or(image_defaults.base_url),
            timeout_secs: image_file
                .timeout_secs
                .unwrap_or(image_defaults.timeout_secs),
        };

        Self {
            port,
            logging_level,
            output_dir,
            engines: EnginesSettings { llm, music, image },
        }
    }
}

fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
