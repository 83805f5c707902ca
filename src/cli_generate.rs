//! One-shot generation from the terminal.
//!
//! Drives the same pipeline as the HTTP endpoint and prints a
//! human-readable summary of the produced artifacts.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tunesmith_server::config;
use tunesmith_server::pipeline::{self, GenerationContext, GenerationRequest};
use tunesmith_server::publisher::R2ArtifactStore;
use tunesmith_server::EngineBundle;

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Free-text description of the track to generate.
    #[clap(default_value = "cyberpunk song pop")]
    pub description: String,

    /// Skip lyrics generation and produce an instrumental track.
    #[clap(long)]
    pub instrumental: bool,

    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory where synthesized media files are written before upload.
    #[clap(long, value_parser = parse_path)]
    pub output_dir: Option<PathBuf>,

    /// Base URL of the Ollama-compatible text generation service.
    #[clap(long)]
    pub llm_url: Option<String>,

    /// Model to request from the text generation service.
    #[clap(long)]
    pub llm_model: Option<String>,

    /// Base URL of the music synthesis service.
    #[clap(long)]
    pub music_url: Option<String>,

    /// Base URL of the image synthesis service.
    #[clap(long)]
    pub image_url: Option<String>,
}

impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            port: 0,
            logging_level: Default::default(),
            output_dir: args.output_dir.clone(),
            llm_url: args.llm_url.clone(),
            llm_model: args.llm_model.clone(),
            music_url: args.music_url.clone(),
            image_url: args.image_url.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => Some(config::FileConfig::load(path)?),
        None => None,
    };

    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config);

    let engines = EngineBundle::from_settings(&app_config.engines)?;
    let ctx = GenerationContext {
        engines,
        store: Arc::new(R2ArtifactStore::new()),
        output_dir: app_config.output_dir.clone(),
    };

    println!("Generating music...");
    println!("  Description: {}", cli_args.description);
    println!("  Instrumental: {}", cli_args.instrumental);

    let request = GenerationRequest {
        description: cli_args.description,
        instrumental: cli_args.instrumental,
    };
    let result = pipeline::generate(&ctx, &request).await?;

    println!();
    println!("Generation complete!");
    println!("  Audio: r2://{}", result.s3_audio);
    println!("  Image: r2://{}", result.s3_image);
    println!("  Genres: {}", result.categories.join(", "));

    Ok(())
}
