use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Import modules from the library crate
use tunesmith_server::config;
use tunesmith_server::publisher::R2ArtifactStore;
use tunesmith_server::server::{run_server, RequestsLoggingLevel, ServerConfig, ServerState};
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
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

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

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            port: args.port,
            logging_level: args.logging_level.clone(),
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

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config);

    info!("Configuration loaded:");
    info!("  port: {}", app_config.port);
    info!("  output_dir: {:?}", app_config.output_dir);
    info!(
        "  text generator: {} ({})",
        app_config.engines.llm.base_url, app_config.engines.llm.model
    );
    info!("  music synthesizer: {}", app_config.engines.music.base_url);
    info!("  image synthesizer: {}", app_config.engines.image.base_url);

    // Engine handles are built once per worker and shared read-only
    // across all requests; an unreachable engine is fatal at start-up.
    let engines = EngineBundle::from_settings(&app_config.engines)?;

    info!("Probing inference engines...");
    engines.health_check_all().await?;

    let state = ServerState::new(
        ServerConfig {
            requests_logging_level: app_config.logging_level.clone(),
            port: app_config.port,
        },
        engines,
        Arc::new(R2ArtifactStore::new()),
        app_config.output_dir.clone(),
    );

    info!("Ready to serve at port {}!", app_config.port);

    tokio::select! {
        result = run_server(state) => {
            info!("HTTP server stopped: {:?}", result);
            result
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, initiating graceful shutdown");
            Ok(())
        }
    }
}
