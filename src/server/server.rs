use anyhow::Result;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{error, info};

use super::http_layers::log_requests;
use super::state::ServerState;
use crate::pipeline::{self, GenerationRequest};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    Json(stats)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    failures: Vec<String>,
}

async fn health(State(state): State<ServerState>) -> Response {
    let mut failures = Vec::new();

    if let Err(err) = state.engines.text.health_check().await {
        failures.push(format!("text generator: {}", err));
    }
    if let Err(err) = state.engines.music.health_check().await {
        failures.push(format!("music synthesizer: {}", err));
    }
    if let Err(err) = state.engines.image.health_check().await {
        failures.push(format!("image synthesizer: {}", err));
    }

    if failures.is_empty() {
        Json(HealthResponse {
            status: "ok",
            failures,
        })
        .into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "degraded",
                failures,
            }),
        )
            .into_response()
    }
}

async fn generate(
    State(state): State<ServerState>,
    Json(request): Json<GenerationRequest>,
) -> Response {
    let ctx = state.generation_context();

    match pipeline::generate(&ctx, &request).await {
        Ok(result) => Json(result).into_response(),
        Err(err) => {
            error!("Generation request failed: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

pub fn make_app(state: ServerState) -> Router {
    let v1_routes: Router = Router::new()
        .route("/generate", post(generate))
        .route("/health", get(health))
        .with_state(state.clone());

    Router::new()
        .route("/", get(home))
        .with_state(state.clone())
        .nest("/v1", v1_routes)
        .layer(middleware::from_fn_with_state(state, log_requests))
}

pub async fn run_server(state: ServerState) -> Result<()> {
    let port = state.config.port;
    let app = make_app(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Listening on port {}", port);

    Ok(axum::serve(listener, app).await?)
}
