//! Failure tests for missing storage configuration.
//!
//! These tests remove R2_* environment variables, so they live in their
//! own test binary (their own process) and serialize on a lock.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{stub_engines, test_state, InMemoryArtifactStore};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;

use tunesmith_server::pipeline::{self, GenerationContext, GenerationRequest, PipelineError};
use tunesmith_server::publisher::{PublishError, R2ArtifactStore};
use tunesmith_server::server::make_app;

static ENV_LOCK: Mutex<()> = Mutex::new(());

#[tokio::test]
async fn missing_bucket_fails_request_before_any_upload() {
    let _guard = ENV_LOCK.lock().unwrap();
    std::env::remove_var("R2_BUCKET_NAME");

    let dir = TempDir::new().unwrap();
    let store = Arc::new(InMemoryArtifactStore::new());
    let app = make_app(test_state(store.clone(), dir.path()));

    let request = Request::builder()
        .method("POST")
        .uri("/v1/generate")
        .header("content-type", "application/json")
        .body(Body::from(
            r#"{"description": "happy pop song", "instrumental": false}"#,
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let message = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(message.contains("R2_BUCKET_NAME"));

    // No upload was attempted, so no key exists anywhere.
    assert!(store.published().is_empty());
}

#[tokio::test]
async fn missing_account_credentials_fail_the_upload_stage() {
    let _guard = ENV_LOCK.lock().unwrap();
    std::env::set_var("R2_BUCKET_NAME", "songs");
    std::env::remove_var("R2_ACCOUNT_ID");

    let dir = TempDir::new().unwrap();
    let ctx = GenerationContext {
        engines: stub_engines(),
        store: Arc::new(R2ArtifactStore::new()),
        output_dir: dir.path().to_path_buf(),
    };

    let request = GenerationRequest {
        description: "happy pop song".to_string(),
        instrumental: false,
    };
    let result = pipeline::generate(&ctx, &request).await;

    // The credential read happens before any network call is made.
    match result {
        Err(PipelineError::Publish(PublishError::MissingEnv(name))) => {
            assert_eq!(name, "R2_ACCOUNT_ID");
        }
        other => panic!("expected missing-credential failure, got {:?}", other.map(|_| ())),
    }

    std::env::remove_var("R2_BUCKET_NAME");
}
