//! Artifact publishing.
//!
//! Uploads locally produced media files to an S3-compatible bucket under
//! a freshly generated unique key. Credentials and the account-specific
//! endpoint are read from the process environment at call time, never
//! cached. On failure the error is surfaced unmodified; there is no
//! retry and no cleanup of the local file or of earlier uploads.

use crate::synthesis::MediaArtifact;
use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Environment variable holding the storage account identifier.
pub const ENV_ACCOUNT_ID: &str = "R2_ACCOUNT_ID";
/// Environment variable holding the storage access key.
pub const ENV_ACCESS_KEY_ID: &str = "R2_ACCESS_KEY_ID";
/// Environment variable holding the storage secret key.
pub const ENV_SECRET_ACCESS_KEY: &str = "R2_SECRET_ACCESS_KEY";
/// Environment variable holding the target bucket name.
pub const ENV_BUCKET_NAME: &str = "R2_BUCKET_NAME";

/// Errors that can occur while publishing an artifact.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Missing required environment variable {0}")]
    MissingEnv(&'static str),

    #[error("Failed to read local file {path}: {message}")]
    LocalFile { path: PathBuf, message: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

/// The durable record of a published artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKey {
    pub key: String,
    pub bucket: String,
}

/// Trait for artifact stores.
///
/// The production implementation talks to an S3-compatible service;
/// tests substitute an in-memory implementation.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Upload `artifact` to `bucket` under a freshly generated key.
    ///
    /// On success the object is durably stored under the returned key;
    /// ownership of the artifact's content transfers to the storage
    /// system.
    async fn publish(
        &self,
        artifact: &MediaArtifact,
        bucket: &str,
    ) -> Result<StorageKey, PublishError>;
}

/// Generate the storage key for a local file.
///
/// Format: `<uuid-v4>_<file-basename>`. The prefix is freshly random on
/// every call, so publishing the same file twice yields distinct keys.
pub fn storage_key_for(path: &Path) -> String {
    let basename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}_{}", Uuid::new_v4(), basename)
}

/// Read a required environment variable at call time.
fn required_env(name: &'static str) -> Result<String, PublishError> {
    std::env::var(name).map_err(|_| PublishError::MissingEnv(name))
}

/// Artifact store backed by a Cloudflare R2 bucket via the
/// S3-compatible API.
///
/// The endpoint is account-specific rather than region-specific, so the
/// region is fixed to the `auto` wildcard and addressing is path-style.
#[derive(Debug, Default, Clone)]
pub struct R2ArtifactStore;

impl R2ArtifactStore {
    pub fn new() -> Self {
        Self
    }

    /// Build an S3 client from the current process environment.
    fn client_from_env(&self) -> Result<aws_sdk_s3::Client, PublishError> {
        let account_id = required_env(ENV_ACCOUNT_ID)?;
        let access_key = required_env(ENV_ACCESS_KEY_ID)?;
        let secret_key = required_env(ENV_SECRET_ACCESS_KEY)?;

        let endpoint_url = format!("https://{account_id}.r2.cloudflarestorage.com");

        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("auto"))
            .endpoint_url(endpoint_url)
            .credentials_provider(Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "environment",
            ))
            .force_path_style(true)
            .build();

        Ok(aws_sdk_s3::Client::from_conf(config))
    }
}

#[async_trait]
impl ArtifactStore for R2ArtifactStore {
    async fn publish(
        &self,
        artifact: &MediaArtifact,
        bucket: &str,
    ) -> Result<StorageKey, PublishError> {
        let client = self.client_from_env()?;
        let key = storage_key_for(&artifact.local_path);

        let body = ByteStream::from_path(&artifact.local_path)
            .await
            .map_err(|e| PublishError::LocalFile {
                path: artifact.local_path.clone(),
                message: e.to_string(),
            })?;

        client
            .put_object()
            .bucket(bucket)
            .key(&key)
            .body(body)
            .send()
            .await
            .map_err(|e| PublishError::Storage(DisplayErrorContext(&e).to_string()))?;

        info!(
            path = %artifact.local_path.display(),
            bucket = bucket,
            key = %key,
            "Uploaded artifact"
        );

        Ok(StorageKey {
            key,
            bucket: bucket.to_string(),
        })
    }
}
