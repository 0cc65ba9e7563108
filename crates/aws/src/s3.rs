//! S3-backed [`StateStore`].
//!
//! Objects are written with `Content-MD5` set to the artifact's digest, so S3
//! itself rejects an upload whose received bytes differ (`BadDigest`). Keys
//! are the raw workspace name; a later write for the same workspace replaces
//! the earlier object.

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use domain::{StateArtifact, StateStore, StorageError};
use tracing::{debug, instrument};

/// Error code S3 returns when `Content-MD5` does not match the body.
const BAD_DIGEST: &str = "BadDigest";
const INVALID_DIGEST: &str = "InvalidDigest";

/// Writes state artifacts to one bucket.
#[derive(Debug, Clone)]
pub struct S3StateStore {
    client: Client,
    bucket: String,
}

impl S3StateStore {
    /// Creates a store writing to `bucket`.
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

/// Classifies a failed write by its S3 error code.
pub(crate) fn storage_error(key: &str, code: Option<&str>, message: String) -> StorageError {
    match code {
        Some(BAD_DIGEST) | Some(INVALID_DIGEST) => StorageError::IntegrityMismatch {
            key: key.to_string(),
            message,
        },
        _ => StorageError::WriteFailed {
            key: key.to_string(),
            message,
        },
    }
}

#[async_trait]
impl StateStore for S3StateStore {
    #[instrument(skip_all, fields(
        bucket = %self.bucket,
        key = %artifact.key(),
        content_md5 = %artifact.digest(),
    ))]
    async fn put_state(&self, artifact: &StateArtifact) -> Result<(), StorageError> {
        let key = artifact.key().as_str();

        let output = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_md5(artifact.digest().as_str())
            .body(ByteStream::from(artifact.body().to_vec()))
            .send()
            .await
            .map_err(|err| {
                let code = err.as_service_error().and_then(|e| e.code()).map(str::to_string);
                storage_error(key, code.as_deref(), DisplayErrorContext(&err).to_string())
            })?;

        debug!(e_tag = output.e_tag().unwrap_or_default(), "Object written");
        Ok(())
    }
}

#[cfg(test)]
#[path = "s3_tests.rs"]
mod tests;
