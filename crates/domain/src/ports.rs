//! Port traits implemented by infrastructure crates.
//!
//! The handlers depend only on these traits; each is used as
//! `Arc<dyn Trait>` so the parameter store, the Terraform Cloud API, and the
//! object store can be substituted independently in tests.

use async_trait::async_trait;

use crate::{
    ApiToken, CallbackError, DownloadUrl, SecretError, SecretName, SecretValue, StateArtifact,
    StorageError, TaskCallback, TaskResult, UpstreamError, WorkspaceId,
};

/// Resolves secrets from a secure parameter store.
///
/// Implementations must not cache: every call reads the current value.
#[async_trait]
pub trait SecretResolver: Send + Sync {
    /// Reads and decrypts the secret stored under `name`.
    async fn resolve(&self, name: &SecretName) -> Result<SecretValue, SecretError>;
}

/// Read access to a workspace's current state version.
#[async_trait]
pub trait StateVersionApi: Send + Sync {
    /// Looks up the short-lived download URL of the workspace's current
    /// state version.
    async fn current_state_download_url(
        &self,
        workspace_id: &WorkspaceId,
        token: &ApiToken,
    ) -> Result<DownloadUrl, UpstreamError>;

    /// Downloads the raw state file.
    async fn download_state(
        &self,
        url: &DownloadUrl,
        token: &ApiToken,
    ) -> Result<Vec<u8>, UpstreamError>;
}

/// Durable storage for state artifacts.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Writes `artifact` under its key, overwriting any previous object.
    ///
    /// The artifact's digest must be sent with the write so the store can
    /// reject corrupted uploads.
    async fn put_state(&self, artifact: &StateArtifact) -> Result<(), StorageError>;
}

/// Reports run task progress back to Terraform Cloud.
#[async_trait]
pub trait TaskResultReporter: Send + Sync {
    /// Sends `result` to the callback URL using the callback's access token.
    async fn report(&self, callback: &TaskCallback, result: &TaskResult)
        -> Result<(), CallbackError>;
}
