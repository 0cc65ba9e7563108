//! State fetch-and-store pipeline.
//!
//! Two strictly sequential upstream calls (state version lookup, then state
//! download), a digest over the downloaded bytes, and at most one store
//! write. Nothing is retried; every failure propagates to the caller. When
//! any step before the write fails, no write is issued.

use std::sync::Arc;

use async_trait::async_trait;
use domain::{
    ApiToken, ContentDigest, SecretName, SecretResolver, StateArtifact, StateSaveError,
    StateStore, StateVersionApi, WorkspaceName, WorkspaceRef,
};
use tracing::{info, instrument};

/// Result of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The state file was written to the store.
    Stored {
        key: WorkspaceName,
        digest: ContentDigest,
        bytes: usize,
    },
    /// Dry-run mode: both fetches succeeded, the write was skipped.
    DryRun {
        key: WorkspaceName,
        digest: ContentDigest,
        bytes: usize,
    },
}

impl SaveOutcome {
    /// Message suitable for a `passed` task result.
    pub fn summary(&self) -> String {
        match self {
            Self::Stored { key, .. } => format!("State file for workspace {key} saved"),
            Self::DryRun { key, .. } => {
                format!("Dry run: state file for workspace {key} fetched but not saved")
            }
        }
    }
}

/// Saves the current state of a workspace.
///
/// Abstracted so handler tests can count and fail pipeline invocations
/// without wiring three fake ports.
#[async_trait]
pub trait StateSaver: Send + Sync {
    /// Fetches the workspace's current state and stores it.
    async fn save(&self, workspace: &WorkspaceRef) -> Result<SaveOutcome, StateSaveError>;
}

/// The production [`StateSaver`].
pub struct StateBackup {
    secrets: Arc<dyn SecretResolver>,
    api: Arc<dyn StateVersionApi>,
    store: Arc<dyn StateStore>,
    token_secret: SecretName,
    dry_run: bool,
}

impl StateBackup {
    /// Creates a pipeline.
    ///
    /// `token_secret` names the parameter holding the Terraform Cloud API
    /// token; it is resolved on every call.
    pub fn new(
        secrets: Arc<dyn SecretResolver>,
        api: Arc<dyn StateVersionApi>,
        store: Arc<dyn StateStore>,
        token_secret: SecretName,
    ) -> Self {
        Self {
            secrets,
            api,
            store,
            token_secret,
            dry_run: false,
        }
    }

    /// Enables or disables dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

#[async_trait]
impl StateSaver for StateBackup {
    #[instrument(skip(self, workspace), fields(
        workspace_id = %workspace.id,
        workspace_name = %workspace.name,
        dry_run = self.dry_run,
    ))]
    async fn save(&self, workspace: &WorkspaceRef) -> Result<SaveOutcome, StateSaveError> {
        let token = ApiToken::from(self.secrets.resolve(&self.token_secret).await?);

        let url = self
            .api
            .current_state_download_url(&workspace.id, &token)
            .await?;
        let body = self.api.download_state(&url, &token).await?;

        let artifact = StateArtifact::new(workspace.name.clone(), body);
        let key = artifact.key().clone();
        let digest = artifact.digest().clone();
        let bytes = artifact.len();

        if self.dry_run {
            info!(
                key = %key,
                content_md5 = %digest,
                bytes,
                "Dry run: would have saved state file"
            );
            return Ok(SaveOutcome::DryRun { key, digest, bytes });
        }

        self.store.put_state(&artifact).await?;
        info!(key = %key, content_md5 = %digest, bytes, "State file saved");

        Ok(SaveOutcome::Stored { key, digest, bytes })
    }
}

#[cfg(test)]
#[path = "backup_tests.rs"]
mod tests;
