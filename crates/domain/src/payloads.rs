//! Notification and run task payload shapes.
//!
//! Payloads are parsed once at the boundary into typed structures with
//! explicit optional fields. Handlers then ask a payload a single question
//! ("what should I do?") instead of probing keys.
//!
//! Only the fields this receiver acts on are modelled; everything else
//! Terraform Cloud sends is ignored by serde.

use serde::{Deserialize, Deserializer};

use crate::{ApiToken, StateSaveError, TaskCallback, WorkspaceId, WorkspaceName, WorkspaceRef};

/// Run status that triggers a state backup from a notification.
pub const APPLIED_RUN_STATUS: &str = "applied";

/// Run task stage that triggers a state backup.
pub const POST_APPLY_STAGE: &str = "post_apply";

/// Maps a present JSON value (including `null`) to `Some`, so that together
/// with `#[serde(default)]` an absent key stays `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn workspace_ref(
    id: Option<&str>,
    name: Option<&str>,
) -> Result<WorkspaceRef, StateSaveError> {
    let id = id
        .and_then(WorkspaceId::new)
        .ok_or(StateSaveError::Validation {
            field: "workspace_id",
        })?;
    let name = name
        .and_then(WorkspaceName::new)
        .ok_or(StateSaveError::Validation {
            field: "workspace_name",
        })?;
    Ok(WorkspaceRef::new(id, name))
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// A workspace notification delivery.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotificationPayload {
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub workspace_name: Option<String>,
    #[serde(default)]
    pub notifications: Vec<NotificationEntry>,
}

/// One entry of [`NotificationPayload::notifications`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotificationEntry {
    /// `None` when the key is absent, `Some(None)` when it is `null`.
    #[serde(default, deserialize_with = "present")]
    pub run_status: Option<Option<String>>,
}

/// What a notification asks the receiver to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationAction {
    /// No entries, or the first entry has no `run_status` key.
    NoRunStatus,
    /// `run_status` is `null` (e.g. a verification delivery).
    NullRunStatus,
    /// The run was applied; save this workspace's state.
    SaveState(WorkspaceRef),
    /// Any other run status.
    Ignore {
        /// The status received.
        run_status: String,
    },
}

impl NotificationPayload {
    /// Parses a raw notification body.
    ///
    /// # Errors
    ///
    /// Returns [`StateSaveError::MalformedPayload`] if the body is not a JSON
    /// object of the notification shape.
    pub fn parse(body: &[u8]) -> Result<Self, StateSaveError> {
        serde_json::from_slice(body).map_err(|e| StateSaveError::MalformedPayload {
            kind: "notification",
            message: e.to_string(),
        })
    }

    /// Decides what to do based on the first notification entry only.
    ///
    /// # Errors
    ///
    /// Returns [`StateSaveError::Validation`] when the run was applied but
    /// the outer `workspace_id` or `workspace_name` is missing or empty.
    pub fn action(&self) -> Result<NotificationAction, StateSaveError> {
        let Some(first) = self.notifications.first() else {
            return Ok(NotificationAction::NoRunStatus);
        };
        match &first.run_status {
            None => Ok(NotificationAction::NoRunStatus),
            Some(None) => Ok(NotificationAction::NullRunStatus),
            Some(Some(status)) if status == APPLIED_RUN_STATUS => {
                let workspace = workspace_ref(
                    self.workspace_id.as_deref(),
                    self.workspace_name.as_deref(),
                )?;
                Ok(NotificationAction::SaveState(workspace))
            }
            Some(Some(status)) => Ok(NotificationAction::Ignore {
                run_status: status.clone(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Run tasks
// ---------------------------------------------------------------------------

/// A run task delivery.
///
/// The access token stays a plain string until [`RunTaskPayload::action`]
/// wraps it; the manual `Debug` impl below keeps it out of logs meanwhile.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct RunTaskPayload {
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub workspace_name: Option<String>,
    #[serde(default)]
    pub task_result_callback_url: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

impl std::fmt::Debug for RunTaskPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunTaskPayload")
            .field("stage", &self.stage)
            .field("workspace_id", &self.workspace_id)
            .field("workspace_name", &self.workspace_name)
            .field("task_result_callback_url", &self.task_result_callback_url)
            .field("access_token", &self.access_token.as_ref().map(|_| "<REDACTED>"))
            .finish()
    }
}

/// A validated post-apply run task request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTaskRequest {
    /// Workspace whose state is saved.
    pub workspace: WorkspaceRef,
    /// Where the outcome is reported.
    pub callback: TaskCallback,
}

/// What a run task delivery asks the receiver to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunTaskAction {
    /// `stage` is `null`; nothing to do.
    NoStage,
    /// Post-apply stage with every required field present.
    SaveState(RunTaskRequest),
}

impl RunTaskPayload {
    /// Parses a raw run task body.
    ///
    /// # Errors
    ///
    /// Returns [`StateSaveError::MalformedPayload`] if the body is not a JSON
    /// object of the run task shape.
    pub fn parse(body: &[u8]) -> Result<Self, StateSaveError> {
        serde_json::from_slice(body).map_err(|e| StateSaveError::MalformedPayload {
            kind: "run task",
            message: e.to_string(),
        })
    }

    /// Validates the payload and decides what to do.
    ///
    /// # Errors
    ///
    /// - [`StateSaveError::UnsupportedStage`] for any stage other than
    ///   `null` or [`POST_APPLY_STAGE`].
    /// - [`StateSaveError::Validation`] when a post-apply payload lacks
    ///   `workspace_id`, `workspace_name`, `task_result_callback_url` or
    ///   `access_token`.
    pub fn action(&self) -> Result<RunTaskAction, StateSaveError> {
        match self.stage.as_deref() {
            None => Ok(RunTaskAction::NoStage),
            Some(POST_APPLY_STAGE) => {
                let workspace = workspace_ref(
                    self.workspace_id.as_deref(),
                    self.workspace_name.as_deref(),
                )?;
                let url = self
                    .task_result_callback_url
                    .as_deref()
                    .filter(|u| !u.is_empty())
                    .ok_or(StateSaveError::Validation {
                        field: "task_result_callback_url",
                    })?;
                let access_token = self
                    .access_token
                    .as_deref()
                    .and_then(ApiToken::new)
                    .ok_or(StateSaveError::Validation {
                        field: "access_token",
                    })?;
                Ok(RunTaskAction::SaveState(RunTaskRequest {
                    workspace,
                    callback: TaskCallback {
                        url: url.to_string(),
                        access_token,
                    },
                }))
            }
            Some(other) => Err(StateSaveError::UnsupportedStage {
                stage: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "payloads_tests.rs"]
mod tests;
