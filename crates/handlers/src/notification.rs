//! Notification handler.
//!
//! Fire-and-forget deliveries: nothing is reported back to Terraform Cloud.
//! Pipeline failures propagate so the hosting platform records the
//! invocation as failed.

use domain::{NotificationAction, NotificationPayload, StateSaveError, WebhookResponse};
use tracing::{info, warn};

use crate::StateSaver;

/// Handles a verified notification POST.
///
/// # Errors
///
/// Returns the payload parse/validation error, or the pipeline error when an
/// `applied` notification fails to save.
pub async fn handle_notification(
    saver: &dyn StateSaver,
    body: &[u8],
) -> Result<WebhookResponse, StateSaveError> {
    let payload = NotificationPayload::parse(body)?;

    match payload.action()? {
        NotificationAction::NoRunStatus => {
            info!("Notification carries no run status; nothing to do");
        }
        NotificationAction::NullRunStatus => {
            warn!("Run status set to null in notification payload");
        }
        NotificationAction::SaveState(workspace) => {
            info!(
                workspace_id = %workspace.id,
                workspace_name = %workspace.name,
                "Run applied; saving state file"
            );
            saver.save(&workspace).await?;
        }
        NotificationAction::Ignore { run_status } => {
            info!(%run_status, "Run status not supported for state saving; ignoring");
        }
    }

    Ok(WebhookResponse::ok())
}

#[cfg(test)]
#[path = "notification_tests.rs"]
mod tests;
