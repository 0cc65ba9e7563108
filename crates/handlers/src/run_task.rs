//! Run task handler.
//!
//! A post-apply run task holds the run open until a final result is
//! reported. Once validation has passed the handler always sends exactly one
//! of `passed` or `failed` after `running`, even when the pipeline errors or
//! exceeds its deadline.
//!
//! Callback sequence:
//!
//! ```text
//! validate ──► running ──► save ──┬─► passed
//!                                 └─► failed ──► original error returned
//! ```
//!
//! Everything after validation runs on a spawned task. Dropping the
//! caller's future (for example when the HTTP invocation deadline fires)
//! does not cancel the final callback.

use std::sync::Arc;
use std::time::Duration;

use domain::{
    RunTaskAction, RunTaskPayload, RunTaskRequest, StateSaveError, TaskResult,
    TaskResultReporter, WebhookResponse,
};
use tracing::{error, info, instrument, Instrument};

use crate::StateSaver;

/// Handles a verified run task POST.
///
/// # Errors
///
/// - Parse, stage, and validation errors, before any callback is sent.
/// - A failure sending the `running` callback (the pipeline is not started).
/// - The pipeline error, after a `failed` callback was attempted.
/// - A failure sending the `passed` callback.
/// - [`StateSaveError::Interrupted`] if the spawned task panicked.
pub async fn handle_run_task(
    saver: Arc<dyn StateSaver>,
    reporter: Arc<dyn TaskResultReporter>,
    body: &[u8],
    pipeline_timeout: Duration,
) -> Result<WebhookResponse, StateSaveError> {
    let payload = RunTaskPayload::parse(body)?;

    match payload.action()? {
        RunTaskAction::NoStage => {
            info!("Run task stage set to null in payload; nothing to do");
        }
        RunTaskAction::SaveState(request) => {
            let task = tokio::spawn(
                async move {
                    save_and_report(saver.as_ref(), reporter.as_ref(), &request, pipeline_timeout)
                        .await
                }
                .in_current_span(),
            );
            task.await.map_err(|err| StateSaveError::Interrupted {
                message: err.to_string(),
            })??;
        }
    }

    Ok(WebhookResponse::ok())
}

#[instrument(skip_all, fields(
    workspace_id = %request.workspace.id,
    workspace_name = %request.workspace.name,
))]
async fn save_and_report(
    saver: &dyn StateSaver,
    reporter: &dyn TaskResultReporter,
    request: &RunTaskRequest,
    pipeline_timeout: Duration,
) -> Result<(), StateSaveError> {
    let callback = &request.callback;
    let workspace = &request.workspace;

    reporter
        .report(
            callback,
            &TaskResult::running(format!(
                "Saving state file for workspace {}",
                workspace.name
            )),
        )
        .await?;

    let result = match tokio::time::timeout(pipeline_timeout, saver.save(workspace)).await {
        Ok(result) => result,
        Err(_) => Err(StateSaveError::Timeout {
            operation: "state save",
            seconds: pipeline_timeout.as_secs(),
        }),
    };

    match result {
        Ok(outcome) => {
            reporter
                .report(callback, &TaskResult::passed(outcome.summary()))
                .await?;
            info!("Run task passed");
            Ok(())
        }
        Err(err) => {
            let message = err.to_string();
            if let Err(callback_err) = reporter
                .report(callback, &TaskResult::failed(message.clone()))
                .await
            {
                // Secondary: the pipeline error is what the caller needs.
                error!(error = %callback_err, "Failed to report run task failure");
            }
            error!(error = %message, "Run task failed");
            Err(err)
        }
    }
}

#[cfg(test)]
#[path = "run_task_tests.rs"]
mod tests;
