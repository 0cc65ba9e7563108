//! Event dispatcher: authenticate, then route by method and signature kind.
//!
//! | Method | Signature matched | Outcome |
//! |--------|-------------------|---------|
//! | GET | either | `200 OK`, no payload inspection |
//! | POST | notification | [`handle_notification`] |
//! | POST | run task | [`handle_run_task`] |
//! | other | either | authentication failure |
//! | any | neither | authentication failure |
//!
//! The salt is resolved for every event and never cached.

use std::sync::Arc;
use std::time::Duration;

use domain::{
    signature, HttpMethod, InboundEvent, InvocationId, SecretName, SecretResolver, SignatureKind,
    StateSaveError, TaskResultReporter, WebhookResponse,
};
use tracing::{info, instrument, warn};

use crate::{handle_notification, handle_run_task, StateSaver};

/// Default bound on one pipeline run inside a run task invocation.
pub const DEFAULT_PIPELINE_TIMEOUT: Duration = Duration::from_secs(20);

/// Routes verified webhook events to their handlers.
pub struct WebhookDispatcher {
    secrets: Arc<dyn SecretResolver>,
    salt_secret: SecretName,
    saver: Arc<dyn StateSaver>,
    reporter: Arc<dyn TaskResultReporter>,
    pipeline_timeout: Duration,
}

impl WebhookDispatcher {
    /// Creates a dispatcher.
    ///
    /// `salt_secret` names the parameter holding the shared signing salt used
    /// for both notification and run task signatures.
    pub fn new(
        secrets: Arc<dyn SecretResolver>,
        salt_secret: SecretName,
        saver: Arc<dyn StateSaver>,
        reporter: Arc<dyn TaskResultReporter>,
    ) -> Self {
        Self {
            secrets,
            salt_secret,
            saver,
            reporter,
            pipeline_timeout: DEFAULT_PIPELINE_TIMEOUT,
        }
    }

    /// Overrides the deadline applied to the pipeline in run task flows.
    pub fn with_pipeline_timeout(mut self, timeout: Duration) -> Self {
        self.pipeline_timeout = timeout;
        self
    }

    /// Authenticates and handles one inbound event.
    ///
    /// # Errors
    ///
    /// [`StateSaveError::Authentication`] when no signature matches or the
    /// method is neither GET nor POST; otherwise whatever the selected
    /// handler returns.
    #[instrument(skip_all, fields(
        invocation_id = %InvocationId::new_random(),
        method = %event.method(),
        signature = tracing::field::Empty,
    ))]
    pub async fn dispatch(&self, event: InboundEvent) -> Result<WebhookResponse, StateSaveError> {
        let salt = self.secrets.resolve(&self.salt_secret).await?;

        let kind = match signature::verify(&salt, &event) {
            Ok(kind) => kind,
            Err(err) => {
                warn!("Invalid HMAC signature");
                return Err(err);
            }
        };
        tracing::Span::current().record("signature", tracing::field::display(kind));

        match (event.method(), kind) {
            (HttpMethod::Get, _) => {
                info!("Acknowledging GET");
                Ok(WebhookResponse::ok())
            }
            (HttpMethod::Post, SignatureKind::Notification) => {
                handle_notification(self.saver.as_ref(), event.body()).await
            }
            (HttpMethod::Post, SignatureKind::RunTask) => {
                handle_run_task(
                    self.saver.clone(),
                    self.reporter.clone(),
                    event.body(),
                    self.pipeline_timeout,
                )
                .await
            }
            (HttpMethod::Other(method), _) => {
                warn!(%method, "Unsupported method on a signed request");
                Err(StateSaveError::Authentication)
            }
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
