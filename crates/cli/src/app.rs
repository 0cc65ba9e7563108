//! Builds the concrete adapters and hands them to the handlers.

use std::sync::Arc;

use anyhow::Context;
use aws::{load_sdk_config, AwsSettings, S3StateStore, SsmSecretResolver};
use domain::SecretResolver;
use handlers::{StateBackup, WebhookDispatcher};
use tfc::{TfcClient, TfcConfig};
use tracing::info;

use crate::config::ServiceConfig;

/// Fully wired services.
pub struct Services {
    pub backup: Arc<StateBackup>,
    pub dispatcher: Arc<WebhookDispatcher>,
}

/// Constructs every adapter from `config`.
pub async fn build(config: &ServiceConfig) -> anyhow::Result<Services> {
    let sdk_config = load_sdk_config(&AwsSettings {
        region: config.region.clone(),
        operation_timeout: config.http_timeout,
    })
    .await;

    let secrets: Arc<dyn SecretResolver> =
        Arc::new(SsmSecretResolver::new(aws_sdk_ssm::Client::new(&sdk_config)));
    let store = Arc::new(S3StateStore::new(
        aws_sdk_s3::Client::new(&sdk_config),
        config.bucket.clone(),
    ));

    let tfc = Arc::new(
        TfcClient::new(
            TfcConfig::default()
                .with_api_root(config.api_root.clone())
                .with_timeout(config.http_timeout),
        )
        .context("Failed to build Terraform Cloud client")?,
    );

    let backup = Arc::new(
        StateBackup::new(secrets.clone(), tfc.clone(), store, config.token_path.clone())
            .with_dry_run(config.dry_run),
    );

    let dispatcher = Arc::new(
        WebhookDispatcher::new(secrets, config.salt_path.clone(), backup.clone(), tfc)
            .with_pipeline_timeout(config.pipeline_timeout),
    );

    info!(
        region = %config.region,
        bucket = %config.bucket,
        api_root = %config.api_root,
        dry_run = config.dry_run,
        "Services constructed"
    );

    Ok(Services { backup, dispatcher })
}
