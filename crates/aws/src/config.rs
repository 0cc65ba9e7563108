//! Shared AWS SDK configuration.
//!
//! Both adapters are built from one [`SdkConfig`] so they share region,
//! credentials, and timeouts. SDK retries are disabled: a failed write or
//! secret read surfaces immediately and the hosting platform decides whether
//! to redeliver the event.

use std::time::Duration;

use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::config::Region;

/// Region and timeout settings for the AWS clients.
#[derive(Debug, Clone)]
pub struct AwsSettings {
    /// AWS region, e.g. `"eu-west-1"`.
    pub region: String,
    /// Upper bound on one SDK operation, including the connection.
    pub operation_timeout: Duration,
}

/// Loads the SDK configuration from the default credential chain.
pub async fn load_sdk_config(settings: &AwsSettings) -> SdkConfig {
    let timeouts = TimeoutConfig::builder()
        .operation_timeout(settings.operation_timeout)
        .operation_attempt_timeout(settings.operation_timeout)
        .connect_timeout(settings.operation_timeout)
        .build();

    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(settings.region.clone()))
        .timeout_config(timeouts)
        .retry_config(RetryConfig::disabled())
        .load()
        .await
}
