//! SSM Parameter Store [`SecretResolver`].
//!
//! Every call reads the parameter fresh with decryption enabled. Rotating the
//! salt or API token therefore takes effect on the next inbound event.

use async_trait::async_trait;
use aws_sdk_ssm::error::DisplayErrorContext;
use aws_sdk_ssm::Client;
use domain::{SecretError, SecretName, SecretResolver, SecretValue};
use tracing::instrument;

/// Reads `SecureString` parameters.
#[derive(Debug, Clone)]
pub struct SsmSecretResolver {
    client: Client,
}

impl SsmSecretResolver {
    /// Creates a resolver over `client`.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretResolver for SsmSecretResolver {
    #[instrument(skip_all, fields(parameter = %name))]
    async fn resolve(&self, name: &SecretName) -> Result<SecretValue, SecretError> {
        let output = self
            .client
            .get_parameter()
            .name(name.as_str())
            .with_decryption(true)
            .send()
            .await
            .map_err(|err| {
                let not_found = err
                    .as_service_error()
                    .is_some_and(|e| e.is_parameter_not_found());
                if not_found {
                    SecretError::NotFound { name: name.clone() }
                } else {
                    SecretError::Unavailable {
                        name: name.clone(),
                        message: DisplayErrorContext(&err).to_string(),
                    }
                }
            })?;

        output
            .parameter()
            .and_then(|p| p.value())
            .map(SecretValue::new)
            .ok_or_else(|| SecretError::NotFound { name: name.clone() })
    }
}

#[cfg(test)]
#[path = "ssm_tests.rs"]
mod tests;
