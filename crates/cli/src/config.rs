//! Service configuration from environment variables.
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `REGION` | yes | |
//! | `S3_BUCKET` | yes | |
//! | `SALT_PATH` | yes | |
//! | `TFC_TOKEN_PATH` | yes | |
//! | `DRY_RUN` | no | off |
//! | `TFC_API_ROOT` | no | `https://app.terraform.io/api/v2` |
//! | `LISTEN_ADDR` | no | `0.0.0.0:8080` |
//! | `HTTP_TIMEOUT_SECS` | no | 10 |
//! | `PIPELINE_TIMEOUT_SECS` | no | 20 |
//! | `INVOCATION_TIMEOUT_SECS` | no | 45 |
//!
//! The invocation timeout must exceed the pipeline timeout plus two HTTP
//! timeouts, one for each run task callback around the pipeline.

use std::net::SocketAddr;
use std::time::Duration;

use domain::SecretName;
use thiserror::Error;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PIPELINE_TIMEOUT_SECS: u64 = 20;
const DEFAULT_INVOCATION_TIMEOUT_SECS: u64 = 45;

/// Invalid or missing configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Required environment variable {var} is not set")]
    Missing { var: &'static str },

    #[error("Environment variable {var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error(
        "INVOCATION_TIMEOUT_SECS ({invocation}s) must exceed PIPELINE_TIMEOUT_SECS ({pipeline}s) \
         plus twice HTTP_TIMEOUT_SECS ({http}s)"
    )]
    TimeoutBudget {
        pipeline: u64,
        http: u64,
        invocation: u64,
    },
}

/// Everything the composition root needs, parsed and validated once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub region: String,
    pub bucket: String,
    pub salt_path: SecretName,
    pub token_path: SecretName,
    pub dry_run: bool,
    pub api_root: String,
    pub listen_addr: SocketAddr,
    /// Applies to each Terraform Cloud request and each AWS operation.
    pub http_timeout: Duration,
    pub pipeline_timeout: Duration,
    pub invocation_timeout: Duration,
}

impl ServiceConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &'static str| lookup(var).filter(|v| !v.trim().is_empty());
        let required = |var: &'static str| get(var).ok_or(ConfigError::Missing { var });

        let region = required("REGION")?;
        let bucket = required("S3_BUCKET")?;
        let salt_path = secret_name("SALT_PATH", required("SALT_PATH")?)?;
        let token_path = secret_name("TFC_TOKEN_PATH", required("TFC_TOKEN_PATH")?)?;

        let dry_run = match get("DRY_RUN") {
            Some(value) => parse_bool("DRY_RUN", &value)?,
            None => false,
        };

        let api_root = get("TFC_API_ROOT").unwrap_or_else(|| tfc::DEFAULT_API_ROOT.to_string());
        if !(api_root.starts_with("https://") || api_root.starts_with("http://")) {
            return Err(ConfigError::Invalid {
                var: "TFC_API_ROOT",
                value: api_root,
                reason: "expected an http(s) URL",
            });
        }

        let listen_raw = get("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = listen_raw.parse().map_err(|_| ConfigError::Invalid {
            var: "LISTEN_ADDR",
            value: listen_raw.clone(),
            reason: "expected host:port",
        })?;

        let http_timeout = seconds(
            "HTTP_TIMEOUT_SECS",
            get("HTTP_TIMEOUT_SECS"),
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?;
        let pipeline = seconds(
            "PIPELINE_TIMEOUT_SECS",
            get("PIPELINE_TIMEOUT_SECS"),
            DEFAULT_PIPELINE_TIMEOUT_SECS,
        )?;
        let invocation = seconds(
            "INVOCATION_TIMEOUT_SECS",
            get("INVOCATION_TIMEOUT_SECS"),
            DEFAULT_INVOCATION_TIMEOUT_SECS,
        )?;
        if invocation <= pipeline.saturating_add(http_timeout.saturating_mul(2)) {
            return Err(ConfigError::TimeoutBudget {
                pipeline,
                http: http_timeout,
                invocation,
            });
        }

        Ok(Self {
            region,
            bucket,
            salt_path,
            token_path,
            dry_run,
            api_root,
            listen_addr,
            http_timeout: Duration::from_secs(http_timeout),
            pipeline_timeout: Duration::from_secs(pipeline),
            invocation_timeout: Duration::from_secs(invocation),
        })
    }
}

fn secret_name(var: &'static str, value: String) -> Result<SecretName, ConfigError> {
    SecretName::new(value).ok_or(ConfigError::Missing { var })
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
            reason: "expected a boolean",
        }),
    }
}

/// Parses a positive whole number of seconds, falling back to `default`.
fn seconds(var: &'static str, value: Option<String>, default: u64) -> Result<u64, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::Invalid {
            var,
            value,
            reason: "expected a positive number of seconds",
        }),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
