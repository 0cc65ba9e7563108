//! Error types for the state backup domain.
//!
//! Each port has its own error enum ([`SecretError`], [`UpstreamError`],
//! [`StorageError`], [`CallbackError`]) so adapters only describe failures
//! they can actually produce. [`StateSaveError`] is the top-level type the
//! handlers return; the HTTP adapter translates it into a status code and the
//! run task handler translates it into a `failed` callback message.
//!
//! None of these types ever carry secret material. Upstream response bodies
//! are kept because they are the only diagnostics Terraform Cloud returns.

use thiserror::Error;

use crate::SecretName;

// ---------------------------------------------------------------------------
// Port-level errors
// ---------------------------------------------------------------------------

/// Failure to resolve a secret from the parameter store.
#[derive(Debug, Error)]
pub enum SecretError {
    /// The parameter does not exist or has no value.
    #[error("Secret '{name}' not found")]
    NotFound {
        /// Path of the missing parameter.
        name: SecretName,
    },

    /// The parameter store call itself failed.
    #[error("Failed to read secret '{name}': {message}")]
    Unavailable {
        /// Path of the parameter being read.
        name: SecretName,
        /// Description of the underlying failure.
        message: String,
    },
}

/// Failure talking to the Terraform Cloud API or the state archive.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The server answered with a status above 399.
    #[error("{operation} failed with status {status}: {body}")]
    Status {
        /// Which call failed (e.g. `"workspace state lookup"`).
        operation: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body, kept verbatim for diagnostics.
        body: String,
    },

    /// The request never produced a response (DNS, TLS, timeout, reset).
    #[error("{operation} failed: {message}")]
    Transport {
        /// Which call failed.
        operation: &'static str,
        /// Description of the underlying failure.
        message: String,
    },

    /// The response arrived but did not have the expected shape.
    #[error("{operation} returned an unexpected response: {message}")]
    InvalidResponse {
        /// Which call failed.
        operation: &'static str,
        /// What was missing or malformed.
        message: String,
    },
}

/// Failure writing a state artifact to the object store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store refused the object because the received bytes did not match
    /// the supplied digest.
    #[error("Integrity check failed writing '{key}': {message}")]
    IntegrityMismatch {
        /// Object key.
        key: String,
        /// Store-provided detail.
        message: String,
    },

    /// Any other write failure (permissions, missing bucket, transport).
    #[error("Failed to write '{key}': {message}")]
    WriteFailed {
        /// Object key.
        key: String,
        /// Store-provided detail.
        message: String,
    },
}

/// Failure reporting a run task result.
#[derive(Debug, Error)]
pub enum CallbackError {
    /// Terraform Cloud answered the PATCH with a status above 399.
    #[error("Task result callback rejected with status {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The PATCH never produced a response.
    #[error("Task result callback failed: {message}")]
    Transport {
        /// Description of the underlying failure.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Everything that can end an invocation unsuccessfully.
#[derive(Debug, Error)]
pub enum StateSaveError {
    /// Neither signature header matched the body.
    ///
    /// Carries no detail: neither the computed hash nor the salt may leave
    /// the verifier.
    #[error("Invalid HMAC signature")]
    Authentication,

    /// The body is not JSON of the expected payload shape.
    #[error("Malformed {kind} payload: {message}")]
    MalformedPayload {
        /// `"notification"` or `"run task"`.
        kind: &'static str,
        /// Parser detail.
        message: String,
    },

    /// A field required for the requested action is missing or empty.
    #[error("Invalid payload: missing or empty '{field}'")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The run task stage is neither `null` nor `post_apply`.
    #[error("Unsupported run task stage '{stage}'")]
    UnsupportedStage {
        /// Stage value received.
        stage: String,
    },

    /// A secret could not be resolved.
    #[error(transparent)]
    Secret(#[from] SecretError),

    /// A Terraform Cloud call failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// The state artifact could not be written.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A run task callback could not be delivered.
    #[error(transparent)]
    Callback(#[from] CallbackError),

    /// The operation did not finish within its deadline.
    #[error("{operation} timed out after {seconds}s")]
    Timeout {
        /// What was being waited for.
        operation: &'static str,
        /// Configured deadline in seconds.
        seconds: u64,
    },

    /// A background task ended without producing a result.
    #[error("Run task processing was interrupted: {message}")]
    Interrupted {
        /// Join failure detail.
        message: String,
    },
}

impl StateSaveError {
    /// Returns `true` for errors the HTTP adapter answers with status 400.
    ///
    /// Only authentication failures qualify; every other error is an
    /// invocation failure left to the caller's own retry mechanism.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Authentication)
    }
}
