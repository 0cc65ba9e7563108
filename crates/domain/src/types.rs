//! Shared value types for the state backup domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! invariants of their own: secrets never print their value, a
//! [`StateArtifact`] always carries the digest of its exact bytes, and a
//! [`TaskResult`] renders the document shape Terraform Cloud expects.

use base64::Engine as _;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use crate::{WorkspaceId, WorkspaceName};

// ---------------------------------------------------------------------------
// Secrets
// ---------------------------------------------------------------------------

/// A secret string fetched from the parameter store.
///
/// Excluded from `Debug` output. There is no `Display` impl.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretValue(String);

impl SecretValue {
    /// Wraps a raw secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret as raw bytes (e.g. for use as an HMAC key).
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretValue(<REDACTED>)")
    }
}

// ---------------------------------------------------------------------------

/// Bearer credential for a Terraform Cloud API call.
///
/// Either the organization API token resolved from the parameter store, or
/// the short-lived access token a run task payload carries for its callback.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Creates a token, returning `None` if the value is empty.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if v.is_empty() {
            None
        } else {
            Some(Self(v))
        }
    }

    /// Returns the token as a string slice.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns the `Authorization` header value for this token.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl From<SecretValue> for ApiToken {
    fn from(value: SecretValue) -> Self {
        Self(value.0)
    }
}

impl std::fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiToken(<REDACTED>)")
    }
}

// ---------------------------------------------------------------------------
// Workspace and callback references
// ---------------------------------------------------------------------------

/// The workspace whose state is to be saved.
///
/// Produced once at the payload boundary; both fields are guaranteed
/// non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkspaceRef {
    /// Workspace identifier used for the state API lookup.
    pub id: WorkspaceId,
    /// Workspace name used as the storage key.
    pub name: WorkspaceName,
}

impl WorkspaceRef {
    /// Creates a reference from already-validated identifiers.
    pub fn new(id: WorkspaceId, name: WorkspaceName) -> Self {
        Self { id, name }
    }
}

/// Where and how to report a run task result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCallback {
    /// The `task_result_callback_url` from the run task payload.
    pub url: String,
    /// The run-scoped `access_token` from the run task payload.
    pub access_token: ApiToken,
}

/// Short-lived URL from which the raw state file can be downloaded.
///
/// The URL embeds a signed token; it is kept out of `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct DownloadUrl(String);

impl DownloadUrl {
    /// Creates a URL, returning `None` if the value is empty.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if v.is_empty() {
            None
        } else {
            Some(Self(v))
        }
    }

    /// Returns the URL as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for DownloadUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keep scheme and host for diagnostics, drop the signed path.
        let visible = self
            .0
            .splitn(4, '/')
            .take(3)
            .collect::<Vec<_>>()
            .join("/");
        write!(f, "DownloadUrl({visible}/<REDACTED>)")
    }
}

// ---------------------------------------------------------------------------
// State artifact
// ---------------------------------------------------------------------------

/// Base64-encoded MD5 digest of a byte sequence.
///
/// This is the value object stores expect in a `Content-MD5` header; the
/// store rejects a write whose received bytes do not hash to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Computes the digest of `bytes`.
    pub fn md5_base64(bytes: &[u8]) -> Self {
        let digest = Md5::digest(bytes);
        Self(base64::engine::general_purpose::STANDARD.encode(digest))
    }

    /// Returns the base64 string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A downloaded state file ready to be written to the bucket.
///
/// The digest is computed on construction from the exact bytes held, so the
/// two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateArtifact {
    key: WorkspaceName,
    body: Vec<u8>,
    digest: ContentDigest,
}

impl StateArtifact {
    /// Wraps `body` for storage under `key`, computing its digest.
    pub fn new(key: WorkspaceName, body: Vec<u8>) -> Self {
        let digest = ContentDigest::md5_base64(&body);
        Self { key, body, digest }
    }

    /// Storage key (the workspace name).
    pub fn key(&self) -> &WorkspaceName {
        &self.key
    }

    /// Raw state bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Integrity digest of [`Self::body`].
    pub fn digest(&self) -> &ContentDigest {
        &self.digest
    }

    /// Size of the state file in bytes.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns `true` if the downloaded state file was empty.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Run task results
// ---------------------------------------------------------------------------

/// Status reported to a run task callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskResultStatus {
    /// The task has started; Terraform Cloud keeps the run waiting.
    Running,
    /// The state file was saved.
    Passed,
    /// Saving the state file failed.
    Failed,
}

impl std::fmt::Display for TaskResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Running => "running",
            Self::Passed => "passed",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A status update sent to a run task callback URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
    /// Outcome being reported.
    pub status: TaskResultStatus,
    /// Free-text message shown on the run in Terraform Cloud.
    pub message: String,
}

impl TaskResult {
    /// Creates a `running` result.
    pub fn running(message: impl Into<String>) -> Self {
        Self {
            status: TaskResultStatus::Running,
            message: message.into(),
        }
    }

    /// Creates a `passed` result.
    pub fn passed(message: impl Into<String>) -> Self {
        Self {
            status: TaskResultStatus::Passed,
            message: message.into(),
        }
    }

    /// Creates a `failed` result.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: TaskResultStatus::Failed,
            message: message.into(),
        }
    }

    /// Renders the JSON:API `task-result` document for the callback PATCH.
    pub fn to_document(&self) -> TaskResultDocument<'_> {
        TaskResultDocument {
            data: TaskResultData {
                kind: "task-result",
                attributes: TaskResultAttributes {
                    status: self.status,
                    message: &self.message,
                },
            },
        }
    }
}

/// Wire shape of a task result callback body.
#[derive(Debug, Serialize)]
pub struct TaskResultDocument<'a> {
    data: TaskResultData<'a>,
}

#[derive(Debug, Serialize)]
struct TaskResultData<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    attributes: TaskResultAttributes<'a>,
}

#[derive(Debug, Serialize)]
struct TaskResultAttributes<'a> {
    status: TaskResultStatus,
    message: &'a str,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
