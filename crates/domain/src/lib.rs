//! Core domain for the Terraform Cloud state backup receiver.
//!
//! This crate contains the payload shapes, identifiers, signature
//! verification, and error taxonomy used throughout the workspace, plus the
//! port traits infrastructure crates implement. Infrastructure crates never
//! add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`WorkspaceId`, `WorkspaceName`, etc.) |
//! | [`types`] | Value types (`StateArtifact`, `TaskResult`, secrets) |
//! | [`event`] | Transport-neutral inbound event and response |
//! | [`payloads`] | Notification and run task payload parsing |
//! | [`signature`] | HMAC-SHA512 signature verification |
//! | [`ports`] | Traits implemented by infrastructure crates |
//! | [`errors`] | Port-level and top-level error types |

pub mod errors;
pub mod event;
pub mod identifiers;
pub mod payloads;
pub mod ports;
pub mod signature;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{CallbackError, SecretError, StateSaveError, StorageError, UpstreamError};
pub use event::{HttpMethod, InboundEvent, WebhookResponse, OK_RESPONSE};
pub use identifiers::{InvocationId, SecretName, WorkspaceId, WorkspaceName};
pub use payloads::{
    NotificationAction, NotificationPayload, RunTaskAction, RunTaskPayload, RunTaskRequest,
    APPLIED_RUN_STATUS, POST_APPLY_STAGE,
};
pub use ports::{SecretResolver, StateStore, StateVersionApi, TaskResultReporter};
pub use signature::{
    SignatureKind, NOTIFICATION_SIGNATURE_HEADER, TASK_SIGNATURE_HEADER,
};
pub use types::{
    ApiToken, ContentDigest, DownloadUrl, SecretValue, StateArtifact, TaskCallback, TaskResult,
    TaskResultStatus, WorkspaceRef,
};
