//! Terraform Cloud infrastructure adapter.
//!
//! Implements [`domain::StateVersionApi`] and [`domain::TaskResultReporter`]
//! over the Terraform Cloud HTTP API using `reqwest`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Request formatting, JSON:API response parsing, status
//! handling, and timeouts all live here. The `handlers` crate sees only the
//! domain traits.
//!
//! ## Endpoints
//!
//! | Call | Request | Credential |
//! |------|---------|------------|
//! | State lookup | `GET {api_root}/workspaces/{id}/current-state-version` | organization API token |
//! | State download | `GET {hosted-state-download-url}` | organization API token |
//! | Task result | `PATCH {task_result_callback_url}` | run task access token |

pub mod client;

pub use client::{TfcClient, TfcClientError, TfcConfig, DEFAULT_API_ROOT};
