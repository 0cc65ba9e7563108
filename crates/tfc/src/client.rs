//! HTTP client for the Terraform Cloud API.
//!
//! One [`TfcClient`] serves all three upstream calls: the current state
//! version lookup, the state archive download, and the run task result
//! callback. Each call carries an explicit request timeout; there are no
//! retries.

use std::time::Duration;

use async_trait::async_trait;
use domain::{
    ApiToken, CallbackError, DownloadUrl, StateVersionApi, TaskCallback, TaskResult,
    TaskResultReporter, UpstreamError, WorkspaceId,
};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, IntoUrl, Method, RequestBuilder, Response, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Public Terraform Cloud API root.
pub const DEFAULT_API_ROOT: &str = "https://app.terraform.io/api/v2";

/// JSON:API media type required by Terraform Cloud.
const JSON_API: &str = "application/vnd.api+json";

const STATE_LOOKUP: &str = "workspace state lookup";
const STATE_DOWNLOAD: &str = "state download";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Connection settings for [`TfcClient`].
#[derive(Debug, Clone)]
pub struct TfcConfig {
    /// API root without a trailing slash.
    pub api_root: String,
    /// Upper bound on one request, from connect to last body byte.
    pub request_timeout: Duration,
    /// Upper bound on establishing the connection.
    pub connect_timeout: Duration,
}

impl Default for TfcConfig {
    fn default() -> Self {
        Self {
            api_root: DEFAULT_API_ROOT.to_string(),
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl TfcConfig {
    /// Overrides the API root (e.g. for Terraform Enterprise or tests).
    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into().trim_end_matches('/').to_string();
        self
    }

    /// Overrides the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Failure constructing a [`TfcClient`].
#[derive(Debug, Error)]
pub enum TfcClientError {
    #[error("Invalid Terraform Cloud API root '{api_root}': must be an http:// or https:// URL")]
    InvalidApiRoot { api_root: String },

    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct StateVersionDocument {
    data: StateVersionData,
}

#[derive(Debug, Deserialize)]
struct StateVersionData {
    attributes: StateVersionAttributes,
}

#[derive(Debug, Deserialize)]
struct StateVersionAttributes {
    #[serde(rename = "hosted-state-download-url", default)]
    hosted_state_download_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Terraform Cloud API adapter.
#[derive(Debug, Clone)]
pub struct TfcClient {
    http: Client,
    api_root: Url,
}

impl TfcClient {
    /// Builds a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TfcClientError`] if the API root is not an HTTP(S) URL or
    /// the TLS backend cannot be initialised.
    pub fn new(config: TfcConfig) -> Result<Self, TfcClientError> {
        let trimmed = config.api_root.trim_end_matches('/');
        let api_root = match Url::parse(trimmed) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url,
            _ => {
                return Err(TfcClientError::InvalidApiRoot {
                    api_root: trimmed.to_string(),
                })
            }
        };

        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self { http, api_root })
    }

    /// URL of the workspace's current state version resource.
    ///
    /// The workspace id is appended as a single percent-encoded path segment,
    /// so `/`, `?` and `#` in it cannot move the request off this resource.
    pub fn current_state_version_url(&self, workspace_id: &WorkspaceId) -> Url {
        let mut url = self.api_root.clone();
        // http(s) URLs always have a hierarchical path; checked in `new`.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "workspaces",
                workspace_id.as_str(),
                "current-state-version",
            ]);
        }
        url
    }

    fn request<U: IntoUrl>(&self, method: Method, url: U, token: &ApiToken) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(AUTHORIZATION, token.bearer())
            .header(CONTENT_TYPE, JSON_API)
    }
}

/// Sends a request, mapping transport failures. The URL is stripped from the
/// error because download URLs embed a signed credential.
async fn send(operation: &'static str, request: RequestBuilder) -> Result<Response, UpstreamError> {
    request
        .send()
        .await
        .map_err(|e| UpstreamError::Transport {
            operation,
            message: e.without_url().to_string(),
        })
}

/// Turns a status above 399 into [`UpstreamError::Status`] carrying the body.
async fn check_status(operation: &'static str, response: Response) -> Result<Response, UpstreamError> {
    let status = response.status().as_u16();
    if status > 399 {
        let body = response.text().await.unwrap_or_default();
        return Err(UpstreamError::Status {
            operation,
            status,
            body,
        });
    }
    Ok(response)
}

#[async_trait]
impl StateVersionApi for TfcClient {
    #[instrument(skip_all, fields(workspace_id = %workspace_id))]
    async fn current_state_download_url(
        &self,
        workspace_id: &WorkspaceId,
        token: &ApiToken,
    ) -> Result<DownloadUrl, UpstreamError> {
        let url = self.current_state_version_url(workspace_id);
        let response = send(STATE_LOOKUP, self.request(Method::GET, url, token)).await?;
        let response = check_status(STATE_LOOKUP, response).await?;

        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Transport {
                operation: STATE_LOOKUP,
                message: e.without_url().to_string(),
            })?;
        let document: StateVersionDocument =
            serde_json::from_slice(&body).map_err(|e| UpstreamError::InvalidResponse {
                operation: STATE_LOOKUP,
                message: e.to_string(),
            })?;

        let download_url = document
            .data
            .attributes
            .hosted_state_download_url
            .and_then(DownloadUrl::new)
            .ok_or_else(|| UpstreamError::InvalidResponse {
                operation: STATE_LOOKUP,
                message: "missing data.attributes.hosted-state-download-url".to_string(),
            })?;

        debug!(download_url = ?download_url, "Resolved state download URL");
        Ok(download_url)
    }

    #[instrument(skip_all)]
    async fn download_state(
        &self,
        url: &DownloadUrl,
        token: &ApiToken,
    ) -> Result<Vec<u8>, UpstreamError> {
        let response = send(
            STATE_DOWNLOAD,
            self.request(Method::GET, url.as_str(), token),
        )
        .await?;
        let response = check_status(STATE_DOWNLOAD, response).await?;

        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Transport {
                operation: STATE_DOWNLOAD,
                message: e.without_url().to_string(),
            })?;

        debug!(bytes = body.len(), "Downloaded state file");
        Ok(body.to_vec())
    }
}

#[async_trait]
impl TaskResultReporter for TfcClient {
    #[instrument(skip_all, fields(status = %result.status))]
    async fn report(
        &self,
        callback: &TaskCallback,
        result: &TaskResult,
    ) -> Result<(), CallbackError> {
        let body = serde_json::to_vec(&result.to_document()).map_err(|e| {
            CallbackError::Transport {
                message: format!("failed to encode task result: {e}"),
            }
        })?;

        let response = self
            .request(Method::PATCH, &callback.url, &callback.access_token)
            .body(body)
            .send()
            .await
            .map_err(|e| CallbackError::Transport {
                message: e.without_url().to_string(),
            })?;

        let status = response.status().as_u16();
        if status > 399 {
            let body = response.text().await.unwrap_or_default();
            return Err(CallbackError::Rejected { status, body });
        }

        info!(http_status = status, "Task result callback sent");
        Ok(())
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
