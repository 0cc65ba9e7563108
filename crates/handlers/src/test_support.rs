//! Hand-written fakes for the domain ports, shared by the handler tests.
//!
//! Every fake appends to a shared [`CallLog`] so tests can assert both call
//! counts and relative order across ports.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use domain::{
    ApiToken, CallbackError, ContentDigest, DownloadUrl, SecretError, SecretName, SecretResolver,
    SecretValue, StateArtifact, StateSaveError, StateStore, StateVersionApi, StorageError,
    TaskCallback, TaskResult, TaskResultReporter, TaskResultStatus, UpstreamError, WorkspaceId,
    WorkspaceRef,
};

use crate::{SaveOutcome, StateSaver};

pub const SALT_PATH: &str = "/statesave/salt";
pub const TOKEN_PATH: &str = "/statesave/tfc-token";
pub const SALT: &str = "test-salt";
pub const TOKEN: &str = "tfc-api-token";
pub const DOWNLOAD_URL: &str = "https://archivist.example/v1/object/signed";
pub const STATE: &[u8] = br#"{"version":4,"serial":7}"#;

/// Ordered record of every port call made during a test.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.entries()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .count()
    }
}

pub fn workspace() -> WorkspaceRef {
    WorkspaceRef::new(
        WorkspaceId::new("ws-123").unwrap(),
        domain::WorkspaceName::new("networking-prod").unwrap(),
    )
}

// ---------------------------------------------------------------------------
// Secrets
// ---------------------------------------------------------------------------

pub struct FakeSecrets {
    values: HashMap<String, String>,
    log: CallLog,
}

impl FakeSecrets {
    pub fn new(log: CallLog) -> Self {
        let values = HashMap::from([
            (SALT_PATH.to_string(), SALT.to_string()),
            (TOKEN_PATH.to_string(), TOKEN.to_string()),
        ]);
        Self { values, log }
    }
}

#[async_trait]
impl SecretResolver for FakeSecrets {
    async fn resolve(&self, name: &SecretName) -> Result<SecretValue, SecretError> {
        self.log.push(format!("secret:{name}"));
        self.values
            .get(name.as_str())
            .map(SecretValue::new)
            .ok_or_else(|| SecretError::NotFound { name: name.clone() })
    }
}

// ---------------------------------------------------------------------------
// Terraform Cloud API
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
pub enum ApiBehaviour {
    Succeed,
    LookupFails { status: u16 },
    DownloadFails { status: u16 },
}

pub struct FakeStateApi {
    behaviour: ApiBehaviour,
    log: CallLog,
}

impl FakeStateApi {
    pub fn new(behaviour: ApiBehaviour, log: CallLog) -> Self {
        Self { behaviour, log }
    }
}

#[async_trait]
impl StateVersionApi for FakeStateApi {
    async fn current_state_download_url(
        &self,
        workspace_id: &WorkspaceId,
        token: &ApiToken,
    ) -> Result<DownloadUrl, UpstreamError> {
        self.log
            .push(format!("lookup:{workspace_id}:{}", token.expose()));
        match self.behaviour {
            ApiBehaviour::LookupFails { status } => Err(UpstreamError::Status {
                operation: "workspace state lookup",
                status,
                body: r#"{"errors":["lookup exploded"]}"#.to_string(),
            }),
            _ => Ok(DownloadUrl::new(DOWNLOAD_URL).unwrap()),
        }
    }

    async fn download_state(
        &self,
        url: &DownloadUrl,
        token: &ApiToken,
    ) -> Result<Vec<u8>, UpstreamError> {
        self.log
            .push(format!("download:{}:{}", url.as_str(), token.expose()));
        match self.behaviour {
            ApiBehaviour::DownloadFails { status } => Err(UpstreamError::Status {
                operation: "state download",
                status,
                body: "archive unavailable".to_string(),
            }),
            _ => Ok(STATE.to_vec()),
        }
    }
}

// ---------------------------------------------------------------------------
// Object store
// ---------------------------------------------------------------------------

pub struct FakeStore {
    written: Mutex<Vec<(String, Vec<u8>, ContentDigest)>>,
    fail: bool,
    log: CallLog,
}

impl FakeStore {
    pub fn new(log: CallLog) -> Self {
        Self {
            written: Mutex::new(Vec::new()),
            fail: false,
            log,
        }
    }

    pub fn failing(log: CallLog) -> Self {
        Self {
            fail: true,
            ..Self::new(log)
        }
    }

    pub fn written(&self) -> Vec<(String, Vec<u8>, ContentDigest)> {
        self.written.lock().unwrap().clone()
    }
}

#[async_trait]
impl StateStore for FakeStore {
    async fn put_state(&self, artifact: &StateArtifact) -> Result<(), StorageError> {
        self.log.push(format!("put:{}", artifact.key()));
        if self.fail {
            return Err(StorageError::WriteFailed {
                key: artifact.key().to_string(),
                message: "access denied".to_string(),
            });
        }
        self.written.lock().unwrap().push((
            artifact.key().to_string(),
            artifact.body().to_vec(),
            artifact.digest().clone(),
        ));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Run task callbacks
// ---------------------------------------------------------------------------

pub struct RecordingReporter {
    reports: Mutex<Vec<(String, TaskResult)>>,
    fail_on: Option<TaskResultStatus>,
    log: CallLog,
}

impl RecordingReporter {
    pub fn new(log: CallLog) -> Self {
        Self {
            reports: Mutex::new(Vec::new()),
            fail_on: None,
            log,
        }
    }

    pub fn failing_on(status: TaskResultStatus, log: CallLog) -> Self {
        Self {
            fail_on: Some(status),
            ..Self::new(log)
        }
    }

    pub fn reports(&self) -> Vec<(String, TaskResult)> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskResultReporter for RecordingReporter {
    async fn report(
        &self,
        callback: &TaskCallback,
        result: &TaskResult,
    ) -> Result<(), CallbackError> {
        self.log.push(format!("callback:{}", result.status));
        self.reports
            .lock()
            .unwrap()
            .push((callback.url.clone(), result.clone()));
        if self.fail_on == Some(result.status) {
            return Err(CallbackError::Rejected {
                status: 422,
                body: "callback rejected".to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

pub struct FakeSaver {
    fail: bool,
    delay: Option<std::time::Duration>,
    saved: Mutex<Vec<WorkspaceRef>>,
    log: CallLog,
}

impl FakeSaver {
    pub fn new(log: CallLog) -> Self {
        Self {
            fail: false,
            delay: None,
            saved: Mutex::new(Vec::new()),
            log,
        }
    }

    pub fn failing(log: CallLog) -> Self {
        Self {
            fail: true,
            ..Self::new(log)
        }
    }

    pub fn slow(delay: std::time::Duration, log: CallLog) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(log)
        }
    }

    pub fn saved(&self) -> Vec<WorkspaceRef> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl StateSaver for FakeSaver {
    async fn save(&self, workspace: &WorkspaceRef) -> Result<SaveOutcome, StateSaveError> {
        self.log.push(format!("save:{}", workspace.name));
        self.saved.lock().unwrap().push(workspace.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(StateSaveError::Upstream(UpstreamError::Status {
                operation: "workspace state lookup",
                status: 500,
                body: "upstream exploded".to_string(),
            }));
        }
        Ok(SaveOutcome::Stored {
            key: workspace.name.clone(),
            digest: ContentDigest::md5_base64(STATE),
            bytes: STATE.len(),
        })
    }
}
