//! Newtype domain identifiers.
//!
//! Every value that names something in Terraform Cloud or in the parameter
//! store is a distinct newtype wrapping a `String`. This prevents
//! accidentally passing a [`WorkspaceName`] where a [`WorkspaceId`] is
//! expected; both are plain strings on the wire and both appear in the same
//! payloads.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers: Terraform Cloud
// ---------------------------------------------------------------------------

string_id! {
    /// Terraform Cloud workspace identifier (e.g. `"ws-abc123"`).
    ///
    /// Used to build the current-state-version API path.
    WorkspaceId
}

string_id! {
    /// Human-readable workspace name.
    ///
    /// Doubles as the storage key for the workspace's state artifact. Names
    /// are only unique within one organization, so two organizations sharing
    /// a workspace name write to the same key.
    WorkspaceName
}

// ---------------------------------------------------------------------------
// Identifiers: configuration
// ---------------------------------------------------------------------------

string_id! {
    /// Path of a secret in the parameter store (e.g. `"/statesave/salt"`).
    SecretName
}

// ---------------------------------------------------------------------------
// Identifiers: UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies one handled inbound event.
///
/// Generated fresh for every request; recorded on the dispatch span so all
/// log lines of one invocation can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationId(Uuid);

impl InvocationId {
    /// Generates a new random invocation identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for InvocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
