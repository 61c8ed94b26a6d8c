// ABOUTME: Sandbox operations trait consumed by the deletion workflow.
// ABOUTME: Registry listing, status fetch, stop, and permanent delete.

use crate::types::ContainerId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Operations on the sandboxes backing containers.
///
/// Each call either completes or fails; there is no cancellation and no
/// timeout applied by callers.
#[async_trait]
pub trait SandboxOps: Send + Sync {
    /// List every sandbox the runtime currently manages.
    async fn list_sandboxes(&self) -> Result<Vec<SandboxSummary>, SandboxError>;

    /// Fetch the current status of a sandbox. Never cached.
    async fn fetch_status(&self, id: &ContainerId) -> Result<SandboxStatus, SandboxError>;

    /// Stop the sandbox, terminating its process if one is still alive.
    async fn stop_sandbox(&self, id: &ContainerId) -> Result<SandboxHandle, SandboxError>;

    /// Permanently delete the sandbox record.
    async fn delete_sandbox(&self, id: &ContainerId) -> Result<(), SandboxError>;
}

/// Lifecycle phase of a sandbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SandboxPhase {
    Creating,
    Ready,
    Running,
    Paused,
    Stopped,
}

impl SandboxPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SandboxPhase::Creating => "creating",
            SandboxPhase::Ready => "ready",
            SandboxPhase::Running => "running",
            SandboxPhase::Paused => "paused",
            SandboxPhase::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for SandboxPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry entry for a managed sandbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxSummary {
    pub id: ContainerId,
    pub phase: SandboxPhase,
}

/// Full status of a sandbox as reported by the runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxStatus {
    pub id: ContainerId,
    pub phase: SandboxPhase,
    /// Process ID of the container's primary process, 0 when there is none.
    #[serde(default)]
    pub pid: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Runtime annotations, including the bundle path and the OCI config.
    #[serde(default)]
    pub annotations: HashMap<String, String>,
}

impl SandboxStatus {
    pub fn summary(&self) -> SandboxSummary {
        SandboxSummary {
            id: self.id.clone(),
            phase: self.phase,
        }
    }

    /// Handle describing this sandbox after a stop.
    pub fn handle(&self) -> SandboxHandle {
        SandboxHandle {
            id: self.id.clone(),
            annotations: self.annotations.clone(),
        }
    }
}

/// What the runtime hands back from a successful stop.
#[derive(Debug, Clone)]
pub struct SandboxHandle {
    pub id: ContainerId,
    pub annotations: HashMap<String, String>,
}

/// Errors from sandbox operations.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    #[error("sandbox not found: {0}")]
    NotFound(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt status for sandbox {id}: {source}")]
    Corrupt {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to signal process {pid}: {source}")]
    Signal {
        pid: u32,
        #[source]
        source: nix::errno::Errno,
    },

    #[error("process {pid} still alive {timeout:?} after stop signal")]
    StopTimeout { pid: u32, timeout: Duration },

    #[error("runtime error: {0}")]
    Runtime(String),
}

impl SandboxError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        SandboxError::Io {
            context: context.into(),
            source,
        }
    }
}
