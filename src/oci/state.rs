// ABOUTME: OCI runtime state document.
// ABOUTME: Status values and the state reported for a container.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::ContainerId;

/// Value of `ociVersion` in emitted state documents.
pub const OCI_VERSION: &str = "1.0.2";

/// OCI container status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OciStatus {
    Creating,
    Created,
    Running,
    Paused,
    Stopped,
}

impl OciStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OciStatus::Creating => "creating",
            OciStatus::Created => "created",
            OciStatus::Running => "running",
            OciStatus::Paused => "paused",
            OciStatus::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for OciStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OciState {
    pub oci_version: String,
    pub id: ContainerId,
    pub status: OciStatus,
    pub pid: u32,
    pub bundle: PathBuf,
}
