// ABOUTME: Subset of the OCI runtime config.json used for cgroup reclamation.
// ABOUTME: Linux cgroupsPath, resource declarations, and mounts.

use serde::{Deserialize, Serialize};

/// OCI runtime configuration, reduced to the parts deletion needs.
///
/// Unknown fields are ignored so a full `config.json` parses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OciConfig {
    #[serde(default)]
    pub oci_version: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mounts: Vec<Mount>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub linux: Option<Linux>,
}

impl OciConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The declared cgroups path, treating an empty string as absent.
    pub fn cgroups_path(&self) -> Option<&str> {
        self.linux
            .as_ref()
            .and_then(|l| l.cgroups_path.as_deref())
            .filter(|p| !p.is_empty())
    }

    pub fn resources(&self) -> Option<&Resources> {
        self.linux.as_ref().and_then(|l| l.resources.as_ref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mount {
    pub destination: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub mount_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Linux {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cgroups_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
}

/// Linux cgroup resource declarations.
///
/// Only presence matters for reclamation; the limit values are kept loose.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resources {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub devices: Vec<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pids: Option<serde_json::Value>,

    #[serde(rename = "blockIO", skip_serializing_if = "Option::is_none")]
    pub block_io: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hugepage_limits: Vec<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<serde_json::Value>,
}
