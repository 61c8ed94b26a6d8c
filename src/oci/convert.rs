// ABOUTME: Translation from sandbox records to OCI state and configuration.
// ABOUTME: Reads the bundle path and config.json stored as sandbox annotations.

use std::collections::HashMap;
use std::path::PathBuf;

use super::config::OciConfig;
use super::state::{OCI_VERSION, OciState, OciStatus};
use crate::runtime::{SandboxHandle, SandboxPhase, SandboxStatus};

/// Annotation holding the absolute path of the container bundle.
pub const BUNDLE_PATH_ANNOTATION: &str = "reclaim.bundle";

/// Annotation holding the container's OCI `config.json` as a string.
pub const CONFIG_JSON_ANNOTATION: &str = "reclaim.config";

/// Errors translating sandbox records into OCI documents.
#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("sandbox {id} has no {key} annotation")]
    MissingAnnotation { id: String, key: &'static str },

    #[error("invalid OCI config for sandbox {id}: {source}")]
    InvalidConfig {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

fn annotation<'a>(
    annotations: &'a HashMap<String, String>,
    id: &str,
    key: &'static str,
) -> Result<&'a str, TranslationError> {
    annotations
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| TranslationError::MissingAnnotation {
            id: id.to_string(),
            key,
        })
}

pub fn phase_to_oci_status(phase: SandboxPhase) -> OciStatus {
    match phase {
        SandboxPhase::Creating => OciStatus::Creating,
        SandboxPhase::Ready => OciStatus::Created,
        SandboxPhase::Running => OciStatus::Running,
        SandboxPhase::Paused => OciStatus::Paused,
        SandboxPhase::Stopped => OciStatus::Stopped,
    }
}

/// Build the OCI state document for a sandbox.
///
/// The pid is carried over as-is; deciding whether it is alive is left to
/// the caller.
pub fn status_to_oci_state(status: &SandboxStatus) -> Result<OciState, TranslationError> {
    let bundle = annotation(&status.annotations, status.id.as_str(), BUNDLE_PATH_ANNOTATION)?;

    Ok(OciState {
        oci_version: OCI_VERSION.to_string(),
        id: status.id.clone(),
        status: phase_to_oci_status(status.phase),
        pid: status.pid,
        bundle: PathBuf::from(bundle),
    })
}

/// Recover the OCI configuration the sandbox was created from.
pub fn sandbox_to_oci_config(handle: &SandboxHandle) -> Result<OciConfig, TranslationError> {
    let json = annotation(&handle.annotations, handle.id.as_str(), CONFIG_JSON_ANNOTATION)?;

    OciConfig::from_json(json).map_err(|source| TranslationError::InvalidConfig {
        id: handle.id.to_string(),
        source,
    })
}

/// Translates sandbox records into OCI documents.
pub trait OciTranslator: Send + Sync {
    fn state_of(&self, status: &SandboxStatus) -> Result<OciState, TranslationError>;

    fn config_of(&self, handle: &SandboxHandle) -> Result<OciConfig, TranslationError>;
}

/// Translator reading the annotations the runtime records on each sandbox.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationTranslator;

impl OciTranslator for AnnotationTranslator {
    fn state_of(&self, status: &SandboxStatus) -> Result<OciState, TranslationError> {
        status_to_oci_state(status)
    }

    fn config_of(&self, handle: &SandboxHandle) -> Result<OciConfig, TranslationError> {
        sandbox_to_oci_config(handle)
    }
}
