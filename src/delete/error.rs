// ABOUTME: Error types for container deletion.
// ABOUTME: Every variant maps to the phase it failed in and a stable kind.

use crate::cgroups::{RemovalError, ResolutionError};
use crate::liveness::LookupError;
use crate::oci::TranslationError;
use crate::runtime::{SandboxError, SandboxPhase};
use crate::types::ContainerId;

/// Phase of the deletion workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePhase {
    Validating,
    CheckingLiveness,
    Stopping,
    FetchingConfig,
    Deleting,
    CleaningUp,
}

impl std::fmt::Display for DeletePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DeletePhase::Validating => "validating",
            DeletePhase::CheckingLiveness => "checking liveness",
            DeletePhase::Stopping => "stopping",
            DeletePhase::FetchingConfig => "fetching config",
            DeletePhase::Deleting => "deleting",
            DeletePhase::CleaningUp => "cleaning up",
        };
        f.write_str(name)
    }
}

/// Errors that abort a container deletion.
///
/// Nothing is rolled back: a failure during cleanup leaves the sandbox
/// deleted.
#[derive(Debug, thiserror::Error)]
pub enum DeleteError {
    #[error("missing container ID")]
    MissingId,

    #[error("failed to list containers: {source}")]
    Registry { source: SandboxError },

    /// Carries the ID as given, which may not be a well-formed ID.
    #[error("container ID ({0}) does not exist")]
    NotFound(String),

    #[error("container {id} is {phase} and cannot be deleted")]
    InvalidState { id: ContainerId, phase: SandboxPhase },

    #[error("failed to fetch status of container {id}: {source}")]
    Status { id: ContainerId, source: SandboxError },

    #[error("failed to read OCI state of container {id}: {source}")]
    StateTranslation {
        id: ContainerId,
        source: TranslationError,
    },

    #[error("cannot tell whether container {id} is running: {source}")]
    Lookup { id: ContainerId, source: LookupError },

    #[error("container {id} still running (pid {pid}), should be stopped")]
    StillRunning { id: ContainerId, pid: u32 },

    #[error("failed to stop sandbox {id}: {source}")]
    Stop { id: ContainerId, source: SandboxError },

    #[error("failed to retrieve OCI config of container {id}: {source}")]
    ConfigTranslation {
        id: ContainerId,
        source: TranslationError,
    },

    #[error("failed to delete sandbox {id}: {source}")]
    Delete { id: ContainerId, source: SandboxError },

    #[error("failed to resolve cgroup paths of container {id}: {source}")]
    Resolution {
        id: ContainerId,
        source: ResolutionError,
    },

    #[error("sandbox {id} deleted but cgroups were not fully reclaimed: {source}")]
    Removal { id: ContainerId, source: RemovalError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteErrorKind {
    /// Container unknown to the runtime.
    NotFound,
    /// Deletion preconditions violated.
    InvalidState,
    /// Container alive and deletion not forced.
    StillRunning,
    /// Liveness could not be determined.
    Lookup,
    /// Sandbox runtime call failed.
    Sandbox,
    /// Sandbox record could not be translated to OCI form.
    Translation,
    /// Cgroup paths could not be derived.
    Resolution,
    /// A cgroup path could not be removed.
    Removal,
}

impl DeleteError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeleteErrorKind {
        match self {
            DeleteError::NotFound(_) => DeleteErrorKind::NotFound,
            DeleteError::MissingId | DeleteError::InvalidState { .. } => {
                DeleteErrorKind::InvalidState
            }
            DeleteError::StillRunning { .. } => DeleteErrorKind::StillRunning,
            DeleteError::Lookup { .. } => DeleteErrorKind::Lookup,
            DeleteError::Registry { .. }
            | DeleteError::Status { .. }
            | DeleteError::Stop { .. }
            | DeleteError::Delete { .. } => DeleteErrorKind::Sandbox,
            DeleteError::StateTranslation { .. } | DeleteError::ConfigTranslation { .. } => {
                DeleteErrorKind::Translation
            }
            DeleteError::Resolution { .. } => DeleteErrorKind::Resolution,
            DeleteError::Removal { .. } => DeleteErrorKind::Removal,
        }
    }

    /// The workflow phase the error aborted.
    pub fn phase(&self) -> DeletePhase {
        match self {
            DeleteError::MissingId
            | DeleteError::Registry { .. }
            | DeleteError::NotFound(_)
            | DeleteError::InvalidState { .. } => DeletePhase::Validating,
            DeleteError::Status { .. }
            | DeleteError::StateTranslation { .. }
            | DeleteError::Lookup { .. }
            | DeleteError::StillRunning { .. } => DeletePhase::CheckingLiveness,
            DeleteError::Stop { .. } => DeletePhase::Stopping,
            DeleteError::ConfigTranslation { .. } => DeletePhase::FetchingConfig,
            DeleteError::Delete { .. } => DeletePhase::Deleting,
            DeleteError::Resolution { .. } | DeleteError::Removal { .. } => {
                DeletePhase::CleaningUp
            }
        }
    }

    /// Whether the sandbox was already deleted when the error occurred.
    pub fn sandbox_deleted(&self) -> bool {
        self.phase() == DeletePhase::CleaningUp
    }
}
