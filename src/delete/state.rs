// ABOUTME: Deletion state types for the type state pattern.
// ABOUTME: Each state carries exactly the data the next transition needs.

use crate::cgroups::CleanupOutcome;
use crate::oci::OciConfig;
use crate::runtime::SandboxHandle;
use crate::types::ContainerId;

/// Request accepted, nothing checked yet.
/// Available actions: `validate()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Requested;

/// Container exists and may be deleted.
/// Available actions: `ensure_stoppable()`
#[derive(Debug, Clone)]
pub struct Validated {
    pub(crate) id: ContainerId,
}

/// Liveness gate passed (or bypassed by force).
/// Available actions: `stop()`
#[derive(Debug, Clone)]
pub struct Cleared {
    pub(crate) id: ContainerId,
}

/// Sandbox stopped.
/// Available actions: `fetch_config()`
#[derive(Debug, Clone)]
pub struct Stopped {
    pub(crate) id: ContainerId,
    pub(crate) handle: SandboxHandle,
}

/// OCI configuration captured while the sandbox record still exists.
/// Available actions: `delete_sandbox()`
#[derive(Debug, Clone)]
pub struct Configured {
    pub(crate) id: ContainerId,
    pub(crate) config: OciConfig,
}

/// Sandbox permanently deleted; cgroups still to reclaim.
/// Available actions: `reclaim_cgroups()`
#[derive(Debug, Clone)]
pub struct Deleted {
    pub(crate) id: ContainerId,
    pub(crate) config: OciConfig,
}

/// Deletion finished, cgroups reclaimed.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Completed {
    pub(crate) id: ContainerId,
    pub(crate) cgroups: CleanupOutcome,
}
